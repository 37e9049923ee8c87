use crate::client::core::TaskboardClient;
use crate::resilience::circuit_breaker::{CircuitBreakerConfig, CircuitBreakerRegistry};
use crate::session::{memory_store, SessionStore};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for creating clients with custom configuration.
///
/// Unset values fall back to the environment, then to defaults:
/// - `TASKBOARD_API_URL` (default `http://localhost:8080/api`)
/// - `TASKBOARD_HTTP_TIMEOUT_SECS` (default 30)
/// - breaker settings via [`CircuitBreakerConfig::from_env`]
pub struct TaskboardClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    breaker_config: Option<CircuitBreakerConfig>,
    breaker: Option<Arc<CircuitBreakerRegistry>>,
    session: Option<Arc<dyn SessionStore>>,
    token: Option<String>,
}

impl Default for TaskboardClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskboardClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            breaker_config: None,
            breaker: None,
            session: None,
            token: None,
        }
    }

    /// API root, e.g. `https://tasks.example.com/api`. Paths such as `/tasks` are appended.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout enforced by the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configure the registry this client creates. Ignored when a shared registry is set.
    pub fn circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.breaker_config = Some(config);
        self
    }

    /// Reuse an existing registry so several clients share breaker state.
    pub fn shared_breaker(mut self, breaker: Arc<CircuitBreakerRegistry>) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// Inject a session store. Default is an empty in-memory store.
    ///
    /// A token set with [`Self::token`] is written into this store at build time.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Start with a bearer token in the session, overwriting any token the store holds.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn build(self) -> Result<TaskboardClient> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("TASKBOARD_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = self.timeout.unwrap_or_else(timeout_from_env);

        if timeout.is_zero() {
            return Err(Error::validation_with_context(
                "request timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("timeout")
                    .with_source("client_builder"),
            ));
        }

        let session = self.session.unwrap_or_else(memory_store);
        if let Some(token) = self.token.as_deref() {
            session.set_token(token);
        }

        let breaker_config = self.breaker_config;
        let breaker = self.breaker.unwrap_or_else(|| {
            Arc::new(CircuitBreakerRegistry::new(
                breaker_config.unwrap_or_else(CircuitBreakerConfig::from_env),
            ))
        });

        let transport = Arc::new(HttpTransport::new(&base_url, timeout, session)?);

        Ok(TaskboardClient { transport, breaker })
    }
}

/// `TASKBOARD_HTTP_TIMEOUT_SECS`, ignoring zero and unparsable values.
fn timeout_from_env() -> Duration {
    Duration::from_secs(
        std::env::var("TASKBOARD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    )
}

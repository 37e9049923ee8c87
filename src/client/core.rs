use crate::api::{AuthService, ProjectService, TaskService};
use crate::resilience::circuit_breaker::{BreakerSnapshot, CircuitBreakerRegistry};
use crate::session::SessionStore;
use crate::store::{AuthStore, ProjectStore, TaskStore};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;

/// Taskboard API client.
///
/// Every [`TaskService`] obtained from the same client (or from clients built with the
/// same [`TaskboardClientBuilder::shared_breaker`](crate::TaskboardClientBuilder::shared_breaker))
/// reports into one breaker registry.
pub struct TaskboardClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) breaker: Arc<CircuitBreakerRegistry>,
}

impl TaskboardClient {
    /// Create a client configured from the environment.
    pub fn new() -> Result<Self> {
        crate::client::builder::TaskboardClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::TaskboardClientBuilder {
        crate::client::builder::TaskboardClientBuilder::new()
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(Arc::clone(&self.transport), Arc::clone(&self.breaker))
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(Arc::clone(&self.transport))
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.transport))
    }

    pub fn task_store(&self) -> TaskStore {
        TaskStore::new(self.tasks())
    }

    pub fn project_store(&self) -> ProjectStore {
        ProjectStore::new(self.projects())
    }

    pub fn auth_store(&self) -> AuthStore {
        AuthStore::new(self.auth())
    }

    pub fn breaker(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breaker
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        self.transport.session()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Breaker health for every task operation used so far (facts only, no policy).
    pub fn breaker_snapshots(&self) -> Vec<BreakerSnapshot> {
        self.breaker.snapshots()
    }
}

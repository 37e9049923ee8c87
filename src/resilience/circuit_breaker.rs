//! Per-service circuit breaker registry.
//!
//! Each service identifier names a logical downstream operation (e.g. `"task-create"`)
//! and owns an independent breaker, created lazily on first use:
//!
//! ```text
//! Closed   --(failures >= threshold)-->  Open
//! Open     --(reset timeout elapsed)-->  HalfOpen   (same call proceeds as the probe)
//! HalfOpen --(probe succeeds)--------->  Closed
//! HalfOpen --(probe fails)------------>  Open
//! ```
//!
//! The registry lock is only held while deciding admission and while recording the
//! outcome, never across the awaited operation. With [`ProbeMode::Unguarded`] several
//! concurrent calls may therefore be admitted as half-open probes and their completions
//! may interleave; [`ProbeMode::Exclusive`] admits a single probe at a time.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected without running the operation.
    Open,
    /// Probationary; the next admitted call decides between Closed and Open.
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How calls are admitted while a breaker is half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    /// Every call that finds the breaker half-open runs its operation.
    #[default]
    Unguarded,
    /// Only one probe may be in flight; other calls are rejected until it completes.
    Exclusive,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
    pub probe_mode: ProbeMode,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
            probe_mode: ProbeMode::Unguarded,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by environment:
    /// - `TASKBOARD_BREAKER_FAILURE_THRESHOLD` (default 3)
    /// - `TASKBOARD_BREAKER_RESET_TIMEOUT_MS` (default 10000)
    /// - `TASKBOARD_BREAKER_EXCLUSIVE_PROBE` (`1` or `true` selects [`ProbeMode::Exclusive`])
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(threshold) = std::env::var("TASKBOARD_BREAKER_FAILURE_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
        {
            cfg.failure_threshold = threshold.max(1);
        }
        if let Some(ms) = std::env::var("TASKBOARD_BREAKER_RESET_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            cfg.reset_timeout = Duration::from_millis(ms.max(1));
        }
        if let Ok(v) = std::env::var("TASKBOARD_BREAKER_EXCLUSIVE_PROBE") {
            if matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true") {
                cfg.probe_mode = ProbeMode::Exclusive;
            }
        }
        cfg
    }

    /// Set the number of consecutive failures that opens a closed breaker (at least 1).
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Set how long an open breaker rejects calls before admitting a probe.
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    pub fn with_probe_mode(mut self, mode: ProbeMode) -> Self {
        self.probe_mode = mode;
        self
    }
}

/// Raised instead of running the operation when a service's breaker is open.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Service {service_id} is unavailable - circuit breaker is open")]
pub struct CircuitOpenError {
    service_id: String,
}

impl CircuitOpenError {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }
}

/// Point-in-time view of one service's breaker.
///
/// Snapshots are read-only: an open breaker whose reset timeout has passed still
/// reports `Open` (with no remaining time) until the next call moves it to half-open.
#[derive(Debug, Clone)]
pub struct BreakerSnapshot {
    pub service_id: String,
    pub state: CircuitState,
    pub failure_count: u32,
    pub since_last_failure: Option<Duration>,
    /// Remaining open time in ms, if currently open and still cooling down.
    pub open_remaining_ms: Option<u64>,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    last_failure: Option<Instant>,
    probe_in_flight: bool,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            last_failure: None,
            probe_in_flight: false,
        }
    }
}

/// Registry of breakers keyed by service identifier.
///
/// Construct one per application and share it (`Arc`) with every data-access layer
/// that should see the same health bookkeeping.
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    cfg: CircuitBreakerConfig,
    states: Mutex<HashMap<String, BreakerState>>,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreakerRegistry {
    pub fn new(cfg: CircuitBreakerConfig) -> Self {
        Self {
            cfg,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.cfg
    }

    /// Run `operation` under the breaker for `service_id`.
    ///
    /// The operation's own error is returned unchanged after being recorded. When the
    /// breaker rejects the call the operation is never invoked and a fresh
    /// [`CircuitOpenError`] is converted into `E`. The breaker never retries.
    pub async fn call<F, Fut, T, E>(&self, service_id: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CircuitOpenError>,
    {
        let _probe = self.admit(service_id)?;

        match operation().await {
            Ok(value) => {
                self.record_success(service_id);
                Ok(value)
            }
            Err(err) => {
                self.record_failure(service_id);
                Err(err)
            }
        }
    }

    /// Current state for `service_id`; unseen services are closed.
    pub fn state(&self, service_id: &str) -> CircuitState {
        self.lock()
            .get(service_id)
            .map(|st| st.state)
            .unwrap_or(CircuitState::Closed)
    }

    pub fn failure_count(&self, service_id: &str) -> u32 {
        self.lock()
            .get(service_id)
            .map(|st| st.failure_count)
            .unwrap_or(0)
    }

    pub fn snapshot(&self, service_id: &str) -> Option<BreakerSnapshot> {
        let states = self.lock();
        states
            .get(service_id)
            .map(|st| self.snapshot_of(service_id, st, Instant::now()))
    }

    /// Snapshots of every service seen so far, ordered by service id.
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let now = Instant::now();
        let states = self.lock();
        let mut out: Vec<_> = states
            .iter()
            .map(|(id, st)| self.snapshot_of(id, st, now))
            .collect();
        out.sort_by(|a, b| a.service_id.cmp(&b.service_id));
        out
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BreakerState>> {
        // State is plain bookkeeping; a panic elsewhere cannot leave it half-written.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(&self, service_id: &str, st: &BreakerState, now: Instant) -> BreakerSnapshot {
        let since_last_failure = st.last_failure.map(|at| now.saturating_duration_since(at));
        let open_remaining_ms = match (st.state, since_last_failure) {
            (CircuitState::Open, Some(elapsed)) if elapsed < self.cfg.reset_timeout => {
                Some((self.cfg.reset_timeout - elapsed).as_millis() as u64)
            }
            _ => None,
        };
        BreakerSnapshot {
            service_id: service_id.to_string(),
            state: st.state,
            failure_count: st.failure_count,
            since_last_failure,
            open_remaining_ms,
        }
    }

    fn admit<'a>(
        &'a self,
        service_id: &'a str,
    ) -> Result<Option<ProbeGuard<'a>>, CircuitOpenError> {
        let mut states = self.lock();
        let st = states.entry(service_id.to_string()).or_default();

        if st.state == CircuitState::Open {
            let cooled_down = st
                .last_failure
                .map_or(true, |at| at.elapsed() >= self.cfg.reset_timeout);
            if !cooled_down {
                debug!(service_id, "circuit open, call short-circuited");
                return Err(CircuitOpenError::new(service_id));
            }
            st.state = CircuitState::HalfOpen;
            debug!(service_id, "reset timeout elapsed, circuit half-open");
        }

        if st.state == CircuitState::HalfOpen && self.cfg.probe_mode == ProbeMode::Exclusive {
            if st.probe_in_flight {
                debug!(service_id, "probe already in flight, call short-circuited");
                return Err(CircuitOpenError::new(service_id));
            }
            st.probe_in_flight = true;
            return Ok(Some(ProbeGuard {
                registry: self,
                service_id,
            }));
        }

        Ok(None)
    }

    fn record_success(&self, service_id: &str) {
        let mut states = self.lock();
        let Some(st) = states.get_mut(service_id) else {
            return;
        };
        match st.state {
            CircuitState::HalfOpen => {
                st.state = CircuitState::Closed;
                st.failure_count = 0;
                info!(service_id, "probe succeeded, circuit closed");
            }
            CircuitState::Closed => st.failure_count = 0,
            // A call admitted before the breaker opened does not close it.
            CircuitState::Open => {}
        }
    }

    fn record_failure(&self, service_id: &str) {
        let mut states = self.lock();
        let st = states.entry(service_id.to_string()).or_default();
        st.failure_count = st.failure_count.saturating_add(1);
        st.last_failure = Some(Instant::now());

        let probe_failed = st.state == CircuitState::HalfOpen;
        if probe_failed || st.failure_count >= self.cfg.failure_threshold {
            if st.state != CircuitState::Open {
                warn!(
                    service_id,
                    failures = st.failure_count,
                    probe_failed,
                    reset_timeout_ms = self.cfg.reset_timeout.as_millis() as u64,
                    "circuit opened"
                );
            }
            st.state = CircuitState::Open;
        }
    }
}

/// Holds the single half-open probe slot in [`ProbeMode::Exclusive`]; releasing it on
/// drop also covers probes whose future is cancelled mid-flight.
struct ProbeGuard<'a> {
    registry: &'a CircuitBreakerRegistry,
    service_id: &'a str,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if let Some(st) = self.registry.lock().get_mut(self.service_id) {
            st.probe_in_flight = false;
        }
    }
}

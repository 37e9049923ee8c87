//! Resilience primitives for calls against the Taskboard backend.
//!
//! The [`circuit_breaker`] registry keeps one breaker per logical operation so a
//! degraded endpoint fails fast instead of piling up slow requests:
//! - **Closed**: normal operation, requests pass through
//! - **Open**: failures reached the threshold, requests fail fast
//! - **Half-Open**: the reset timeout elapsed, a probe tests recovery
//!
//! ```rust
//! use taskboard_client::resilience::circuit_breaker::{
//!     CircuitBreakerConfig, CircuitBreakerRegistry, CircuitOpenError,
//! };
//! use std::time::Duration;
//!
//! # #[derive(Debug)]
//! # struct MyError;
//! # impl From<CircuitOpenError> for MyError {
//! #     fn from(_: CircuitOpenError) -> Self { MyError }
//! # }
//! # async fn run() -> Result<(), MyError> {
//! let config = CircuitBreakerConfig::new()
//!     .with_failure_threshold(3)
//!     .with_reset_timeout(Duration::from_secs(10));
//! let breaker = CircuitBreakerRegistry::new(config);
//!
//! let rows = breaker
//!     .call("task-list-fetch", || async { Ok::<_, MyError>(vec![1, 2, 3]) })
//!     .await?;
//! assert_eq!(rows.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! The breaker never retries; retries, if any, belong to the caller.

pub mod circuit_breaker;

//! # taskboard-client
//!
//! Async Rust client for the Taskboard REST API: tasks, projects and authentication,
//! with per-operation circuit breaking on the task endpoints and reducer-style state
//! containers for applications that render the data.
//!
//! ## Overview
//!
//! The backend is a plain JSON API. Most of this crate is a thin typed layer over it;
//! the part with real behavior is the [`resilience`] module, which keeps one circuit
//! breaker per logical task operation so that a degraded endpoint fails fast instead
//! of piling up slow requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskboard_client::{PageRequest, TaskDraft, TaskboardClientBuilder};
//!
//! #[tokio::main]
//! async fn main() -> taskboard_client::Result<()> {
//!     let client = TaskboardClientBuilder::new()
//!         .base_url("http://localhost:8080/api")
//!         .token("jwt-from-login")
//!         .build()?;
//!
//!     let tasks = client.tasks();
//!     let page = tasks.list(PageRequest::default()).await?;
//!     println!("{} of {} tasks", page.len(), page.info.total_elements);
//!
//!     let created = tasks.create(&TaskDraft::new("Write release notes")).await?;
//!     println!("created task #{}", created.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client and builder owning the shared transport and breaker registry |
//! | [`api`] | Task, project and auth services |
//! | [`resilience`] | Per-service circuit breaker registry |
//! | [`store`] | Client-side state containers |
//! | [`session`] | Token and user storage |
//! | [`transport`] | JSON-over-HTTP wrapper |
//! | [`types`] | Wire types |

pub mod api;
pub mod client;
pub mod resilience;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{TaskboardClient, TaskboardClientBuilder};
pub use resilience::circuit_breaker::{
    CircuitBreakerConfig, CircuitBreakerRegistry, CircuitOpenError, CircuitState, ProbeMode,
};
pub use types::{
    Page, PageInfo, PageRequest, Project, ProjectDraft, Task, TaskDraft, TaskPriority, TaskStatus,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

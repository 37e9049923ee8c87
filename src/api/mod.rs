//! Data-access layer over the Taskboard REST API.
//!
//! | Service | Endpoints | Circuit breaker |
//! |---------|-----------|-----------------|
//! | [`TaskService`] | `/tasks` | one breaker per operation kind |
//! | [`ProjectService`] | `/projects` | none |
//! | [`AuthService`] | `/auth` | none |

pub mod auth;
pub mod projects;
pub mod tasks;

pub use auth::AuthService;
pub use projects::ProjectService;
pub use tasks::{service_ids, TaskService};

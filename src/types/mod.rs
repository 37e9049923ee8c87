//! Wire types exchanged with the Taskboard REST API.
//!
//! Field names follow the backend's camelCase JSON.

pub mod auth;
pub mod page;
pub mod project;
pub mod task;

pub use auth::{AuthResponse, Credentials, MessageResponse, SignupRequest, UserProfile};
pub use page::{Page, PageInfo, PageRequest};
pub use project::{Project, ProjectDraft};
pub use task::{Task, TaskDraft, TaskPriority, TaskStatus};

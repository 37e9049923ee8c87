//! Client-side state containers.
//!
//! Each store keeps a plain state value and changes it only through an action enum,
//! so the transitions can be tested without a backend. The async methods wrap one
//! service call each: mark the state loading, run the call, then record either the
//! result or a user-facing error message.
//!
//! Error messages prefer the backend's own `message`; otherwise a fixed fallback is
//! used. Circuit-open rejections get the fallback too, since users only need to
//! know the operation failed.

pub mod auth;
pub mod projects;
pub mod tasks;

pub use auth::{AuthAction, AuthState, AuthStore};
pub use projects::{ProjectAction, ProjectState, ProjectStore};
pub use tasks::{TaskAction, TaskState, TaskStore};

use crate::Error;

pub(crate) fn failure_message(err: &Error, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}

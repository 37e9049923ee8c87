//! Entry point for applications: one [`TaskboardClient`] per session.
//!
//! The client owns the HTTP transport and the circuit breaker registry and hands out
//! cheap service and store handles that share them.

pub mod builder;
pub mod core;

pub use builder::TaskboardClientBuilder;
pub use core::TaskboardClient;

//! JSON-over-HTTP access to the Taskboard backend.

pub mod http;

pub use http::{HttpTransport, TransportError};

//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod shutdown;

pub use shutdown::{drain, shutdown_signal, ShutdownController, SHUTDOWN_TIMEOUT};

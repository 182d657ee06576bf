//! Application Layer
//!
//! Use cases wiring domain services to the outbound ports.

mod lookup_service;

pub use lookup_service::LookupService;

//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP); outbound adapters
//! implement the domain ports (GeoIP database).

pub mod inbound;
pub mod outbound;

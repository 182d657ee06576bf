//! Domain Errors
//!
//! Every lookup failure is terminal and maps one-to-one onto an HTTP status.

use std::net::IpAddr;

/// Errors surfaced to callers of the lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Malformed or undeterminable client IP.
    #[error("{0}")]
    BadRequest(String),
    /// Valid IP with no geolocation record.
    #[error("GeoIP data not found for IP: {0}")]
    NotFound(IpAddr),
    /// No geolocation database is loaded.
    #[error("GeoIP service not available")]
    ServiceUnavailable,
}

impl LookupError {
    pub fn invalid_ip(candidate: &str) -> Self {
        Self::BadRequest(format!("Invalid IP address format: {}", candidate))
    }

    pub fn undeterminable_ip() -> Self {
        Self::BadRequest("Could not determine IP address from request".to_string())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::ServiceUnavailable => 500,
        }
    }
}

/// Errors reported by a [`GeoResolver`](crate::domain::ports::GeoResolver).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoLookupError {
    #[error("address not found in database")]
    NotFound,
    #[error("database error: {0}")]
    Database(String),
}

//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the lookup domain.
//! They have no external dependencies beyond serde and contain only
//! plain data.

use serde::Serialize;
use std::net::IpAddr;

/// Per-request view of everything that can identify the client.
///
/// Built by the inbound adapter from the HTTP request and discarded
/// once the lookup completes.
#[derive(Debug, Clone, Default)]
pub struct LookupRequestContext {
    /// IP string taken from `/lookup/{ip}`, if any
    pub path_ip: Option<String>,
    /// Raw `X-Forwarded-For` header value
    pub forwarded_for: Option<String>,
    /// Raw `X-Real-IP` header value
    pub real_ip: Option<String>,
    /// Transport peer address, usually `host:port`
    pub peer_addr: Option<String>,
}

impl LookupRequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path_ip(mut self, ip: impl Into<String>) -> Self {
        self.path_ip = Some(ip.into());
        self
    }

    pub fn with_forwarded_for(mut self, value: impl Into<String>) -> Self {
        self.forwarded_for = Some(value.into());
        self
    }

    pub fn with_real_ip(mut self, value: impl Into<String>) -> Self {
        self.real_ip = Some(value.into());
        self
    }

    pub fn with_peer_addr(mut self, addr: impl Into<String>) -> Self {
        self.peer_addr = Some(addr.into());
        self
    }
}

/// Geographic information resolved from an IP address.
///
/// String fields are empty when the database has no value for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoRecord {
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country_code: String,
    pub country_name: String,
    pub continent: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA time zone, e.g. `America/Chicago`
    pub time_zone: String,
    pub postal_code: String,
    /// Name of the first subdivision; `None` when the database lists none.
    pub subdivision_name: Option<String>,
}

/// Successful lookup body.
///
/// Field order is the wire order. `subdivision_name` is omitted
/// entirely rather than emitted empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub ip: String,
    pub city: String,
    pub country_code: String,
    pub country_name: String,
    pub continent: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdivision_name: Option<String>,
}

impl LookupResponse {
    pub fn new(ip: IpAddr, record: GeoRecord) -> Self {
        Self {
            ip: ip.to_string(),
            city: record.city,
            country_code: record.country_code,
            country_name: record.country_name,
            continent: record.continent,
            latitude: record.latitude,
            longitude: record.longitude,
            time_zone: record.time_zone,
            postal_code: record.postal_code,
            subdivision_name: record.subdivision_name,
        }
    }
}

/// JSON error body, `code` mirrors the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

//! Response Shaper
//!
//! Turns a provider result into the public lookup body.

use crate::domain::entities::{GeoRecord, LookupResponse};
use crate::domain::errors::{GeoLookupError, LookupError};
use std::net::IpAddr;

pub struct ResponseShaper;

impl ResponseShaper {
    /// Any provider failure collapses into `NotFound` for the caller; the
    /// underlying reason is only logged.
    pub fn shape(
        ip: IpAddr,
        result: Result<GeoRecord, GeoLookupError>,
    ) -> Result<LookupResponse, LookupError> {
        match result {
            Ok(record) => Ok(LookupResponse::new(ip, record)),
            Err(e) => {
                tracing::info!("could not find GeoIP data for IP {}: {}", ip, e);
                Err(LookupError::NotFound(ip))
            }
        }
    }
}

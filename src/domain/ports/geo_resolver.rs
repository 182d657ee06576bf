//! GeoIP Resolver Port
//!
//! Defines the interface for resolving IP addresses to geographic locations.

use crate::domain::entities::GeoRecord;
use crate::domain::errors::GeoLookupError;
use std::net::IpAddr;

/// Resolver for IP address to geographic location.
///
/// This is an outbound port that abstracts the GeoIP database.
/// Implementations may use MaxMind GeoLite2, IP2Location, or other databases.
/// The data behind a resolver is immutable once loaded, so lookups take
/// `&self` and need no locking.
pub trait GeoResolver: Send + Sync {
    /// Resolve an IP address to geographic information.
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, GeoLookupError>;
}

//! Lookup Service - Main application use case
//!
//! Orchestrates a lookup: pick the client IP, query the GeoIP resolver
//! and shape the result. This is the primary interface for the inbound
//! adapter.

use crate::domain::entities::{LookupRequestContext, LookupResponse};
use crate::domain::errors::LookupError;
use crate::domain::ports::GeoResolver;
use crate::domain::services::{ClientIpResolver, ResponseShaper};
use std::sync::Arc;

/// Lookup service - main application use case.
///
/// Holds the injected resolver handle. `None` means no database is
/// loaded; lookups then fail with [`LookupError::ServiceUnavailable`]
/// and the health check reports the service as down.
#[derive(Clone)]
pub struct LookupService {
    geo_resolver: Option<Arc<dyn GeoResolver>>,
}

impl LookupService {
    pub fn new(geo_resolver: Option<Arc<dyn GeoResolver>>) -> Self {
        Self { geo_resolver }
    }

    /// Whether a GeoIP database is available.
    pub fn is_ready(&self) -> bool {
        self.geo_resolver.is_some()
    }

    /// Resolve and geolocate the IP described by `ctx`.
    pub fn lookup(&self, ctx: &LookupRequestContext) -> Result<LookupResponse, LookupError> {
        let Some(resolver) = self.geo_resolver.as_ref() else {
            tracing::error!("GeoIP database is not loaded");
            return Err(LookupError::ServiceUnavailable);
        };

        let ip = ClientIpResolver::resolve(ctx)?;
        ResponseShaper::shape(ip, resolver.lookup(ip))
    }
}

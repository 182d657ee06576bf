//! geolookup Library
//!
//! IP geolocation over a MaxMind database, exposed as a small JSON HTTP
//! API. This module exposes the components for the binary, integration
//! tests and embedding.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::LookupService;
pub use config::load_config;
pub use domain::entities::{GeoRecord, LookupRequestContext, LookupResponse};
pub use domain::ports::GeoResolver;
pub use domain::services::{ClientIpResolver, CorsDecision, CorsPolicy, ResponseShaper};
pub use domain::{AllowedOrigins, GeoLookupError, LookupError};

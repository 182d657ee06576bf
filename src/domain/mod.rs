//! Domain Layer
//!
//! Core lookup logic with no knowledge of HTTP or the database format.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use errors::{GeoLookupError, LookupError};
pub use value_objects::AllowedOrigins;

//! MaxMind GeoIP Resolver
//!
//! Implements GeoResolver using a MaxMind GeoLite2-City database.

use crate::domain::entities::GeoRecord;
use crate::domain::errors::GeoLookupError;
use crate::domain::ports::GeoResolver;
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Locale used for every localized name.
const LOCALE: &str = "en";

type Names = Option<BTreeMap<String, String>>;

fn localized(names: &Names) -> String {
    names
        .as_ref()
        .and_then(|n| n.get(LOCALE))
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
struct NamedEntry {
    names: Names,
}

#[derive(Debug, Default, Deserialize)]
struct CountryEntry {
    iso_code: Option<String>,
    names: Names,
}

#[derive(Debug, Default, Deserialize)]
struct LocationEntry {
    latitude: Option<f64>,
    longitude: Option<f64>,
    time_zone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PostalEntry {
    code: Option<String>,
}

/// Subset of the GeoIP2 City record this service exposes.
#[derive(Debug, Default, Deserialize)]
struct CityResp {
    city: Option<NamedEntry>,
    continent: Option<NamedEntry>,
    country: Option<CountryEntry>,
    location: Option<LocationEntry>,
    postal: Option<PostalEntry>,
    subdivisions: Option<Vec<NamedEntry>>,
}

impl CityResp {
    fn into_record(self) -> GeoRecord {
        let country = self.country.unwrap_or_default();
        let location = self.location.unwrap_or_default();

        GeoRecord {
            city: localized(&self.city.unwrap_or_default().names),
            country_code: country.iso_code.unwrap_or_default(),
            country_name: localized(&country.names),
            continent: localized(&self.continent.unwrap_or_default().names),
            latitude: location.latitude.unwrap_or_default(),
            longitude: location.longitude.unwrap_or_default(),
            time_zone: location.time_zone.unwrap_or_default(),
            postal_code: self.postal.and_then(|p| p.code).unwrap_or_default(),
            subdivision_name: self
                .subdivisions
                .and_then(|subs| subs.into_iter().next())
                .map(|first| localized(&first.names)),
        }
    }
}

/// MaxMind GeoIP resolver.
///
/// The reader is immutable after load and shared across request tasks.
pub struct MaxMindGeoResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoResolver {
    /// Load a GeoIP database from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Database type recorded in the file metadata, e.g. `GeoLite2-City`.
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl GeoResolver for MaxMindGeoResolver {
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, GeoLookupError> {
        match self.reader.lookup::<CityResp>(ip) {
            Ok(resp) => Ok(resp.into_record()),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Err(GeoLookupError::NotFound),
            Err(e) => Err(GeoLookupError::Database(e.to_string())),
        }
    }
}

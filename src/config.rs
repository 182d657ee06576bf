use crate::domain::value_objects::AllowedOrigins;
use std::path::{Path, PathBuf};

/// Directory searched when `GEOIP_DB_PATH` is unset; matches the
/// geoipupdate volume mount.
pub const DEFAULT_GEOIP_DIR: &str = "/app/data";
pub const DEFAULT_GEOIP_FILE: &str = "GeoLite2-City.mmdb";
pub const DEFAULT_LISTEN_ADDR: &str = ":8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub geoip_db_path: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn allowed_origins(&self) -> AllowedOrigins {
        AllowedOrigins::new(self.allowed_origins.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: normalize_listen_addr(DEFAULT_LISTEN_ADDR),
            geoip_db_path: Path::new(DEFAULT_GEOIP_DIR).join(DEFAULT_GEOIP_FILE),
            allowed_origins: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEOIP_DB_PATH environment variable is not set, and the default database '{file}' was not found in '{dir}'. Please ensure the database file is available or set GEOIP_DB_PATH.")]
    DefaultDatabaseMissing { file: String, dir: String },
    #[error("Error checking for default GeoIP database at '{path}': {source}. Please ensure the path is accessible or set GEOIP_DB_PATH.")]
    DefaultDatabaseUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A bare `:port` binds all IPv4 interfaces.
pub fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

/// Pick the database path: an explicit value wins, otherwise the default
/// file must exist under `default_dir`.
pub fn resolve_db_path(explicit: Option<String>, default_dir: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        tracing::info!("using GeoIP database path from GEOIP_DB_PATH: {}", path);
        return Ok(PathBuf::from(path));
    }

    let candidate = default_dir.join(DEFAULT_GEOIP_FILE);
    tracing::info!(
        "GEOIP_DB_PATH not set, checking default location: {}",
        candidate.display()
    );

    match std::fs::metadata(&candidate) {
        Ok(_) => {
            tracing::info!(
                "using GeoIP database found at default location: {}",
                candidate.display()
            );
            Ok(candidate)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::DefaultDatabaseMissing {
                file: DEFAULT_GEOIP_FILE.to_string(),
                dir: default_dir.display().to_string(),
            })
        }
        Err(source) => Err(ConfigError::DefaultDatabaseUnreadable {
            path: candidate,
            source,
        }),
    }
}

/// `DEBUG` set to anything enables debug logging. Read on its own so
/// logging can start before the rest of the configuration loads.
pub fn debug_enabled() -> bool {
    std::env::var("DEBUG").is_ok()
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr = std::env::var("LISTEN_ADDR")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
    let listen_addr = normalize_listen_addr(&listen_addr);

    let geoip_db_path = resolve_db_path(
        std::env::var("GEOIP_DB_PATH").ok(),
        Path::new(DEFAULT_GEOIP_DIR),
    )?;

    let allowed_origins = std::env::var("ALLOWED_CORS_ORIGINS")
        .map(|v| AllowedOrigins::parse(&v).as_slice().to_vec())
        .unwrap_or_default();
    if allowed_origins.is_empty() {
        tracing::info!("ALLOWED_CORS_ORIGINS not set, CORS headers will not be added");
    } else {
        tracing::info!("allowed CORS origins: {:?}", allowed_origins);
    }

    Ok(Config {
        listen_addr,
        geoip_db_path,
        allowed_origins,
    })
}

//! geolookup - IP geolocation HTTP service
//!
//! This is the composition root that wires together all the components.

use anyhow::Context;
use geolookup::adapters::inbound::{AppState, HttpServer};
use geolookup::adapters::outbound::MaxMindGeoResolver;
use geolookup::config::{debug_enabled, load_config};
use geolookup::infrastructure::{drain, shutdown_signal, ShutdownController, SHUTDOWN_TIMEOUT};
use geolookup::{CorsPolicy, GeoResolver, LookupService};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    let log_level = if debug_enabled() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // Load configuration from environment
    let cfg = load_config().context("configuration error")?;

    tracing::info!(
        "starting geolookup listen={} db={}",
        cfg.listen_addr,
        cfg.geoip_db_path.display()
    );

    // ===== COMPOSITION ROOT =====

    // 1. GeoIP resolver (MaxMind); the service is useless without it
    let resolver = MaxMindGeoResolver::from_file(&cfg.geoip_db_path).with_context(|| {
        format!(
            "error opening GeoIP database at {}",
            cfg.geoip_db_path.display()
        )
    })?;
    tracing::info!(
        "GeoIP database loaded ({})",
        resolver.database_type()
    );
    let geo_resolver: Arc<dyn GeoResolver> = Arc::new(resolver);

    // 2. Application service and CORS policy
    let service = LookupService::new(Some(geo_resolver));
    let cors = CorsPolicy::new(cfg.allowed_origins());

    // 3. Inbound adapter
    let shutdown = ShutdownController::new();
    let server = HttpServer::new(cfg.listen_addr.clone(), AppState::new(service, cors));
    let mut server_task = tokio::spawn(server.run(shutdown.clone()));

    tokio::select! {
        res = &mut server_task => {
            // Server exited before any signal, e.g. the bind failed.
            return res.context("server task panicked")?;
        }
        _ = shutdown_signal(shutdown.clone()) => {}
    }

    tracing::info!("shutting down server");
    if !drain(&mut server_task, SHUTDOWN_TIMEOUT).await {
        server_task.abort();
        anyhow::bail!("server shutdown did not finish within {:?}", SHUTDOWN_TIMEOUT);
    }

    tracing::info!("server gracefully stopped");
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use journey_server::config::{API_KEY_VAR, AppConfig};
use journey_server::enrich::JourneyEnricher;
use journey_server::stations::{StationClient, StationIndex, StationNames};
use journey_server::tracker::{FileBackend, PinStore, PinnedJourneyTracker, TrackerConfig};
use journey_server::upstream::UpstreamClient;
use journey_server::web::{AppState, create_router};

/// How often to refresh the station directory (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to read configuration")?;

    let client = UpstreamClient::new(config.upstream()).context("Failed to create NS client")?;
    if !client.is_configured() {
        warn!("{API_KEY_VAR} not set; journey requests will report the service as unavailable");
    }
    let enricher = Arc::new(JourneyEnricher::new(Arc::new(client)));

    let stations = load_stations(&config).await?;

    let store = PinStore::open(FileBackend::new(&config.pin_store_path))
        .with_context(|| format!("Failed to open pin store {:?}", config.pin_store_path))?;
    let tracker = PinnedJourneyTracker::new(enricher.clone(), store, TrackerConfig::default());
    match tracker.resume() {
        Ok(true) => info!("Resumed tracking of pinned journey"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Could not resume pinned journey"),
    }

    let state = AppState::new(enricher, stations, tracker);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Journey server listening on http://{}", config.listen_addr);
    info!("  GET    /health");
    info!("  GET    /api/journeys?station=UT&type=departures");
    info!("  GET    /api/trains/:number");
    info!("  GET    /api/pinned  (PUT to pin, DELETE to unpin)");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Fetch the station directory and keep it fresh in the background.
///
/// Without a key, or when the first fetch fails, the server starts with
/// an empty directory: truncations are then reported as written.
async fn load_stations(config: &AppConfig) -> Result<StationNames> {
    let Some(station_config) = config.stations() else {
        return Ok(StationNames::fixed(StationIndex::new()));
    };

    let client = StationClient::new(station_config).context("Failed to create station client")?;

    let names = match StationNames::fetch(client.clone()).await {
        Ok(names) => {
            info!(stations = names.len().await, "Loaded station directory");
            names
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch station directory, starting empty");
            StationNames::empty(client)
        }
    };

    let refresh = names.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match refresh.refresh().await {
                Ok(count) => info!(stations = count, "Refreshed station directory"),
                Err(e) => warn!(error = %e, "Failed to refresh station directory"),
            }
        }
    });

    Ok(names)
}

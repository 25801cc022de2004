//! Hotel back office server.
//!
//! Reads configuration from `HOTEL_CONFIG_DIR` (default `./config/hotel`),
//! serves the REST API and refreshes promotion statuses on a timer.

use std::sync::Arc;
use std::time::Duration;

use hotel_engine::api::{AppState, create_router};
use hotel_engine::config::ConfigLoader;
use hotel_engine::context::{RequestContext, SharedClock, SystemClock};
use hotel_engine::services::face::HttpFaceRecognizer;
use hotel_engine::services::promotions;
use hotel_engine::store::Store;
use tracing::{info, warn};

const DEFAULT_CONFIG_DIR: &str = "./config/hotel";

fn init_tracing(json: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hotel_engine=info"));
    // Ignored when a subscriber is already installed.
    let _ = if json {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
}

/// Runs the promotion sweep forever at `interval`.
async fn sweep_promotions(store: Store, clock: SharedClock, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let ctx = RequestContext::at(clock.now());
        match promotions::sweep(&store, &ctx).await {
            Ok(report) => info!(
                checked = report.checked,
                changed = report.changed,
                "Promotion sweep finished"
            ),
            Err(err) => warn!(error = %err, "Promotion sweep failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir =
        std::env::var("HOTEL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    init_tracing(config.metadata().server.json_logs);

    info!(
        hotel = %config.metadata().name,
        version = %config.metadata().version,
        config_dir = %config_dir,
        "Configuration loaded"
    );

    let face = HttpFaceRecognizer::new(config.config().integrations().face_recognition.clone())?;
    let bind_address = config.metadata().server.bind_address.clone();
    let sweep_interval = Duration::from_secs(config.policy().promotions.sweep_interval_seconds.max(1));

    let store = Store::new();
    let clock: SharedClock = Arc::new(SystemClock);
    tokio::spawn(sweep_promotions(store.clone(), clock.clone(), sweep_interval));

    let state = AppState::new(config, store, clock, Arc::new(face));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

//! BioBlood API Server
//!
//! Run with: cargo run --bin bioblood-api
//!
//! # Configuration
//!
//! Reads the `[server]` and `[logging]` sections of the config file.
//! Environment variables:
//! - `BIOBLOOD_SERVER_HOST`: Host to bind to (default: 0.0.0.0)
//! - `BIOBLOOD_SERVER_PORT`: Port to listen on (default: 5000)
//! - `BIOBLOOD_DATABASE`: SQLite file (default: bloodgroup.db)
//! - `BIOBLOOD_UPLOAD_DIR`: Where uploads are kept (default: uploads)
//! - `RUST_LOG`: Log filter (default: bioblood=info,tower_http=debug)

use bioblood::api::{serve, AppState, Database};
use bioblood::config::Config;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bioblood={},tower_http=debug", config.logging.level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting BioBlood API server v{}", env!("CARGO_PKG_VERSION"));

    let server = config.server;
    tracing::info!("Database: {}", server.database_path);
    tracing::info!("Upload directory: {}", server.upload_dir);
    tracing::info!("Default blood group: {}", server.default_blood_group);

    let db = Database::open(Path::new(&server.database_path))?;
    let state = AppState::new(db, server);

    serve(state).await?;

    tracing::info!("BioBlood API server stopped");
    Ok(())
}

//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::db::Database;
use super::predictor::Ensemble;
use crate::config::ServerConfig;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Users, predictions and the training queue
    pub db: Arc<Database>,
    /// Classifiers voting on uploads
    pub ensemble: Arc<Ensemble>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// State with the bundled ensemble answering the configured group
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let ensemble = Ensemble::bundled(config.default_blood_group);
        Self::with_ensemble(db, ensemble, config)
    }

    pub fn with_ensemble(db: Database, ensemble: Ensemble, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(db),
            ensemble: Arc::new(ensemble),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.upload_dir)
    }
}

//! # BioBlood
//!
//! Blood group detection from fingerprint images: the client core behind the
//! web front-end and the CLI, plus a local development backend.
//!
//! ## Modules
//!
//! - [`model`]: users, predictions, history and the wire schema
//! - [`session`]: who is logged in, mirrored into durable storage
//! - [`gateway`]: endpoint routing, live and stub transports, prediction fallback
//! - [`prediction`]: the upload/prediction/feedback state machine
//! - [`view`]: screen model, navigation guard, notices and formatting
//! - `config`: TOML + environment configuration (native only)
//! - `api`: axum + SQLite backend serving the same endpoints (native only)
//!
//! The first five compile for `wasm32-unknown-unknown` as well.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bioblood::gateway::{ApiGateway, ApiRoutes, GatewayMode};
//! use bioblood::model::SelectedFile;
//! use bioblood::prediction::PredictionFlow;
//! use bioblood::session::{MemoryStorage, SessionStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SessionStore::open(Arc::new(MemoryStorage::new()));
//!     let gateway = ApiGateway::for_mode(
//!         ApiRoutes::default(),
//!         GatewayMode::Demo,
//!         Duration::from_millis(500),
//!         Duration::from_secs(30),
//!     )?;
//!
//!     let mut flow = PredictionFlow::new();
//!     flow.select_file(SelectedFile::from_path("print.png".as_ref())?)
//!         .map_err(|notice| notice.message)?;
//!     flow.submit(&gateway, store.session()).await?;
//!
//!     if let Some(result) = flow.result() {
//!         println!("{}", result.prediction.blood_group);
//!     }
//!     Ok(())
//! }
//! ```

pub mod gateway;
pub mod model;
pub mod prediction;
pub mod session;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;

// Re-export top-level types for convenience
pub use model::{
    BloodGroup, Feedback, HistoryEntry, Prediction, PredictionUpload, Profile, SelectedFile, User,
    UserId, GUEST_USER_ID,
};

pub use session::{DurableStorage, MemoryStorage, Session, SessionError, SessionStore};

pub use gateway::{ApiGateway, ApiRoutes, GatewayError, GatewayMode, GatewayResult, Transport};

pub use prediction::{Completion, FlowError, FlowState, PredictionFlow};

pub use view::{render, NavState, Notice, Screen, Section, Tab};

#[cfg(not(target_arch = "wasm32"))]
pub use api::{build_router, serve, ApiError, AppState};

#[cfg(not(target_arch = "wasm32"))]
pub use config::{Config, ConfigError, LoggingConfig};

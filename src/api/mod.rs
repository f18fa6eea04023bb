//! BioBlood local backend
//!
//! Development backend serving the same endpoints the front end talks to,
//! built with Axum and SQLite.
//!
//! # Endpoints
//!
//! ## Accounts
//! - `POST /api/signup` - Create an account
//! - `POST /api/login` - Log in
//! - `GET /api/profile?user_id=` - Account details
//!
//! ## Predictions
//! - `POST /api/predict` - Multipart fingerprint upload
//! - `GET /api/history?user_id=` - Latest predictions
//! - `POST /api/feedback` - Correct a prediction
//!
//! ## Health
//! - `GET /api/health` - Service status
//!
//! # Example
//!
//! ```rust,ignore
//! use bioblood::api::{serve, AppState, Database};
//! use bioblood::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let db = Database::open(config.database_path.as_ref())?;
//!
//!     serve(AppState::new(db, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod dto;
pub mod error;
pub mod fingerprint;
pub mod predictor;
pub mod routes;
pub mod state;

pub use db::{Database, DbError};
pub use error::{ApiError, ApiResult};
pub use predictor::{Classifier, Ensemble, StaticClassifier};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        // Account routes
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/profile", get(routes::account::profile))
        .route("/history", get(routes::account::history))
        // Prediction routes
        .route("/feedback", post(routes::feedback::submit_feedback))
        .route(
            "/predict",
            post(routes::predict::predict).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/health", get(routes::health::health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Configured origins, or anything when the list is empty
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("BioBlood API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("BioBlood API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

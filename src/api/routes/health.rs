//! Health Route
//!
//! - GET /api/health - Liveness plus component status

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = state.db.ping();
    let models = state.ensemble.len();

    let status = if database_ok && models > 0 {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        message: "BioBlood API is running!".to_string(),
        database: if database_ok { "ok" } else { "error" }.to_string(),
        models,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

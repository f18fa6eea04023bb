//! Account Routes
//!
//! - POST /api/signup - Create an account
//! - POST /api/login - Check credentials

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::model::wire::{AuthResponse, LoginRequest, SignupRequest};

/// POST /api/signup
///
/// Duplicate emails are rejected with 400.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let name = req.name.trim();
    let email = req.email.trim();

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    let stored = state.db.create_user(name, email, &req.password)?;
    tracing::info!(user_id = stored.user.id, "User signed up");

    Ok(Json(AuthResponse {
        success: true,
        user: stored.user,
    }))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let stored = state
        .db
        .authenticate(req.email.trim(), &req.password)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    tracing::info!(user_id = stored.user.id, "User logged in");

    Ok(Json(AuthResponse {
        success: true,
        user: stored.user,
    }))
}

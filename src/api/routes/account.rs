//! Per-user Routes
//!
//! - GET /api/profile?user_id= - Account details
//! - GET /api/history?user_id= - Latest predictions

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::UserQuery;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::model::wire::{HistoryResponse, ProfileResponse};

/// GET /api/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .db
        .profile(query.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        profile,
    }))
}

/// GET /api/history
///
/// Newest first, at most ten entries. Unknown users get an empty list.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let history = state.db.history(query.user_id)?;

    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

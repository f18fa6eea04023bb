//! Feedback Route
//!
//! - POST /api/feedback - Record the actual blood group of a prediction

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::model::wire::FeedbackResponse;
use crate::model::Feedback;

/// POST /api/feedback
///
/// Stores the correction and queues the image for retraining.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Feedback>,
) -> ApiResult<Json<FeedbackResponse>> {
    let prediction_id = req
        .prediction_id
        .ok_or_else(|| ApiError::Validation("Missing prediction_id".to_string()))?;

    if !state.db.record_feedback(prediction_id, req.actual_blood_group)? {
        return Err(ApiError::NotFound(format!(
            "Prediction {} not found",
            prediction_id
        )));
    }

    Ok(Json(FeedbackResponse {
        success: true,
        message: "Feedback recorded for model improvement".to_string(),
    }))
}

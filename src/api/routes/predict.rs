//! Prediction Route
//!
//! - POST /api/predict - Multipart upload: `file`, `user_id`, optional
//!   `user_email` and `user_name`

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::fingerprint::validate_fingerprint;
use crate::api::state::AppState;
use crate::model::wire::PredictionResponse;
use crate::model::{SelectedFile, UserId, GUEST_USER_ID};

/// Parsed multipart form
#[derive(Debug, Default)]
struct PredictForm {
    file: Option<SelectedFile>,
    user_id: Option<UserId>,
    user_email: Option<String>,
}

/// POST /api/predict
///
/// Checks the image, saves the upload, runs the ensemble and stores the result.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<PredictionResponse>> {
    let form = read_form(multipart).await?;

    let file = form
        .file
        .ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;
    if !file.is_image() {
        return Err(ApiError::Validation(format!(
            "Unsupported file type {}; please upload an image",
            file.content_type
        )));
    }
    if file.bytes.is_empty() {
        return Err(ApiError::Validation("Uploaded file is empty".to_string()));
    }
    validate_fingerprint(&file.bytes).map_err(ApiError::Validation)?;

    let user_id = form.user_id.unwrap_or(GUEST_USER_ID);

    let prediction = state
        .ensemble
        .predict(&file.bytes)
        .ok_or_else(|| ApiError::Internal("No classifiers configured".to_string()))?;

    let image_path = save_upload(&state.upload_dir(), &file).await?;
    let prediction_id = state.db.insert_prediction(
        user_id,
        &image_path,
        prediction.blood_group,
        prediction.confidence,
    )?;

    tracing::info!(
        prediction_id,
        user_id,
        notify = form.user_email.is_some(),
        blood_group = %prediction.blood_group,
        confidence = prediction.confidence,
        "Prediction stored"
    );

    Ok(Json(PredictionResponse {
        success: true,
        prediction,
        prediction_id: Some(prediction_id),
    }))
}

async fn read_form(mut multipart: Multipart) -> ApiResult<PredictForm> {
    let mut form = PredictForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first_or_octet_stream()
                            .to_string()
                    });
                let bytes = field.bytes().await?;
                form.file = Some(SelectedFile::new(file_name, content_type, bytes.to_vec()));
            }
            "user_id" => {
                let text = field.text().await?;
                form.user_id = Some(text.trim().parse().map_err(|_| {
                    ApiError::Validation(format!("Invalid user_id: {}", text))
                })?);
            }
            "user_email" => form.user_email = Some(field.text().await?),
            // user_name and anything else is ignored
            _ => {}
        }
    }

    Ok(form)
}

/// Write the upload as `<dir>/<YYYYmmdd_HHMMSS>_<name>` and return that path
async fn save_upload(dir: &Path, file: &SelectedFile) -> ApiResult<String> {
    tokio::fs::create_dir_all(dir).await?;

    let base = Path::new(&file.name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    let path = dir.join(format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), base));

    tokio::fs::write(&path, &file.bytes).await?;
    Ok(path.to_string_lossy().to_string())
}

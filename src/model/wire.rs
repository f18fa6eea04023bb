//! Wire envelopes
//!
//! Request bodies and response envelopes shared by the client gateway and the
//! local backend. Producers always write the canonical keys; the aliases only
//! matter when reading from an older backend.

use serde::{Deserialize, Serialize};

use super::{HistoryEntry, Prediction, Profile, User};

fn default_success() -> bool {
    true
}

/// POST /api/signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response to signup and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(alias = "user")]
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(alias = "predictions", default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub prediction: Prediction,
    /// Row id of the stored prediction, when the backend keeps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<i64>,
}

/// Prediction bodies seen in the wild: the canonical envelope, or the flat
/// `{bloodGroup, confidence, message}` object older backends return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PredictionBody {
    Envelope(PredictionResponse),
    Flat(Prediction),
}

impl PredictionResponse {
    /// Decode any accepted prediction body into the canonical envelope
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let body: PredictionBody = serde_json::from_value(value)?;
        Ok(match body {
            PredictionBody::Envelope(envelope) => envelope,
            PredictionBody::Flat(prediction) => PredictionResponse {
                success: true,
                prediction,
                prediction_id: None,
            },
        })
    }
}

/// Failure body written by the local backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BloodGroup;
    use serde_json::json;

    #[test]
    fn test_history_accepts_predictions_key() {
        let response: HistoryResponse = serde_json::from_value(json!({
            "success": true,
            "predictions": [
                {"id": 1, "blood_group": "A+", "confidence": 0.95, "timestamp": "2024-01-01T00:00:00Z"}
            ]
        }))
        .unwrap();
        assert_eq!(response.history.len(), 1);

        let written = serde_json::to_value(&response).unwrap();
        assert!(written.get("history").is_some());
        assert!(written.get("predictions").is_none());
    }

    #[test]
    fn test_history_without_success_flag() {
        let response: HistoryResponse = serde_json::from_value(json!({"history": []})).unwrap();
        assert!(response.success);
        assert!(response.history.is_empty());
    }

    #[test]
    fn test_profile_accepts_user_key() {
        let response: ProfileResponse = serde_json::from_value(json!({
            "success": true,
            "user": {"id": 1, "name": "Demo User", "email": "demo@example.com"}
        }))
        .unwrap();
        assert_eq!(response.profile.name, "Demo User");
        assert_eq!(response.profile.member_since, "");
    }

    #[test]
    fn test_prediction_envelope_and_flat() {
        let envelope = PredictionResponse::from_value(json!({
            "success": true,
            "prediction": {
                "blood_group": "B-",
                "confidence": 0.67,
                "model_predictions": {"svm": "B-", "cnn": "B-", "random_forest": "O+"}
            }
        }))
        .unwrap();
        assert_eq!(envelope.prediction.blood_group, BloodGroup::BNegative);
        assert_eq!(envelope.prediction.model_predictions.len(), 3);

        let flat = PredictionResponse::from_value(json!({
            "bloodGroup": "A+",
            "confidence": 0.85,
            "message": "Mock prediction - Function App is working!"
        }))
        .unwrap();
        assert_eq!(flat.prediction.blood_group, BloodGroup::APositive);
        assert_eq!(flat.prediction.confidence, 0.85);
    }

    #[test]
    fn test_flat_prediction_matches_envelope() {
        let flat = PredictionResponse::from_value(json!({
            "bloodGroup": "O-",
            "confidence": 0.9
        }))
        .unwrap();
        let envelope = PredictionResponse::from_value(json!({
            "success": true,
            "prediction": {"blood_group": "O-", "confidence": 0.9}
        }))
        .unwrap();

        assert_eq!(flat, envelope);
    }

    #[test]
    fn test_prediction_rejects_garbage() {
        assert!(PredictionResponse::from_value(json!({"error": "boom"})).is_err());
    }
}

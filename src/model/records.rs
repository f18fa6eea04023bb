//! Domain records
//!
//! Users, predictions, history entries, profiles and feedback in their
//! canonical shape. Field aliases accept the spellings older backends used.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::BloodGroup;

/// User identifier as issued by the backend
pub type UserId = i64;

/// Identity used for uploads when nobody is logged in
pub const GUEST_USER_ID: UserId = 1;

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Result of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Ensemble answer
    #[serde(alias = "bloodGroup")]
    pub blood_group: BloodGroup,
    /// Share of models that agreed, 0.0 to 1.0
    pub confidence: f64,
    /// Individual answer per model, keyed by model name
    #[serde(default)]
    pub model_predictions: BTreeMap<String, BloodGroup>,
}

impl Prediction {
    /// The fixed prediction substituted whenever the prediction service fails
    pub fn canned() -> Self {
        let model_predictions = ["random_forest", "svm", "cnn"]
            .into_iter()
            .map(|model| (model.to_string(), BloodGroup::APositive))
            .collect();

        Self {
            blood_group: BloodGroup::APositive,
            confidence: 0.87,
            model_predictions,
        }
    }
}

/// A past prediction as listed by the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "blood_group", alias = "predicted_blood_group")]
    pub result: BloodGroup,
    pub confidence: f64,
    /// ISO 8601 timestamp as produced by the server
    #[serde(alias = "timestamp", alias = "prediction_date")]
    pub date: String,
}

/// Account details shown on the profile tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub member_since: String,
}

/// User correction for a past prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub prediction_id: Option<i64>,
    pub actual_blood_group: BloodGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_accepts_camel_case_group() {
        let prediction: Prediction =
            serde_json::from_str(r#"{"bloodGroup": "O-", "confidence": 0.67}"#).unwrap();
        assert_eq!(prediction.blood_group, BloodGroup::ONegative);
        assert!(prediction.model_predictions.is_empty());

        let written = serde_json::to_value(&prediction).unwrap();
        assert_eq!(written["blood_group"], "O-");
        assert!(written.get("bloodGroup").is_none());
    }

    #[test]
    fn test_history_entry_legacy_fields() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id": 4, "blood_group": "B+", "confidence": 0.95, "timestamp": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.id, Some(4));
        assert_eq!(entry.result, BloodGroup::BPositive);
        assert_eq!(entry.date, "2024-03-01T10:00:00Z");

        let flask: HistoryEntry = serde_json::from_str(
            r#"{"result": "A-", "confidence": 1.0, "date": "2024-03-01T10:00:00", "image_path": "uploads/x.png"}"#,
        )
        .unwrap();
        assert_eq!(flask.id, None);
        assert_eq!(flask.result, BloodGroup::ANegative);
    }

    #[test]
    fn test_canned_prediction() {
        let canned = Prediction::canned();
        assert_eq!(canned.blood_group, BloodGroup::APositive);
        assert_eq!(canned.confidence, 0.87);
        assert_eq!(canned.model_predictions.len(), 3);
        assert_eq!(canned.model_predictions["cnn"], BloodGroup::APositive);
    }
}

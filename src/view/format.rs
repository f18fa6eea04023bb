//! Display formatting shared by the front ends

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{HistoryEntry, Profile};

/// `0.873` -> `"87.3%"`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// ISO 8601 timestamp -> `MM/DD/YYYY`
///
/// Accepts RFC 3339, naive date-times (with or without fractional seconds)
/// and bare dates. Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%m/%d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One line of the history tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    pub result: String,
    pub confidence: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            date: format_date(&entry.date),
            result: entry.result.to_string(),
            confidence: format_confidence(entry.confidence),
        }
    }
}

pub fn history_rows(entries: &[HistoryEntry]) -> Vec<HistoryRow> {
    entries.iter().map(HistoryRow::from).collect()
}

/// Label/value pairs of the profile card
pub fn profile_rows(profile: &Profile) -> Vec<(&'static str, String)> {
    vec![
        ("Name", profile.name.clone()),
        ("Email", profile.email.clone()),
        ("Member Since", format_date(&profile.member_since)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BloodGroup;

    #[test]
    fn test_confidence() {
        assert_eq!(format_confidence(0.873), "87.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date("2024-03-05T10:00:00Z"), "03/05/2024");
        assert_eq!(format_date("2024-03-05T10:00:00.123456"), "03/05/2024");
        assert_eq!(format_date("2024-03-05 10:00:00"), "03/05/2024");
        assert_eq!(format_date("2024-03-05"), "03/05/2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_rows() {
        let rows = history_rows(&[HistoryEntry {
            id: Some(1),
            result: BloodGroup::ABNegative,
            confidence: 0.95,
            date: "2024-01-02T00:00:00Z".to_string(),
        }]);
        assert_eq!(
            rows[0],
            HistoryRow {
                date: "01/02/2024".to_string(),
                result: "AB-".to_string(),
                confidence: "95.0%".to_string(),
            }
        );

        let profile = profile_rows(&Profile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            member_since: String::new(),
        });
        assert_eq!(profile[2], ("Member Since", String::new()));
    }
}

//! Ensemble prediction
//!
//! Every classifier votes on the image; the majority wins. Ties go to the
//! group that comes first in [`BloodGroup::ALL`]. Confidence is the share of
//! classifiers that voted for the winner, rounded to two decimals.

use std::collections::BTreeMap;

use crate::model::{BloodGroup, Prediction};

/// Model names of the bundled ensemble
pub const BUNDLED_MODELS: [&str; 3] = ["random_forest", "svm", "cnn"];

/// One model of the ensemble
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, image: &[u8]) -> BloodGroup;
}

/// Answers the same group for every image
///
/// Stand-in used until trained models are plugged in.
#[derive(Debug, Clone)]
pub struct StaticClassifier {
    name: String,
    group: BloodGroup,
}

impl StaticClassifier {
    pub fn new(name: impl Into<String>, group: BloodGroup) -> Self {
        Self {
            name: name.into(),
            group,
        }
    }
}

impl Classifier for StaticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, _image: &[u8]) -> BloodGroup {
        self.group
    }
}

pub struct Ensemble {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl Ensemble {
    pub fn new(classifiers: Vec<Box<dyn Classifier>>) -> Self {
        Self { classifiers }
    }

    /// The three bundled models, all answering `group`
    pub fn bundled(group: BloodGroup) -> Self {
        Self::new(
            BUNDLED_MODELS
                .iter()
                .map(|name| Box::new(StaticClassifier::new(*name, group)) as Box<dyn Classifier>)
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// `None` when the ensemble has no classifiers
    pub fn predict(&self, image: &[u8]) -> Option<Prediction> {
        let votes: Vec<(String, BloodGroup)> = self
            .classifiers
            .iter()
            .map(|c| (c.name().to_string(), c.classify(image)))
            .collect();

        let groups: Vec<BloodGroup> = votes.iter().map(|(_, group)| *group).collect();
        let (blood_group, count) = majority_vote(&groups)?;
        let model_predictions: BTreeMap<String, BloodGroup> = votes.into_iter().collect();
        let confidence = round2(count as f64 / groups.len() as f64);

        tracing::debug!(%blood_group, confidence, "Ensemble vote");
        Some(Prediction {
            blood_group,
            confidence,
            model_predictions,
        })
    }
}

/// Winning group and its vote count
pub fn majority_vote(votes: &[BloodGroup]) -> Option<(BloodGroup, usize)> {
    let mut counts = [0usize; 8];
    for vote in votes {
        counts[vote.ordinal()] += 1;
    }

    BloodGroup::ALL
        .iter()
        .map(|group| (*group, counts[group.ordinal()]))
        .filter(|(_, count)| *count > 0)
        .fold(None, |best: Option<(BloodGroup, usize)>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensemble(groups: &[BloodGroup]) -> Ensemble {
        Ensemble::new(
            groups
                .iter()
                .enumerate()
                .map(|(i, g)| Box::new(StaticClassifier::new(format!("m{}", i), *g)) as Box<dyn Classifier>)
                .collect(),
        )
    }

    #[test]
    fn test_majority() {
        let prediction = ensemble(&[BloodGroup::BNegative, BloodGroup::OPositive, BloodGroup::BNegative])
            .predict(b"img")
            .unwrap();
        assert_eq!(prediction.blood_group, BloodGroup::BNegative);
        assert_eq!(prediction.confidence, 0.67);
        assert_eq!(prediction.model_predictions.len(), 3);
    }

    #[test]
    fn test_tie_goes_to_lowest_ordinal() {
        let votes = [BloodGroup::ABNegative, BloodGroup::OPositive, BloodGroup::BPositive];
        assert_eq!(majority_vote(&votes), Some((BloodGroup::BPositive, 1)));

        let votes = [BloodGroup::ONegative, BloodGroup::ANegative, BloodGroup::ONegative, BloodGroup::ANegative];
        assert_eq!(majority_vote(&votes), Some((BloodGroup::ANegative, 2)));
    }

    #[test]
    fn test_bundled_is_unanimous() {
        let prediction = Ensemble::bundled(BloodGroup::APositive).predict(&[]).unwrap();
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(
            prediction.model_predictions.keys().collect::<Vec<_>>(),
            vec!["cnn", "random_forest", "svm"]
        );
    }

    #[test]
    fn test_empty_ensemble() {
        assert!(Ensemble::new(Vec::new()).predict(b"img").is_none());
        assert_eq!(majority_vote(&[]), None);
    }
}

//! Static page content

pub const HOME_TITLE: &str = "Blood Group Detection";
pub const HOME_TAGLINE: &str = "Advanced fingerprint analysis using ensemble machine learning";

pub const ABOUT_TITLE: &str = "About the Project";
pub const ABOUT_SUMMARY: &str = "This system uses ensemble machine learning to detect blood groups from fingerprint images with high accuracy.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const HOME_STATS: [Stat; 3] = [
    Stat {
        value: "88.61%",
        label: "Accuracy",
    },
    Stat {
        value: "3",
        label: "Models",
    },
    Stat {
        value: "14K",
        label: "Images",
    },
];

pub const ABOUT_FEATURES: [Feature; 3] = [
    Feature {
        title: "Ensemble Learning",
        description: "Combines Random Forest, SVM, and CNN for robust predictions",
    },
    Feature {
        title: "Image Validation",
        description: "Advanced validation ensures only proper fingerprint images are processed",
    },
    Feature {
        title: "Self-Learning",
        description: "Continuously improves accuracy through user feedback",
    },
];

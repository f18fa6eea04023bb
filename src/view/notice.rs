//! User-visible notices (toasts)

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_DASHBOARD_DENIED: &str = "Please login to access dashboard";
pub const MSG_NOT_AN_IMAGE: &str = "Please select an image file";
pub const MSG_NO_FILE: &str = "Please select an image first";
pub const MSG_FEEDBACK_THANKS: &str =
    "Thank you for your feedback! This will help improve the model.";
pub const MSG_FEEDBACK_FAILED: &str = "Error saving feedback";
pub const MSG_LOGIN_OK: &str = "Login successful!";
pub const MSG_SIGNUP_OK: &str = "Account created successfully!";
pub const MSG_LOGOUT_OK: &str = "Logged out successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeLevel {
    /// CSS class used by the toast component
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Info => "info",
        }
    }
}

/// A short message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

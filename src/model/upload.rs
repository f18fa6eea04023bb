//! Prediction uploads
//!
//! The file a user picked plus the identity fields sent alongside it.

use super::{User, UserId, GUEST_USER_ID};

/// A file chosen for prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type reported by the picker or guessed from the extension
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Only `image/*` files may be submitted
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Read a file from disk, guessing its MIME type from the extension
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(name, content_type, bytes))
    }
}

/// Multipart body of POST /api/predict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionUpload {
    pub file: SelectedFile,
    pub user_id: UserId,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

impl PredictionUpload {
    /// Attach the caller's identity, falling back to the guest id
    pub fn new(file: SelectedFile, user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                file,
                user_id: user.id,
                user_email: Some(user.email.clone()),
                user_name: Some(user.name.clone()),
            },
            None => Self {
                file,
                user_id: GUEST_USER_ID,
                user_email: None,
                user_name: None,
            },
        }
    }

    /// Text fields in the order they are appended to the form
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("user_id", self.user_id.to_string())];
        if let Some(email) = &self.user_email {
            fields.push(("user_email", email.clone()));
        }
        if let Some(name) = &self.user_name {
            fields.push(("user_name", name.clone()));
        }
        fields
    }
}

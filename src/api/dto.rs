//! Data Transfer Objects
//!
//! Server-only request and response types. Bodies shared with the client
//! live in [`crate::model::wire`].

use serde::{Deserialize, Serialize};

use crate::model::{UserId, GUEST_USER_ID};

fn guest() -> UserId {
    GUEST_USER_ID
}

/// `?user_id=` on the profile and history endpoints
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default = "guest")]
    pub user_id: UserId,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// ISO 8601 time of the check
    pub timestamp: String,
    pub message: String,
    pub database: String,
    /// Classifiers in the ensemble
    pub models: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

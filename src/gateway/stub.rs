//! Stub transport
//!
//! Answers every endpoint with a canned success payload after an artificial
//! delay. Stands in for a backend that is not wired up yet; the payloads use
//! the canonical schema so swapping in a live transport changes nothing for
//! callers.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;

use super::error::{GatewayError, GatewayResult};
use super::routes::Endpoint;
use super::transport::{ApiRequest, ApiResponse, RequestBody, Transport};
use crate::model::wire::{
    AuthResponse, FeedbackResponse, HistoryResponse, LoginRequest, PredictionResponse,
    ProfileResponse, SignupRequest,
};
use crate::model::{BloodGroup, HistoryEntry, Prediction, Profile, User};

/// Delay applied before every stub response
pub const DEFAULT_STUB_DELAY: Duration = Duration::from_millis(500);

/// Name and id the stub hands out on login
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_ID: i64 = 1;
pub const DEMO_PROFILE_EMAIL: &str = "demo@example.com";

/// Transport that never touches the network
#[derive(Debug, Clone)]
pub struct StubTransport {
    delay: Duration,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new(DEFAULT_STUB_DELAY)
    }
}

impl StubTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn respond(&self, request: &ApiRequest) -> GatewayResult<Value> {
        let now = Utc::now();

        let body = match request.endpoint {
            Endpoint::Signup => {
                let signup: SignupRequest = json_body(request)?;
                serde_json::to_value(AuthResponse {
                    success: true,
                    user: User::new(now.timestamp_millis(), signup.name, signup.email),
                })?
            }
            Endpoint::Login => {
                let login: LoginRequest = json_body(request)?;
                serde_json::to_value(AuthResponse {
                    success: true,
                    user: User::new(DEMO_USER_ID, DEMO_USER_NAME, login.email),
                })?
            }
            Endpoint::Profile => serde_json::to_value(ProfileResponse {
                success: true,
                profile: Profile {
                    name: DEMO_USER_NAME.to_string(),
                    email: DEMO_PROFILE_EMAIL.to_string(),
                    member_since: now.to_rfc3339(),
                },
            })?,
            Endpoint::History => serde_json::to_value(HistoryResponse {
                success: true,
                history: vec![HistoryEntry {
                    id: Some(1),
                    result: BloodGroup::APositive,
                    confidence: 0.95,
                    date: now.to_rfc3339(),
                }],
            })?,
            Endpoint::Feedback => serde_json::to_value(FeedbackResponse {
                success: true,
                message: "Feedback recorded".to_string(),
            })?,
            Endpoint::Predict => serde_json::to_value(PredictionResponse {
                success: true,
                prediction: Prediction::canned(),
                prediction_id: None,
            })?,
        };

        Ok(body)
    }
}

fn json_body<T: serde::de::DeserializeOwned>(request: &ApiRequest) -> GatewayResult<T> {
    match &request.body {
        RequestBody::Json(value) => serde_json::from_value(value.clone())
            .map_err(|e| GatewayError::Request(e.to_string())),
        _ => Err(GatewayError::Request(format!(
            "{} expects a JSON body",
            request.endpoint.path()
        ))),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    gloo_timers::future::sleep(delay).await;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for StubTransport {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        tracing::debug!(endpoint = request.endpoint.path(), "Stub response");
        self.respond(&request).map(ApiResponse::ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(endpoint: Endpoint, body: RequestBody) -> ApiRequest {
        ApiRequest {
            endpoint,
            url: format!("http://localhost:5000{}", endpoint.path()),
            body,
        }
    }

    #[tokio::test]
    async fn test_login_returns_demo_user() {
        let stub = StubTransport::instant();
        let response = stub
            .send(request(
                Endpoint::Login,
                RequestBody::Json(json!({"email": "a@b.com", "password": "x"})),
            ))
            .await
            .unwrap();

        let auth: AuthResponse = serde_json::from_value(response.body).unwrap();
        assert_eq!(auth.user, User::new(1, "Demo User", "a@b.com"));
    }

    #[tokio::test]
    async fn test_signup_echoes_name_and_email() {
        let stub = StubTransport::instant();
        let response = stub
            .send(request(
                Endpoint::Signup,
                RequestBody::Json(json!({"name": "Ada", "email": "ada@example.com", "password": "pw"})),
            ))
            .await
            .unwrap();

        let auth: AuthResponse = serde_json::from_value(response.body).unwrap();
        assert_eq!(auth.user.name, "Ada");
        assert_eq!(auth.user.email, "ada@example.com");
        assert!(auth.user.id > 1);
    }

    #[tokio::test]
    async fn test_payloads_use_canonical_schema() {
        let stub = StubTransport::instant();

        let history = stub
            .send(request(Endpoint::History, RequestBody::Empty))
            .await
            .unwrap();
        assert!(history.body.get("history").is_some());
        let decoded: HistoryResponse = serde_json::from_value(history.body).unwrap();
        assert_eq!(decoded.history[0].result, BloodGroup::APositive);

        let profile = stub
            .send(request(Endpoint::Profile, RequestBody::Empty))
            .await
            .unwrap();
        let decoded: ProfileResponse = serde_json::from_value(profile.body).unwrap();
        assert_eq!(decoded.profile.email, DEMO_PROFILE_EMAIL);

        let feedback = stub
            .send(request(Endpoint::Feedback, RequestBody::Json(json!({}))))
            .await
            .unwrap();
        let decoded: FeedbackResponse = serde_json::from_value(feedback.body).unwrap();
        assert_eq!(decoded.message, "Feedback recorded");
    }

    #[tokio::test]
    async fn test_login_without_body_is_rejected() {
        let stub = StubTransport::instant();
        let err = stub
            .send(request(Endpoint::Login, RequestBody::Empty))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Request(_)));
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let delay = Duration::from_millis(30);
        let stub = StubTransport::new(delay);
        let started = std::time::Instant::now();
        stub.send(request(Endpoint::History, RequestBody::Empty))
            .await
            .unwrap();
        assert!(started.elapsed() >= delay);
    }
}

//! API gateway
//!
//! Typed access to the backend endpoints. URLs are resolved through
//! [`ApiRoutes`]; requests go out through one of two [`Transport`]s, one for
//! the data endpoints and one for the prediction service.
//!
//! Prediction failures never reach callers: [`ApiGateway::predict`] replaces
//! them with [`Prediction::canned`].

pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod live;
pub mod routes;
pub mod stub;
pub mod transport;

pub use error::{GatewayError, GatewayResult};
#[cfg(not(target_arch = "wasm32"))]
pub use live::LiveTransport;
pub use routes::{ApiRoutes, Endpoint, Method};
pub use stub::StubTransport;
pub use transport::{ApiRequest, ApiResponse, RequestBody, Transport};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::model::wire::{
    AuthResponse, FeedbackResponse, HistoryResponse, LoginRequest, PredictionResponse,
    ProfileResponse, SignupRequest,
};
use crate::model::{Feedback, HistoryEntry, Prediction, PredictionUpload, Profile, User, UserId};

/// Which transports serve which endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Data endpoints stubbed, prediction live
    #[default]
    Demo,
    /// Everything live
    Live,
    /// Everything stubbed
    Offline,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Demo => "demo",
            GatewayMode::Live => "live",
            GatewayMode::Offline => "offline",
        }
    }
}

impl fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(GatewayMode::Demo),
            "live" => Ok(GatewayMode::Live),
            "offline" => Ok(GatewayMode::Offline),
            other => Err(format!("Unknown API mode: {}", other)),
        }
    }
}

/// Client for the backend endpoints
#[derive(Clone)]
pub struct ApiGateway {
    routes: Arc<ApiRoutes>,
    data: Arc<dyn Transport>,
    prediction: Arc<dyn Transport>,
}

impl fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiGateway")
            .field("routes", &self.routes)
            .field("data", &self.data.name())
            .field("prediction", &self.prediction.name())
            .finish()
    }
}

impl ApiGateway {
    pub fn new(
        routes: ApiRoutes,
        data: Arc<dyn Transport>,
        prediction: Arc<dyn Transport>,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            data,
            prediction,
        }
    }

    /// Same transport for every endpoint
    pub fn with_transport(routes: ApiRoutes, transport: Arc<dyn Transport>) -> Self {
        Self::new(routes, transport.clone(), transport)
    }

    /// Wire up transports for `mode`, using `live` wherever real HTTP is wanted
    pub fn for_mode_with(
        routes: ApiRoutes,
        mode: GatewayMode,
        stub_delay: Duration,
        live: Arc<dyn Transport>,
    ) -> Self {
        let stub: Arc<dyn Transport> = Arc::new(StubTransport::new(stub_delay));
        match mode {
            GatewayMode::Demo => Self::new(routes, stub, live),
            GatewayMode::Live => Self::new(routes, live.clone(), live),
            GatewayMode::Offline => Self::new(routes, stub.clone(), stub),
        }
    }

    /// Native wiring with a reqwest transport
    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_mode(
        routes: ApiRoutes,
        mode: GatewayMode,
        stub_delay: Duration,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let live = Arc::new(LiveTransport::new(timeout)?);
        Ok(Self::for_mode_with(routes, mode, stub_delay, live))
    }

    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> String {
        self.routes.resolve(path)
    }

    fn transport_for(&self, endpoint: Endpoint) -> &Arc<dyn Transport> {
        if endpoint.is_prediction() {
            &self.prediction
        } else {
            &self.data
        }
    }

    async fn request(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: RequestBody,
    ) -> GatewayResult<Value> {
        let transport = self.transport_for(endpoint);
        let request = ApiRequest {
            endpoint,
            url: self.resolve(path),
            body,
        };

        tracing::debug!(
            transport = transport.name(),
            url = %request.url,
            "Sending request"
        );

        let response = transport.send(request).await?;
        check(response)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> GatewayResult<User> {
        let body = serde_json::to_value(SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let value = self
            .request(Endpoint::Signup, Endpoint::Signup.path(), RequestBody::Json(body))
            .await?;
        let auth: AuthResponse = serde_json::from_value(value)?;
        Ok(auth.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> GatewayResult<User> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let value = self
            .request(Endpoint::Login, Endpoint::Login.path(), RequestBody::Json(body))
            .await?;
        let auth: AuthResponse = serde_json::from_value(value)?;
        Ok(auth.user)
    }

    pub async fn profile(&self, user_id: UserId) -> GatewayResult<Profile> {
        let path = routes::with_user_id(Endpoint::Profile, user_id);
        let value = self
            .request(Endpoint::Profile, &path, RequestBody::Empty)
            .await?;
        let response: ProfileResponse = serde_json::from_value(value)?;
        Ok(response.profile)
    }

    pub async fn history(&self, user_id: UserId) -> GatewayResult<Vec<HistoryEntry>> {
        let path = routes::with_user_id(Endpoint::History, user_id);
        let value = self
            .request(Endpoint::History, &path, RequestBody::Empty)
            .await?;
        let response: HistoryResponse = serde_json::from_value(value)?;
        Ok(response.history)
    }

    /// Returns the server's confirmation message
    pub async fn feedback(&self, feedback: &Feedback) -> GatewayResult<String> {
        let body = serde_json::to_value(feedback)?;
        let value = self
            .request(Endpoint::Feedback, Endpoint::Feedback.path(), RequestBody::Json(body))
            .await?;
        let response: FeedbackResponse = serde_json::from_value(value)?;
        Ok(response.message)
    }

    /// Prediction request without the fallback
    pub async fn try_predict(&self, upload: PredictionUpload) -> GatewayResult<PredictionResponse> {
        let value = self
            .request(
                Endpoint::Predict,
                Endpoint::Predict.path(),
                RequestBody::Multipart(upload),
            )
            .await?;
        Ok(PredictionResponse::from_value(value)?)
    }

    /// Prediction request; any failure yields the canned prediction
    pub async fn predict(&self, upload: PredictionUpload) -> PredictionResponse {
        match self.try_predict(upload).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Prediction service failed, using canned prediction");
                PredictionResponse {
                    success: true,
                    prediction: Prediction::canned(),
                    prediction_id: None,
                }
            }
        }
    }
}

/// Turn a raw response into a body, or the error it carries
fn check(response: ApiResponse) -> GatewayResult<Value> {
    let error_text = response
        .body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string);

    if !response.is_success() {
        return Err(GatewayError::Status {
            status: response.status,
            message: error_text.unwrap_or_else(|| format!("HTTP {}", response.status)),
        });
    }

    if response.body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(GatewayError::Rejected(
            error_text.unwrap_or_else(|| "Request failed".to_string()),
        ));
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BloodGroup, SelectedFile};
    use crate::session::{MemoryStorage, SessionStore};
    use crate::view::NavState;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replies with a fixed response and remembers what it was sent
    struct ScriptedTransport {
        reply: GatewayResult<ApiResponse>,
        sent: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(reply: GatewayResult<ApiResponse>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<ApiRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
            self.sent.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    fn image_upload() -> PredictionUpload {
        PredictionUpload::new(SelectedFile::new("f.png", "image/png", vec![0u8; 4]), None)
    }

    fn stub_gateway() -> ApiGateway {
        ApiGateway::with_transport(ApiRoutes::default(), Arc::new(StubTransport::instant()))
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("LIVE".parse::<GatewayMode>().unwrap(), GatewayMode::Live);
        assert_eq!(" offline ".parse::<GatewayMode>().unwrap(), GatewayMode::Offline);
        assert!("mock".parse::<GatewayMode>().is_err());
        assert_eq!(GatewayMode::default(), GatewayMode::Demo);
    }

    #[tokio::test]
    async fn test_login_against_stub() {
        let user = stub_gateway().login("a@b.com", "x").await.unwrap();
        assert_eq!(user, User::new(1, "Demo User", "a@b.com"));
    }

    #[tokio::test]
    async fn test_login_is_remembered_and_greeted() {
        let storage = Arc::new(MemoryStorage::new());
        let user = stub_gateway().login("a@b.com", "x").await.unwrap();

        let mut store = SessionStore::open(storage.clone());
        store.save(user).unwrap();

        // a fresh start reads the same storage
        let reopened = SessionStore::open(storage);
        assert_eq!(reopened.user(), Some(&User::new(1, "Demo User", "a@b.com")));

        let nav = NavState::for_session(reopened.session());
        assert_eq!(
            nav,
            NavState::LoggedIn {
                greeting: "Welcome, Demo User".to_string()
            }
        );
        assert!(nav.shows_logout());
    }

    #[tokio::test]
    async fn test_prediction_network_failure_uses_canned() {
        let failing = ScriptedTransport::new(Err(GatewayError::Network("refused".to_string())));
        let gateway = ApiGateway::new(
            ApiRoutes::default(),
            Arc::new(StubTransport::instant()),
            failing.clone(),
        );

        let response = gateway.predict(image_upload()).await;
        assert!(response.success);
        assert_eq!(response.prediction, Prediction::canned());

        let sent = failing.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, format!("{}/api/predict", routes::DEFAULT_REMOTE_URL));
    }

    #[tokio::test]
    async fn test_prediction_bad_status_and_garbage_use_canned() {
        for reply in [
            ApiResponse {
                status: 500,
                body: json!({"error": "model crashed"}),
            },
            ApiResponse::ok(json!({"unexpected": true})),
        ] {
            let transport = ScriptedTransport::new(Ok(reply));
            let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
            let response = gateway.predict(image_upload()).await;
            assert_eq!(response.prediction.blood_group, BloodGroup::APositive);
            assert_eq!(response.prediction.confidence, 0.87);
        }
    }

    #[tokio::test]
    async fn test_try_predict_decodes_flat_body() {
        let transport = ScriptedTransport::new(Ok(ApiResponse::ok(json!({
            "bloodGroup": "AB-",
            "confidence": 0.67
        }))));
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
        let response = gateway.try_predict(image_upload()).await.unwrap();
        assert_eq!(response.prediction.blood_group, BloodGroup::ABNegative);
    }

    #[tokio::test]
    async fn test_feedback_network_failure_propagates() {
        let failing = ScriptedTransport::new(Err(GatewayError::Network("refused".to_string())));
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), failing);
        let err = gateway
            .feedback(&Feedback {
                prediction_id: Some(1),
                actual_blood_group: BloodGroup::ONegative,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[tokio::test]
    async fn test_status_error_carries_server_message() {
        let transport = ScriptedTransport::new(Ok(ApiResponse {
            status: 401,
            body: json!({"success": false, "error": "Invalid credentials"}),
        }));
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
        let err = gateway.login("a@b.com", "wrong").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Status {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );

        let transport = ScriptedTransport::new(Ok(ApiResponse {
            status: 404,
            body: json!("Not Found"),
        }));
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
        let err = gateway.profile(9).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_success_false_is_rejected() {
        let transport = ScriptedTransport::new(Ok(ApiResponse::ok(json!({
            "success": false,
            "error": "Email already exists"
        }))));
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
        let err = gateway.signup("A", "a@b.com", "pw").await.unwrap_err();
        assert_eq!(err, GatewayError::Rejected("Email already exists".to_string()));
    }

    #[tokio::test]
    async fn test_data_requests_follow_host() {
        let transport = ScriptedTransport::new(Ok(ApiResponse::ok(json!({"history": []}))));
        let gateway = ApiGateway::with_transport(
            ApiRoutes::for_host("app.example.com"),
            transport.clone(),
        );
        gateway.history(5).await.unwrap();

        let sent = transport.sent();
        assert_eq!(
            sent[0].url,
            format!("{}/api/history?user_id=5", routes::DEFAULT_REMOTE_URL)
        );
        assert_eq!(sent[0].method(), Method::Get);
    }

    #[tokio::test]
    async fn test_demo_mode_splits_transports() {
        let live = ScriptedTransport::new(Err(GatewayError::Timeout));
        let gateway = ApiGateway::for_mode_with(
            ApiRoutes::default(),
            GatewayMode::Demo,
            Duration::ZERO,
            live.clone(),
        );

        // data endpoints never reach the live transport in demo mode
        let history = gateway.history(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(live.sent().is_empty());

        let response = gateway.predict(image_upload()).await;
        assert_eq!(response.prediction, Prediction::canned());
        assert_eq!(live.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_live_predict_against_mock_server() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "prediction": {
                    "blood_group": "O+",
                    "confidence": 0.67,
                    "model_predictions": {"random_forest": "O+", "svm": "O+", "cnn": "B+"}
                },
                "prediction_id": 12
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/feedback"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let routes = ApiRoutes {
            local_url: server.uri(),
            prediction_url: server.uri(),
            ..ApiRoutes::default()
        };
        let gateway = ApiGateway::for_mode(
            routes,
            GatewayMode::Live,
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .unwrap();

        let response = gateway.predict(image_upload()).await;
        assert_eq!(response.prediction.blood_group, BloodGroup::OPositive);
        assert_eq!(response.prediction_id, Some(12));

        let err = gateway
            .feedback(&Feedback {
                prediction_id: Some(12),
                actual_blood_group: BloodGroup::BPositive,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 503, .. }));
    }
}

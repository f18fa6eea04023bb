//! Endpoint routing
//!
//! Maps logical endpoints to physical URLs. The prediction endpoint always
//! goes to the remote prediction service; everything else goes to the local
//! backend when the runtime host is a development host, otherwise to the
//! remote API.

use serde::{Deserialize, Serialize};

/// Local development backend
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:5000";

/// Hosted API and prediction function app
pub const DEFAULT_REMOTE_URL: &str =
    "https://bioblood-functions-ajgeg0e7hxhvcwg5.eastus-01.azurewebsites.net";

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Logical endpoints the front end talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Signup,
    Login,
    Profile,
    History,
    Feedback,
    Predict,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Signup => "/api/signup",
            Endpoint::Login => "/api/login",
            Endpoint::Profile => "/api/profile",
            Endpoint::History => "/api/history",
            Endpoint::Feedback => "/api/feedback",
            Endpoint::Predict => "/api/predict",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Profile | Endpoint::History => Method::Get,
            _ => Method::Post,
        }
    }

    pub fn is_prediction(&self) -> bool {
        matches!(self, Endpoint::Predict)
    }
}

/// Whether a logical path targets the prediction service
pub fn is_prediction_path(path: &str) -> bool {
    path.contains("/predict")
}

/// Base URLs plus the runtime host used to pick between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRoutes {
    pub local_url: String,
    pub remote_url: String,
    pub prediction_url: String,
    /// Host the front end is running on (`window.location.hostname` in the browser)
    pub host: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            local_url: DEFAULT_LOCAL_URL.to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            prediction_url: DEFAULT_REMOTE_URL.to_string(),
            host: "localhost".to_string(),
        }
    }
}

impl ApiRoutes {
    /// Default base URLs for a front end running on `host`
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn is_local_host(&self) -> bool {
        matches!(self.host.as_str(), "localhost" | "127.0.0.1")
    }

    /// Full URL for a logical path (which may carry a query string)
    ///
    /// Absolute URLs are returned untouched.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = if is_prediction_path(path) {
            &self.prediction_url
        } else if self.is_local_host() {
            &self.local_url
        } else {
            &self.remote_url
        };

        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

/// Path with a `user_id` query parameter
pub fn with_user_id(endpoint: Endpoint, user_id: i64) -> String {
    format!("{}?user_id={}", endpoint.path(), user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_always_remote() {
        for host in ["localhost", "127.0.0.1", "bioblood.example.org"] {
            let routes = ApiRoutes::for_host(host);
            assert_eq!(
                routes.resolve("/api/predict"),
                format!("{}/api/predict", DEFAULT_REMOTE_URL)
            );
        }
    }

    #[test]
    fn test_profile_local_on_dev_hosts() {
        assert_eq!(
            ApiRoutes::for_host("localhost").resolve("/profile"),
            "http://localhost:5000/profile"
        );
        assert_eq!(
            ApiRoutes::for_host("127.0.0.1").resolve("/profile"),
            "http://localhost:5000/profile"
        );
        assert_eq!(
            ApiRoutes::for_host("app.example.com").resolve("/profile"),
            format!("{}/profile", DEFAULT_REMOTE_URL)
        );
    }

    #[test]
    fn test_absolute_urls_untouched() {
        let routes = ApiRoutes::default();
        assert_eq!(
            routes.resolve("https://elsewhere.test/api/history"),
            "https://elsewhere.test/api/history"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let routes = ApiRoutes {
            local_url: "http://127.0.0.1:5000/".to_string(),
            ..ApiRoutes::default()
        };
        assert_eq!(
            routes.resolve(&with_user_id(Endpoint::History, 3)),
            "http://127.0.0.1:5000/api/history?user_id=3"
        );
    }

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::History.method(), Method::Get);
        assert_eq!(Endpoint::Predict.method(), Method::Post);
        assert!(Endpoint::Predict.is_prediction());
        assert!(is_prediction_path(Endpoint::Predict.path()));
        assert!(!is_prediction_path(Endpoint::Feedback.path()));
    }
}

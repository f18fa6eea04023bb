//! Transport abstraction
//!
//! The gateway hands fully resolved requests to a [`Transport`]. Which
//! implementation runs (canned stub, reqwest, gloo-net) is decided once at
//! startup; callers of the gateway never see the difference.

use async_trait::async_trait;
use serde_json::Value;

use super::error::GatewayResult;
use super::routes::{Endpoint, Method};
use crate::model::PredictionUpload;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(PredictionUpload),
}

/// A request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    /// Absolute URL including any query string
    pub url: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        self.endpoint.method()
    }
}

/// Raw response: status plus the body parsed as JSON when possible
///
/// Bodies that are not JSON are kept as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_text(status: u16, text: String) -> Self {
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to a backend, real or not
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Send a request; `Err` only for transport-level failures
    async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse>;
}

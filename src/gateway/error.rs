//! Gateway error types

use thiserror::Error;

/// Errors surfaced by the gateway for data endpoints
///
/// The prediction endpoint never returns these to callers; its failures are
/// replaced by the canned prediction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The transport could not reach the server
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the transport timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx status; `message` is the server's error text or `HTTP <status>`
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body carries `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Response body did not match the expected schema
    #[error("Parse error: {0}")]
    Decode(String),

    /// The request could not be assembled
    #[error("Request build error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() || e.is_request() {
            GatewayError::Network(e.to_string())
        } else if e.is_builder() {
            GatewayError::Request(e.to_string())
        } else {
            GatewayError::Decode(e.to_string())
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_displays_server_message() {
        let err = GatewayError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_decode_conversion() {
        let json_err = serde_json::from_str::<u32>("[]").unwrap_err();
        assert!(matches!(GatewayError::from(json_err), GatewayError::Decode(_)));
    }
}

//! Error types for the proxy server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Proxy Error Enum ==
/// Unified error type for the proxy server.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Missing or invalid parameter, or a malformed request body
    #[error("{0}")]
    BadRequest(String),

    /// Endpoint does not support the request method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The upstream round trip could not complete (DNS, connect, IO)
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Startup configuration could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Status code sent to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Network(_) | ProxyError::InvalidConfig(_) | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to clients. Server-side detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::BadRequest(msg) => msg.clone(),
            ProxyError::MethodNotAllowed => self.to_string(),
            ProxyError::Network(_) => "Proxy error".to_string(),
            ProxyError::InvalidConfig(_) | ProxyError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.client_message()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy server.
pub type Result<T> = std::result::Result<T, ProxyError>;

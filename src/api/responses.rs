// Response types for API endpoints

use crate::core::errors::GatewayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error response structure for non-JSON-RPC failures (auth, origin)
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub user: String,
    pub client: String,
    pub transport: String,
    pub protocol: String,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Headers advertising the protocol and transport identity on JSON-RPC
/// exchanges. Metadata for client capability negotiation only.
pub fn protocol_headers(protocol_version: &str) -> [(&'static str, String); 3] {
    [
        ("x-mcp-protocol", protocol_version.to_string()),
        ("x-mcp-transport", "http".to_string()),
        ("x-oauth-supported", "true".to_string()),
    ]
}

// Domain error types - secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or malformed Authorization header (HTTP 401)
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Token introspection failed (HTTP 401)
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Origin/transport guard rejection (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Tool name not declared by the active client profile
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments missing or of the wrong shape
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Memory backend call failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unexpected internal error (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Unauthenticated(_) => 401,
            GatewayError::InvalidToken => 401,
            GatewayError::Forbidden(_) => 403,
            GatewayError::UnknownTool(_) => 500,
            GatewayError::InvalidArguments(_) => 400,
            GatewayError::Backend(_) => 502,
            GatewayError::Configuration(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }

    /// Get user-facing error message. Internal detail stays in logs.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Unauthenticated(reason) => format!("Unauthenticated: {}", reason),
            GatewayError::InvalidToken => "Invalid or expired token".to_string(),
            GatewayError::Forbidden(reason) => format!("Forbidden: {}", reason),
            GatewayError::UnknownTool(name) => format!("Unknown tool: {}", name),
            GatewayError::InvalidArguments(detail) => format!("Invalid arguments: {}", detail),
            GatewayError::Backend(_) => "Memory backend unavailable".to_string(),
            GatewayError::Configuration(_) => "Internal error".to_string(),
            GatewayError::Internal(_) => "Internal error".to_string(),
        }
    }
}

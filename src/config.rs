// Configuration management

use crate::core::errors::GatewayError;
use serde::{Deserialize, Serialize};
use std::env;

/// How tool schemas are advertised during `initialize`.
///
/// Real deployments switch between the two, so this is configuration rather
/// than a hard-coded branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolDiscovery {
    /// Inline the full tool schema in the `initialize` capabilities for
    /// recent protocol versions; older versions get `{listChanged: true}`.
    Inline,
    /// Always advertise `{listChanged: true}` and require a `tools/list` call.
    Deferred,
}

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Identity advertised to clients
    pub server_name: String,
    pub server_version: String,
    /// Version advertised when the call itself negotiated none.
    pub default_protocol_version: String,

    // Token introspection
    pub jwt_secret: String,

    // Origin/transport guard
    pub allowed_origins: Vec<String>,
    /// Require https for non-loopback hosts.
    pub strict_origin: bool,

    // Protocol policy switches
    pub tool_discovery: ToolDiscovery,
    /// Legacy tolerance: answer GET /mcp with 204 instead of 405.
    pub legacy_get: bool,

    // Memory backend
    pub backend_base_url: String,
    pub backend_service_token: Option<String>,
    pub backend_timeout_secs: u64,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, GatewayError> {
        // Skip in test environment to avoid interfering with test environment variables
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_u16_or_default("PORT", 8080)?,
            server_name: Self::get_env_or_default("SERVER_NAME", "memory-gateway"),
            server_version: Self::get_env_or_default(
                "SERVER_VERSION",
                env!("CARGO_PKG_VERSION"),
            ),
            default_protocol_version: Self::get_env_or_default(
                "DEFAULT_PROTOCOL_VERSION",
                "2025-06-18",
            ),
            jwt_secret: Self::get_required_env("JWT_SECRET_KEY")?,
            allowed_origins: Self::parse_origins(
                &Self::get_env_or_default("ALLOWED_ORIGINS", Self::DEFAULT_ORIGINS),
            ),
            strict_origin: Self::parse_bool_or_default("STRICT_ORIGIN", false)?,
            tool_discovery: Self::parse_tool_discovery(&Self::get_env_or_default(
                "TOOL_DISCOVERY",
                "inline",
            ))?,
            legacy_get: Self::parse_bool_or_default("MCP_LEGACY_GET", true)?,
            backend_base_url: Self::get_required_env("MEMORY_BACKEND_URL")?,
            backend_service_token: Self::get_optional_env("MEMORY_BACKEND_TOKEN"),
            backend_timeout_secs: Self::parse_u64_or_default("MEMORY_BACKEND_TIMEOUT_SECS", 30)?,
            request_timeout_secs: Self::parse_u64_or_default("REQUEST_TIMEOUT_SECS", 60)?,
            body_size_limit_bytes: Self::parse_u64_or_default(
                "BODY_SIZE_LIMIT_BYTES",
                2 * 1024 * 1024,
            )? as usize,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "text"),
        };

        config.validate()?;

        Ok(config)
    }

    const DEFAULT_ORIGINS: &'static str =
        "https://claude.ai,https://app.claude.ai,https://api.claude.ai,http://localhost,https://localhost";

    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_optional_env(key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn get_required_env(key: &str) -> Result<String, GatewayError> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(GatewayError::Configuration(format!("{} not set", key))),
        }
    }

    fn parse_u16_or_default(key: &str, default: u16) -> Result<u16, GatewayError> {
        match env::var(key) {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| GatewayError::Configuration(format!("{} must be a number", key))),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, GatewayError> {
        match env::var(key) {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|_| GatewayError::Configuration(format!("{} must be a number", key))),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_or_default(key: &str, default: bool) -> Result<bool, GatewayError> {
        match env::var(key) {
            Ok(value) => match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                _ => Err(GatewayError::Configuration(format!(
                    "{} must be true or false",
                    key
                ))),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn parse_tool_discovery(raw: &str) -> Result<ToolDiscovery, GatewayError> {
        match raw.to_lowercase().as_str() {
            "inline" => Ok(ToolDiscovery::Inline),
            "deferred" => Ok(ToolDiscovery::Deferred),
            other => Err(GatewayError::Configuration(format!(
                "TOOL_DISCOVERY must be 'inline' or 'deferred', got '{}'",
                other
            ))),
        }
    }

    fn validate(&self) -> Result<(), GatewayError> {
        if self.allowed_origins.is_empty() {
            return Err(GatewayError::Configuration(
                "ALLOWED_ORIGINS must not be empty".to_string(),
            ));
        }
        if self.log_format != "json" && self.log_format != "text" {
            return Err(GatewayError::Configuration(
                "LOG_FORMAT must be 'json' or 'text'".to_string(),
            ));
        }
        if !self.backend_base_url.starts_with("http://")
            && !self.backend_base_url.starts_with("https://")
        {
            return Err(GatewayError::Configuration(
                "MEMORY_BACKEND_URL must be an http(s) URL".to_string(),
            ));
        }
        Ok(())
    }

    /// Fixed configuration for tests. No environment access.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            server_name: "memory-gateway".to_string(),
            server_version: "0.1.0".to_string(),
            default_protocol_version: "2025-06-18".to_string(),
            jwt_secret: "test-secret".to_string(),
            allowed_origins: Self::parse_origins(Self::DEFAULT_ORIGINS),
            strict_origin: false,
            tool_discovery: ToolDiscovery::Inline,
            legacy_get: true,
            backend_base_url: "http://127.0.0.1:9999".to_string(),
            backend_service_token: None,
            backend_timeout_secs: 5,
            request_timeout_secs: 5,
            body_size_limit_bytes: 2 * 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::test_config()
    }
}

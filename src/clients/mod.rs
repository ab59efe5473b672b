//! Client profiles: per-client tool declarations and handlers.
//!
//! A profile is a named bundle of tool schemas and argument handling for one
//! client integration. Lookup is by exact client-name string; unrecognized
//! names degrade to the default profile instead of failing, so a new client
//! family never breaks authentication that already succeeded.

pub mod claude;
pub mod default;

use crate::core::errors::GatewayError;
use crate::core::identity::RequestScope;
use crate::memory::MemoryBackend;
use crate::protocol::types::JsonRpcResponse;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub use claude::ClaudeProfile;
pub use default::DefaultProfile;

/// Per-client tool surface.
#[async_trait]
pub trait ClientProfile: Send + Sync {
    /// Profile name, matching the client name declared in the credential.
    fn name(&self) -> &'static str;

    /// Ordered tool descriptors, optionally with per-tool annotations.
    fn tools_schema(&self, include_annotations: bool) -> Vec<Value>;

    /// Resolve and invoke one tool against the memory backend.
    async fn handle_tool_call(
        &self,
        tool_name: &str,
        arguments: Value,
        backend: &dyn MemoryBackend,
        scope: &RequestScope,
    ) -> Result<Value, GatewayError>;

    /// Wrap a backend result in this profile's MCP result envelope.
    fn format_tool_response(&self, result: Value, id: Value) -> JsonRpcResponse {
        content_envelope(result, id)
    }
}

/// Look up the profile for a client name, falling back to the default.
pub fn get_profile(client_name: &str) -> Arc<dyn ClientProfile> {
    match client_name {
        "claude" => Arc::new(ClaudeProfile),
        _ => Arc::new(DefaultProfile),
    }
}

/// Standard MCP content-block result envelope.
pub fn content_envelope(result: Value, id: Value) -> JsonRpcResponse {
    let text = match result {
        Value::String(s) => s,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    };
    JsonRpcResponse::ok(
        id,
        json!({ "content": [{ "type": "text", "text": text }] }),
    )
}

/// Shared tool-name to backend-operation binding used by all profiles.
///
/// `tool_name` must already have passed the profile's own declaration check;
/// an unrecognized name here yields `UnknownTool`, which the dispatcher
/// converts to a JSON-RPC error rather than letting it propagate.
pub(crate) async fn execute_tool(
    tool_name: &str,
    arguments: &Value,
    backend: &dyn MemoryBackend,
    scope: &RequestScope,
) -> Result<Value, GatewayError> {
    let user_id = scope.user_id();
    match tool_name {
        "add_memories" => {
            let text = require_str(arguments, "text")?;
            let metadata = arguments
                .get("metadata")
                .cloned()
                .unwrap_or_else(|| json!({}));
            backend.add(user_id, text, metadata).await
        }
        "search_memory" => {
            let query = require_str(arguments, "query")?;
            let limit = arguments
                .get("limit")
                .and_then(Value::as_u64)
                .unwrap_or(10) as usize;
            let results = backend.search(user_id, query, limit).await?;
            Ok(serde_json::to_value(results)
                .map_err(|e| GatewayError::Internal(e.to_string()))?)
        }
        "ask_memory" => {
            let question = require_str(arguments, "question")?;
            let answer = backend.ask(user_id, question).await?;
            Ok(serde_json::to_value(answer)
                .map_err(|e| GatewayError::Internal(e.to_string()))?)
        }
        "deep_memory_query" => {
            let query = require_str(arguments, "query")?;
            backend.deep_query(user_id, query).await
        }
        "clear_memories" => {
            let confirm = arguments
                .get("confirm")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            backend.clear(user_id, confirm).await
        }
        other => Err(GatewayError::UnknownTool(other.to_string())),
    }
}

fn require_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, GatewayError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidArguments(format!("missing required '{}'", key)))
}

//! JSON-RPC dispatch state machine.
//!
//! Pure function of (message, request scope, client profile, backend,
//! config) producing a response, an error response, or nothing (for
//! notifications). The only side channel is the scope's deferred-work
//! collector. No state survives between calls.

use crate::clients::ClientProfile;
use crate::config::{Config, ToolDiscovery};
use crate::core::identity::RequestScope;
use crate::memory::MemoryBackend;
use crate::protocol::types::{codes, JsonRpcResponse};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Protocol versions whose clients understand inline tool schemas in the
/// `initialize` capabilities.
const INLINE_TOOLS_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26"];

/// Dispatch one decoded JSON-RPC message.
///
/// Returns `None` for notifications (messages without an `id`), which MUST
/// NOT receive a reply. Never returns an error: every failure below this
/// boundary is converted into a JSON-RPC error object.
pub async fn dispatch(
    message: &Value,
    scope: &RequestScope,
    profile: &dyn ClientProfile,
    backend: &dyn MemoryBackend,
    config: &Config,
) -> Option<JsonRpcResponse> {
    let Some(object) = message.as_object() else {
        // Non-object batch elements carry no id to suppress on.
        return Some(JsonRpcResponse::err(
            Value::Null,
            codes::INVALID_REQUEST,
            "Invalid Request",
        ));
    };

    let id = object.get("id").cloned().unwrap_or(Value::Null);
    let is_notification = id.is_null();
    let method = object.get("method").and_then(Value::as_str);

    let Some(method) = method else {
        if is_notification {
            return None;
        }
        return Some(JsonRpcResponse::err(
            id,
            codes::INVALID_REQUEST,
            "Invalid Request: missing method",
        ));
    };

    // A missing params object is an empty one, not an error.
    let params = object.get("params").cloned().unwrap_or_else(|| json!({}));

    debug!(
        method = %method,
        client = %scope.client_name(),
        notification = is_notification,
        "Dispatching MCP message"
    );

    if is_notification {
        match method {
            "notifications/initialized" | "notifications/cancelled" => {
                debug!(method = %method, "Acknowledged notification");
            }
            // A tool call without an id still performs its work; only the
            // reply is suppressed.
            "tools/call" => {
                let _ = handle_tool_call(&params, Value::Null, scope, profile, backend).await;
            }
            other => {
                debug!(method = %other, "Ignoring unexpected notification");
            }
        }
        return None;
    }

    let response = match method {
        "initialize" => handle_initialize(&params, id, scope, profile, config),
        "tools/list" => {
            JsonRpcResponse::ok(id, json!({ "tools": profile.tools_schema(true) }))
        }
        "tools/call" => handle_tool_call(&params, id, scope, profile, backend).await,
        "resources/list" => JsonRpcResponse::ok(id, json!({ "resources": [] })),
        "prompts/list" => JsonRpcResponse::ok(id, json!({ "prompts": [] })),
        "resources/templates/list" => JsonRpcResponse::ok(id, json!({ "templates": [] })),
        other => JsonRpcResponse::err(
            id,
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
        ),
    };

    Some(response)
}

fn handle_initialize(
    params: &Value,
    id: Value,
    scope: &RequestScope,
    profile: &dyn ClientProfile,
    config: &Config,
) -> JsonRpcResponse {
    // The client's requested version is echoed verbatim, never validated
    // against an allow-list.
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or("2024-11-05");
    scope.set_protocol_version(protocol_version);

    let inline_tools = config.tool_discovery == ToolDiscovery::Inline
        && INLINE_TOOLS_VERSIONS.contains(&protocol_version);
    let tools_capability = if inline_tools {
        json!(profile.tools_schema(true))
    } else {
        json!({ "listChanged": true })
    };

    debug!(
        protocol_version = %protocol_version,
        inline_tools,
        "Negotiated protocol version"
    );

    JsonRpcResponse::ok(
        id,
        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": tools_capability,
                "logging": {},
                "sampling": {}
            },
            "serverInfo": {
                "name": config.server_name,
                "version": config.server_version
            }
        }),
    )
}

async fn handle_tool_call(
    params: &Value,
    id: Value,
    scope: &RequestScope,
    profile: &dyn ClientProfile,
    backend: &dyn MemoryBackend,
) -> JsonRpcResponse {
    let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match profile
        .handle_tool_call(tool_name, arguments, backend, scope)
        .await
    {
        Ok(result) => profile.format_tool_response(result, id),
        Err(e) => {
            // Tool failures never propagate past this boundary.
            warn!(tool = %tool_name, error = %e, "Tool call failed");
            JsonRpcResponse::err(id, codes::INTERNAL_ERROR, e.to_string())
        }
    }
}

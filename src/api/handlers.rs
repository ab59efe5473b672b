// Request handlers for the MCP endpoint family

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::origin;
use crate::api::responses::{protocol_headers, ApiError, HealthResponse};
use crate::api::AppState;
use crate::clients::get_profile;
use crate::core::errors::GatewayError;
use crate::core::identity::{RequestScope, SessionIdentity};
use crate::protocol::dispatcher::dispatch;
use crate::protocol::types::JsonRpcResponse;

/// Main MCP endpoint: one JSON-RPC message or an ordered batch per call.
///
/// POST /mcp
///
/// Framing states: unauthenticated (middleware) -> origin-checked ->
/// body-parsed -> dispatched -> framed. The response is 200 with a JSON
/// object/array, 204 for a single notification, 400 with a parse-error
/// envelope for unreadable bodies, or 500 with a generic internal-error
/// envelope if anything below the dispatch boundary escapes.
pub async fn mcp_post(
    State(app_state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !check_origin(&headers, &app_state) {
        return ApiError::from(GatewayError::Forbidden("origin not allowed".to_string()))
            .into_response();
    }

    // Parse failure is the one case pairing a non-2xx status with a JSON-RPC
    // error body.
    let payload: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Malformed JSON-RPC body");
            return (StatusCode::BAD_REQUEST, Json(JsonRpcResponse::parse_error()))
                .into_response();
        }
    };

    let scope = RequestScope::new(identity);
    let profile = get_profile(scope.client_name());

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        user_id = %scope.user_id(),
        client = %scope.client_name(),
        batch = payload.is_array(),
        "MCP exchange"
    );

    let framed = match frame_exchange(&payload, &scope, profile.as_ref(), &app_state).await {
        Ok(response) => response,
        Err(e) => {
            // Outermost guarantee: nothing below the transport boundary
            // leaves as a bare failure. Detail stays server-side.
            error!(request_id = %request_id, error = %e, "Unhandled failure during MCP exchange");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(JsonRpcResponse::internal_error()),
            )
                .into_response()
        }
    };

    // Deferred work runs after framing, never awaited by the client's call.
    scope.spawn_deferred();

    framed
}

async fn frame_exchange(
    payload: &Value,
    scope: &RequestScope,
    profile: &dyn crate::clients::ClientProfile,
    app_state: &AppState,
) -> Result<Response, GatewayError> {
    let response = match payload {
        Value::Array(messages) => {
            // Strictly sequential: later messages may depend on side effects
            // queued by earlier ones within the same call.
            let mut responses = Vec::with_capacity(messages.len());
            for message in messages {
                if let Some(reply) = dispatch(
                    message,
                    scope,
                    profile,
                    app_state.backend.as_ref(),
                    &app_state.config,
                )
                .await
                {
                    responses.push(reply);
                }
            }
            debug!(
                requests = messages.len(),
                responses = responses.len(),
                "Batch dispatched"
            );
            (
                StatusCode::OK,
                exchange_headers(scope, app_state),
                Json(serde_json::to_value(responses).map_err(|e| {
                    GatewayError::Internal(format!("response serialization: {}", e))
                })?),
            )
                .into_response()
        }
        single => {
            match dispatch(
                single,
                scope,
                profile,
                app_state.backend.as_ref(),
                &app_state.config,
            )
            .await
            {
                Some(reply) => (
                    StatusCode::OK,
                    exchange_headers(scope, app_state),
                    Json(reply),
                )
                    .into_response(),
                // Notifications get no body at all.
                None => (StatusCode::NO_CONTENT, exchange_headers(scope, app_state))
                    .into_response(),
            }
        }
    };

    Ok(response)
}

fn exchange_headers(scope: &RequestScope, app_state: &AppState) -> [(&'static str, String); 3] {
    let version = scope
        .protocol_version()
        .unwrap_or_else(|| app_state.config.default_protocol_version.clone());
    protocol_headers(&version)
}

fn check_origin(headers: &HeaderMap, app_state: &AppState) -> bool {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let allowed = origin::validate(
        origin,
        scheme,
        host,
        &app_state.config.allowed_origins,
        app_state.config.strict_origin,
    );
    if !allowed {
        warn!(origin = ?origin, scheme = %scheme, host = %host, "Origin validation failed");
    }
    allowed
}

/// Compatibility shim for client versions that probe GET on the endpoint.
///
/// GET /mcp
///
/// Legacy tolerance answers 204 so the client does not enter a retry loop;
/// strict compliance answers 405. Deployment picks one via config. The
/// bearer credential is required either way.
pub async fn mcp_get(
    State(app_state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> Response {
    if app_state.config.legacy_get {
        debug!(user = %identity.email, "Legacy GET probe answered with 204");
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [("allow", "POST, OPTIONS, HEAD")],
        )
            .into_response()
    }
}

/// CORS preflight. No auth required.
///
/// OPTIONS /mcp
pub async fn mcp_options() -> Response {
    (
        StatusCode::OK,
        [
            ("access-control-allow-origin", "*"),
            ("access-control-allow-methods", "GET, POST, OPTIONS, HEAD"),
            (
                "access-control-allow-headers",
                "Content-Type, Authorization, Origin",
            ),
            ("access-control-max-age", "3600"),
        ],
        Json(serde_json::json!({ "status": "ok" })),
    )
        .into_response()
}

/// Discovery probe. No auth required, identifying headers, no body.
///
/// HEAD /mcp
pub async fn mcp_head(State(app_state): State<AppState>) -> Response {
    let [protocol, transport, oauth] =
        protocol_headers(&app_state.config.default_protocol_version);
    (
        StatusCode::OK,
        [
            ("content-type", "application/json".to_string()),
            ("access-control-allow-origin", "*".to_string()),
            protocol,
            transport,
            oauth,
        ],
    )
        .into_response()
}

/// Authenticated health check.
///
/// GET /mcp/health
pub async fn mcp_health(Extension(identity): Extension<SessionIdentity>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        user: identity.email,
        client: identity.client_name,
        transport: "http".to_string(),
        protocol: "MCP".to_string(),
    })
}

/// Public server/protocol identity. No auth.
///
/// GET /mcp/status
pub async fn mcp_status(State(app_state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "online",
        "transport": "http",
        "protocol": "MCP",
        "protocol_version": app_state.config.default_protocol_version,
        "oauth": "enabled",
        "serverInfo": {
            "name": app_state.config.server_name,
            "version": app_state.config.server_version
        }
    }))
}

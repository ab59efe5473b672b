// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer, extract::Request, http::StatusCode, BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod handlers;
pub mod origin;
pub mod responses;

use crate::auth::middleware::AuthState;
use crate::auth::token::TokenValidator;
use crate::config::Config;
use crate::memory::MemoryBackend;

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
/// Components must be Send + Sync for thread safety.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<dyn TokenValidator>,
    pub backend: Arc<dyn MemoryBackend>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Request timeout (tower::timeout) - global timeout with error conversion
/// - Body size limit (tower-http::limit)
/// - Tracing (tower-http::trace) - structured request logging
/// - Auth middleware - bearer extraction and introspection, applied per-route
///
/// Auth is skipped for CORS preflight (OPTIONS), discovery probes (HEAD),
/// and the public `/mcp/status` endpoint. Everything else requires a valid
/// bearer credential before any dispatch.
pub fn create_router(app_state: AppState) -> Router {
    use axum::extract::State;
    use axum::middleware::Next;
    use axum::routing::{get, post};

    let auth_state = Arc::new(AuthState {
        validator: app_state.validator.clone(),
    });

    let mut router = Router::new()
        .route(
            "/mcp",
            post(handlers::mcp_post)
                .get(handlers::mcp_get)
                .options(handlers::mcp_options)
                .head(handlers::mcp_head),
        )
        .route("/mcp/health", get(handlers::mcp_health))
        .route("/mcp/status", get(handlers::mcp_status));

    router = router.route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        |state: State<Arc<AuthState>>, request: Request, next: Next| async move {
            // Preflight and discovery probes on the protocol endpoint carry
            // no credentials; the status endpoint is deliberately public.
            // Other routes require auth for every method, probes included.
            let path = request.uri().path();
            let method = request.method();
            let is_probe =
                method == axum::http::Method::OPTIONS || method == axum::http::Method::HEAD;
            if (path == "/mcp" && is_probe) || path == "/mcp/status" {
                return Ok(next.run(request).await);
            }

            crate::auth::middleware::auth_middleware(state, request, next).await
        },
    ));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    router = router
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit));

    // HandleErrorLayer must come BEFORE timeout to catch the timeout error
    let middleware_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let status = if e.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .into_inner();

    router.layer(middleware_stack).with_state(app_state)
}

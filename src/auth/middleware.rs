// Axum authentication middleware

use crate::api::responses::ApiError;
use crate::auth::extract_bearer;
use crate::auth::token::TokenValidator;
use crate::core::errors::GatewayError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Authentication state shared by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn TokenValidator>,
}

/// Authentication middleware function
///
/// Extracts the bearer token from `Authorization`, introspects it, and sets
/// the resulting `SessionIdentity` in request extensions for handlers to
/// use. Runs before any dispatch: handlers never see an unauthenticated
/// message.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).ok_or_else(|| {
        ApiError::from(GatewayError::Unauthenticated(
            "missing bearer credentials".to_string(),
        ))
    })?;

    let identity = auth_state
        .validator
        .authenticate(&token)
        .await
        .map_err(ApiError::from)?;

    debug!(
        user_id = %identity.user_id,
        client = %identity.client_name,
        "Authenticated request"
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// Bearer credential handling

pub mod middleware;
pub mod token;

pub use middleware::{auth_middleware, AuthState};
pub use token::{JwtValidator, TokenValidator};

use axum::http::{header, HeaderMap};

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Returns `None` when the header is missing or not of bearer form; the
/// scheme match is case-insensitive.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

// Authentication boundary tests

use crate::common::*;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use memory_gateway::api::{create_router, AppState};
use memory_gateway::auth::token::JwtValidator;
use memory_gateway::config::Config;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn post_without_credentials_is_401() {
    let backend = Arc::new(MockBackend::default());
    let app = test_app(backend.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(backend.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn post_with_invalid_token_is_401() {
    let backend = Arc::new(MockBackend::default());
    let app = test_app(backend);

    let request = mcp_request(
        "garbage-token",
        &json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_authorization_scheme_is_401() {
    let backend = Arc::new(MockBackend::default());
    let app = test_app(backend);

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn real_jwt_round_trip_through_the_router() {
    let backend = Arc::new(MockBackend::default());
    let config = Config::test_config();
    let app = create_router(AppState {
        validator: Arc::new(JwtValidator::new(&config.jwt_secret)),
        backend: backend.clone(),
        config: Arc::new(config.clone()),
    });

    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": "user-42",
            "email": "someone@example.com",
            "client": "claude",
            "exp": chrono::Utc::now().timestamp() + 3600
        }),
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let request = mcp_request(
        &token,
        &json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": "add_memories", "arguments": { "text": "jwt worked" } }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls[0].1["user_id"], json!("user-42"));
}

#[tokio::test]
async fn expired_jwt_is_rejected() {
    let backend = Arc::new(MockBackend::default());
    let config = Config::test_config();
    let app = create_router(AppState {
        validator: Arc::new(JwtValidator::new(&config.jwt_secret)),
        backend,
        config: Arc::new(config.clone()),
    });

    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": "user-42",
            "exp": chrono::Utc::now().timestamp() - 600
        }),
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let request = mcp_request(
        &token,
        &json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

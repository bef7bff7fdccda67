#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use bank_auth::{
    app::build_router,
    config::Config,
    repos::{InMemoryUserStore, UserStore},
    services::auth::{Argon2PasswordHasher, ExtraClaims, TokenCodec},
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET_B64: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET_B64.to_string()),
        "ACCESS_TOKEN_TTL_SECONDS" => Some("3600".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::from_base64_secret(SECRET_B64).expect("codec"))
}

/// State over an empty in-memory store with a cheap Argon2 profile.
pub fn test_state() -> AppState {
    state_with_store(Arc::new(InMemoryUserStore::new()))
}

pub fn state_with_store(store: Arc<dyn UserStore>) -> AppState {
    let hasher = Argon2PasswordHasher::new(Params::new(1024, 1, 1, None).expect("params"));
    AppState::with_store(
        store,
        Arc::new(hasher),
        codec(),
        Duration::from_secs(3600),
    )
    .expect("state")
}

pub fn app() -> Router {
    build_router(test_state(), &test_config())
}

pub fn token_for(subject: &str, ttl: Duration) -> String {
    codec()
        .encode(subject, &ExtraClaims::new(), ttl)
        .expect("token")
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_token(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub const JOHN: &str = r#"{
    "email": "john@example.com",
    "password": "password123",
    "firstName": "John",
    "lastName": "Doe"
}"#;

/// Register John and return the issued token.
pub async fn register_john(app: &Router) -> String {
    let res = send(app, json_request("POST", "/api/v1/auth/register", JOHN)).await;
    assert_eq!(res.status(), 201);
    read_json(res).await["token"].as_str().unwrap().to_string()
}

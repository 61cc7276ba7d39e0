use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tally_api_rust::{app, store::MemoryStore, AppState};

/// Fresh app over the in-memory document adapter. Each test gets its own
/// isolated store.
pub fn test_app() -> Router {
    app(AppState {
        store: Arc::new(MemoryStore::new()),
    })
}

/// Drive one request through the router and decode the JSON body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

/// Register a user and return their bearer token.
pub async fn register(app: &Router, username: &str) -> Result<String> {
    let (status, body) = request(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "register failed: {}", body);

    Ok(body["token"]
        .as_str()
        .expect("register response carries a token")
        .to_string())
}

/// Create an expense and return its id.
pub async fn add_expense(app: &Router, token: &str, fields: Value) -> Result<i64> {
    let (status, body) = request(app, "POST", "/api/expenses", Some(token), Some(fields)).await?;
    anyhow::ensure!(status == StatusCode::OK, "add expense failed: {}", body);

    Ok(body["expense"]["id"]
        .as_i64()
        .expect("created expense carries an id"))
}

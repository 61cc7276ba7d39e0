mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_returns_token_and_user() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "alice", "password": "password123" })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["id"].is_i64());
    Ok(())
}

#[tokio::test]
async fn register_requires_username_and_password() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Username and password required" }));
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> Result<()> {
    let app = common::test_app();
    common::register(&app, "alice").await?;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "alice", "password": "other-password" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Username already exists" }));
    Ok(())
}

#[tokio::test]
async fn login_succeeds_with_correct_password() -> Result<()> {
    let app = common::test_app();
    common::register(&app, "alice").await?;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "password123" })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_issues_no_token() -> Result<()> {
    let app = common::test_app();
    common::register(&app, "alice").await?;

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user_is_indistinguishable() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "nobody", "password": "password123" })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(&app, "GET", "/api/expenses", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Access token required" }));
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_invalid_tokens() -> Result<()> {
    let app = common::test_app();

    let (status, body) =
        common::request(&app, "GET", "/api/expenses", Some("not-a-real-token"), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Invalid token" }));
    Ok(())
}

#[tokio::test]
async fn public_endpoints_need_no_auth() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::request(&app, "GET", "/api/status", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage_mode"], "memory");

    let (status, body) = common::request(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

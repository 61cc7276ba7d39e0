use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::models::CredentialsPayload;
use crate::AppState;

/// POST /api/register - Create an account and receive a token
///
/// Expected Input:
/// ```json
/// {
///   "username": "string",   // Required
///   "password": "string"    // Required
/// }
/// ```
///
/// Duplicate usernames fail with 400 `Username already exists`.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = payload.validate().map_err(ApiError::bad_request)?;

    if state.store.find_user(&username).await?.is_some() {
        return Err(ApiError::conflict("Username already exists"));
    }

    let password_hash = auth::hash_password(&password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Internal server error")
    })?;

    let user = state.store.create_user(&username, &password_hash).await?;

    let token = auth::generate_jwt(Claims::new(user.id, user.username.clone())).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Internal server error")
    })?;

    Ok(Json(json!({
        "message": "User created successfully",
        "token": token,
        "user": { "id": user.id, "username": user.username },
    })))
}

/// POST /api/login - Authenticate and receive a token
///
/// Unknown users and wrong passwords are indistinguishable: both answer
/// 401 `Invalid credentials`.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = payload.validate().map_err(ApiError::bad_request)?;

    let Some(user) = state.store.find_user(&username).await? else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let valid = auth::verify_password(&password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal_server_error("Internal server error")
    })?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::generate_jwt(Claims::new(user.id, user.username.clone())).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Internal server error")
    })?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": { "id": user.id, "username": user.username },
    })))
}

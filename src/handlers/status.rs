use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::AppState;

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Tally API",
        "version": version,
        "description": "Personal expense tracking API",
        "endpoints": {
            "auth": "/api/register, /api/login (public)",
            "expenses": "/api/expenses[/:id] (protected)",
            "blog_posts": "/api/blog-posts[/:id] (protected)",
            "budgets": "/api/budgets[/:category] (protected)",
            "dashboard": "/api/dashboard (protected)",
            "status": "/api/status (public)",
            "health": "/health (public)",
        }
    }))
}

/// GET /api/status - Which backend is serving, without auth
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage_mode": state.store.backend_name(),
    }))
}

/// GET /health - Liveness probe including a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "storage": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "storage_error": e.to_string(),
                "timestamp": now,
            })),
        ),
    }
}

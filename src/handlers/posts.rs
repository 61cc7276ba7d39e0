use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{BlogPost, BlogPostPayload};
use crate::AppState;

/// GET /api/blog-posts - List the caller's posts, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = state.store.list_posts(user.user_id).await?;
    Ok(Json(posts))
}

/// POST /api/blog-posts
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BlogPostPayload>,
) -> Result<Json<Value>, ApiError> {
    let input = payload.validate().map_err(ApiError::bad_request)?;
    let post = state.store.create_post(user.user_id, &input).await?;

    Ok(Json(json!({
        "message": "Blog post created successfully",
        "post": post,
    })))
}

/// PUT /api/blog-posts/:id - same silent no-op rule as expenses
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPostPayload>,
) -> Result<Json<Value>, ApiError> {
    let input = payload.validate().map_err(ApiError::bad_request)?;
    state.store.update_post(user.user_id, id, &input).await?;

    Ok(Json(json!({ "message": "Blog post updated successfully" })))
}

/// DELETE /api/blog-posts/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_post(user.user_id, id).await?;

    Ok(Json(json!({ "message": "Blog post deleted successfully" })))
}

use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{BudgetLimit, BudgetPayload};
use crate::AppState;

/// GET /api/budgets - List the caller's category thresholds
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BudgetLimit>>, ApiError> {
    let budgets = state.store.list_budgets(user.user_id).await?;
    Ok(Json(budgets))
}

/// PUT /api/budgets - Set the threshold for a category
///
/// Upsert-by-category: a second PUT for the same category replaces the
/// previous threshold.
pub async fn upsert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<BudgetPayload>,
) -> Result<Json<Value>, ApiError> {
    let (category, threshold) = payload.validate().map_err(ApiError::bad_request)?;
    state
        .store
        .upsert_budget(user.user_id, &category, threshold)
        .await?;

    Ok(Json(json!({ "message": "Budget updated successfully" })))
}

/// DELETE /api/budgets/:category - Idempotent removal
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(category): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_budget(user.user_id, &category).await?;

    Ok(Json(json!({ "message": "Budget removed successfully" })))
}

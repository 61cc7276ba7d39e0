use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Expense, ExpensePayload, ExpenseStatus};
use crate::store::ExpenseFilter;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub category: Option<String>,
    pub status: Option<ExpenseStatus>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    pub term: Option<String>,
}

impl From<ExpenseListQuery> for ExpenseFilter {
    fn from(query: ExpenseListQuery) -> Self {
        ExpenseFilter {
            category: query.category,
            status: query.status,
            start_date: query.start_date,
            end_date: query.end_date,
            term: query.term,
        }
    }
}

/// GET /api/expenses - List the caller's expenses, newest first
///
/// Optional query filters: category, status, start_date/end_date (inclusive),
/// term. A filter that matches nothing returns an empty array.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = state
        .store
        .list_expenses(user.user_id, &query.into())
        .await?;
    Ok(Json(expenses))
}

/// POST /api/expenses - Record an expense
///
/// Status is derived from balance_due; anything the client sends for it is
/// ignored.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Value>, ApiError> {
    let input = payload.validate().map_err(ApiError::bad_request)?;
    let expense = state.store.create_expense(user.user_id, &input).await?;

    Ok(Json(json!({
        "message": "Expense added successfully",
        "expense": expense,
    })))
}

/// PUT /api/expenses/:id - Replace an expense's fields
///
/// An id that does not belong to the caller changes nothing and still
/// answers with the success message.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Value>, ApiError> {
    let input = payload.validate().map_err(ApiError::bad_request)?;
    state.store.update_expense(user.user_id, id, &input).await?;

    Ok(Json(json!({ "message": "Expense updated successfully" })))
}

/// DELETE /api/expenses/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_expense(user.user_id, id).await?;

    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}

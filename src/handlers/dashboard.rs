use axum::{
    extract::{Extension, State},
    response::Json,
};

use crate::dashboard::{build_report, DashboardReport};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::store::ExpenseFilter;
use crate::AppState;

/// GET /api/dashboard - Aggregate the caller's full expense set
///
/// Read-only: loads the unfiltered expense snapshot plus the budget
/// thresholds and reduces them in one pass, whichever backend is active.
pub async fn report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardReport>, ApiError> {
    let expenses = state
        .store
        .list_expenses(user.user_id, &ExpenseFilter::default())
        .await?;
    let budgets = state.store.list_budgets(user.user_id).await?;

    Ok(Json(build_report(
        &expenses,
        budgets,
        state.store.backend_name(),
    )))
}

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store::Store;

/// Shared per-request context: just the storage handle. Passed explicitly so
/// tests can swap in the memory adapter.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::status::root))
        .route("/health", get(handlers::status::health))
        .route("/api/status", get(handlers::status::status))
        .merge(auth_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    use handlers::{budgets, dashboard, expenses, posts};

    Router::new()
        // Expense records
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/:id",
            put(expenses::update).delete(expenses::remove),
        )
        // Blog-style notes
        .route("/api/blog-posts", get(posts::list).post(posts::create))
        .route(
            "/api/blog-posts/:id",
            put(posts::update).delete(posts::remove),
        )
        // Category thresholds
        .route("/api/budgets", get(budgets::list).put(budgets::upsert))
        .route("/api/budgets/:category", delete(budgets::remove))
        // Read-only aggregate
        .route("/api/dashboard", get(dashboard::report))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

//! Storage port: one interface over the record kinds regardless of backing
//! engine. Handlers depend only on [`Store`]; the adapters own the layout.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppConfig, StorageMode};
use crate::models::{
    BlogPost, BlogPostInput, BudgetLimit, Expense, ExpenseInput, ExpenseStatus, User,
};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors surfaced by the storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Optional listing filters for expenses. All fields conjunctive; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub status: Option<ExpenseStatus>,
    /// Inclusive bounds compared against the ISO-8601 `date_time` key.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub term: Option<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if &expense.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if expense.status != status {
                return false;
            }
        }
        if let Some(start) = &self.start_date {
            if expense.date_time.as_str() < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end_date {
            if expense.date_time.as_str() > end.as_str() {
                return false;
            }
        }
        if let Some(term) = &self.term {
            if expense.session_term.as_deref() != Some(term.as_str()) {
                return false;
            }
        }
        true
    }
}

/// The storage port. Every query and mutation is scoped by the caller's
/// user id; a mutation whose id does not belong to that user is a silent
/// no-op, mirroring `UPDATE .. WHERE id = ? AND user_id = ?` semantics.
#[async_trait]
pub trait Store: Send + Sync {
    /// Identifier of the backing engine, surfaced by /api/status and the
    /// dashboard response.
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;

    // Users
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    // Expenses
    async fn list_expenses(
        &self,
        user_id: i64,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, StoreError>;
    async fn create_expense(
        &self,
        user_id: i64,
        input: &ExpenseInput,
    ) -> Result<Expense, StoreError>;
    async fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<(), StoreError>;
    async fn delete_expense(&self, user_id: i64, id: i64) -> Result<(), StoreError>;

    // Blog posts
    async fn list_posts(&self, user_id: i64) -> Result<Vec<BlogPost>, StoreError>;
    async fn create_post(
        &self,
        user_id: i64,
        input: &BlogPostInput,
    ) -> Result<BlogPost, StoreError>;
    async fn update_post(
        &self,
        user_id: i64,
        id: i64,
        input: &BlogPostInput,
    ) -> Result<(), StoreError>;
    async fn delete_post(&self, user_id: i64, id: i64) -> Result<(), StoreError>;

    // Budget thresholds
    async fn list_budgets(&self, user_id: i64) -> Result<Vec<BudgetLimit>, StoreError>;
    async fn upsert_budget(
        &self,
        user_id: i64,
        category: &str,
        threshold: f64,
    ) -> Result<(), StoreError>;
    async fn delete_budget(&self, user_id: i64, category: &str) -> Result<(), StoreError>;
}

/// Build the configured store adapter.
pub async fn from_config(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.storage.mode {
        StorageMode::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageMode::Sqlite => {
            let store = SqliteStore::connect(&config.storage.connection_url()).await?;
            Ok(Arc::new(store))
        }
    }
}

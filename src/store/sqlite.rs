//! Relational adapter backed by sqlx/SQLite.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::models::{BlogPost, BlogPostInput, BudgetLimit, Expense, ExpenseInput, User};
use crate::store::{ExpenseFilter, Store, StoreError};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating the file if needed) and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new().connect(url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        info!("Connected to SQLite database: {}", url);
        Ok(store)
    }

    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent schema creation, run once at startup.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date_time TEXT NOT NULL,
                category TEXT NOT NULL,
                session_term TEXT,
                recipient TEXT NOT NULL,
                description TEXT NOT NULL,
                amount_paid REAL NOT NULL,
                balance_due REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'Paid',
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                date_time TEXT NOT NULL,
                category TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS budget_limits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                threshold REAL NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                UNIQUE (user_id, category)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn map_unique_violation(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let created_at = Utc::now();
        let result =
            sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
                .bind(username)
                .bind(password_hash)
                .bind(created_at)
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, "Username already exists"))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    async fn list_expenses(
        &self,
        user_id: i64,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, StoreError> {
        let mut sql = String::from("SELECT * FROM expenses WHERE user_id = ?");
        let mut binds: Vec<String> = Vec::new();

        if let Some(category) = &filter.category {
            sql.push_str(" AND category = ?");
            binds.push(category.clone());
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(start) = &filter.start_date {
            sql.push_str(" AND date_time >= ?");
            binds.push(start.clone());
        }
        if let Some(end) = &filter.end_date {
            sql.push_str(" AND date_time <= ?");
            binds.push(end.clone());
        }
        if let Some(term) = &filter.term {
            sql.push_str(" AND session_term = ?");
            binds.push(term.clone());
        }
        sql.push_str(" ORDER BY date_time DESC");

        let mut query = sqlx::query_as::<_, Expense>(&sql).bind(user_id);
        for value in binds {
            query = query.bind(value);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn create_expense(
        &self,
        user_id: i64,
        input: &ExpenseInput,
    ) -> Result<Expense, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO expenses (user_id, date_time, category, session_term, recipient, \
             description, amount_paid, balance_due, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&input.date_time)
        .bind(&input.category)
        .bind(&input.session_term)
        .bind(&input.recipient)
        .bind(&input.description)
        .bind(input.amount_paid)
        .bind(input.balance_due)
        .bind(input.status)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Expense {
            id: result.last_insert_rowid(),
            user_id,
            date_time: input.date_time.clone(),
            category: input.category.clone(),
            session_term: input.session_term.clone(),
            recipient: input.recipient.clone(),
            description: input.description.clone(),
            amount_paid: input.amount_paid,
            balance_due: input.balance_due,
            status: input.status,
            created_at,
        })
    }

    async fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<(), StoreError> {
        // 0 affected rows (unknown id or foreign owner) is not an error
        sqlx::query(
            "UPDATE expenses SET date_time = ?, category = ?, session_term = ?, recipient = ?, \
             description = ?, amount_paid = ?, balance_due = ?, status = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&input.date_time)
        .bind(&input.category)
        .bind(&input.session_term)
        .bind(&input.recipient)
        .bind(&input.description)
        .bind(input.amount_paid)
        .bind(input.balance_due)
        .bind(input.status)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_expense(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_posts(&self, user_id: i64) -> Result<Vec<BlogPost>, StoreError> {
        let posts = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE user_id = ? ORDER BY date_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn create_post(
        &self,
        user_id: i64,
        input: &BlogPostInput,
    ) -> Result<BlogPost, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO blog_posts (user_id, date_time, category, title, content, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&input.date_time)
        .bind(&input.category)
        .bind(&input.title)
        .bind(&input.content)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(BlogPost {
            id: result.last_insert_rowid(),
            user_id,
            date_time: input.date_time.clone(),
            category: input.category.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            created_at,
        })
    }

    async fn update_post(
        &self,
        user_id: i64,
        id: i64,
        input: &BlogPostInput,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE blog_posts SET date_time = ?, category = ?, title = ?, content = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&input.date_time)
        .bind(&input.category)
        .bind(&input.title)
        .bind(&input.content)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_post(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM blog_posts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_budgets(&self, user_id: i64) -> Result<Vec<BudgetLimit>, StoreError> {
        let budgets = sqlx::query_as::<_, BudgetLimit>(
            "SELECT category, threshold FROM budget_limits WHERE user_id = ? ORDER BY category",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(budgets)
    }

    async fn upsert_budget(
        &self,
        user_id: i64,
        category: &str,
        threshold: f64,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO budget_limits (user_id, category, threshold) VALUES (?, ?, ?) \
             ON CONFLICT (user_id, category) DO UPDATE SET threshold = excluded.threshold",
        )
        .bind(user_id)
        .bind(category)
        .bind(threshold)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_budget(&self, user_id: i64, category: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM budget_limits WHERE user_id = ? AND category = ?")
            .bind(user_id)
            .bind(category)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

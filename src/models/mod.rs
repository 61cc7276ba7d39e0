use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Derived payment state of an expense. Never accepted from clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ExpenseStatus {
    Paid,
    Partial,
}

impl ExpenseStatus {
    /// Partial iff there is still a balance owing.
    pub fn from_balance(balance_due: f64) -> Self {
        if balance_due > 0.0 {
            ExpenseStatus::Partial
        } else {
            ExpenseStatus::Paid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Paid => "Paid",
            ExpenseStatus::Partial => "Partial",
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    /// Client-supplied ISO-8601 timestamp; also the listing order key.
    pub date_time: String,
    pub category: String,
    pub session_term: Option<String>,
    pub recipient: String,
    pub description: String,
    pub amount_paid: f64,
    pub balance_due: f64,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub user_id: i64,
    pub date_time: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user spending cap for one category. Unique per (user, category).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BudgetLimit {
    pub category: String,
    pub threshold: f64,
}

// ---------------------------------------------------------------------------
// Request payloads and their validated command forms.
//
// Payload fields are Options so a missing field becomes a 400 with a message
// instead of a deserializer rejection; validate() produces the typed input
// the store adapters receive.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsPayload {
    pub fn validate(self) -> Result<(String, String), String> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err("Username and password required".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub date_time: Option<String>,
    pub category: Option<String>,
    pub session_term: Option<String>,
    pub recipient: Option<String>,
    pub description: Option<String>,
    pub amount_paid: Option<f64>,
    pub balance_due: Option<f64>,
}

/// Validated expense fields with the server-derived status.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub date_time: String,
    pub category: String,
    pub session_term: Option<String>,
    pub recipient: String,
    pub description: String,
    pub amount_paid: f64,
    pub balance_due: f64,
    pub status: ExpenseStatus,
}

impl ExpensePayload {
    pub fn validate(self) -> Result<ExpenseInput, String> {
        let date_time = require(self.date_time, "date_time")?;
        let category = require(self.category, "category")?;
        let recipient = require(self.recipient, "recipient")?;
        let description = require(self.description, "description")?;
        let amount_paid = self
            .amount_paid
            .ok_or_else(|| "amount_paid is required".to_string())?;
        let balance_due = self.balance_due.unwrap_or(0.0);

        Ok(ExpenseInput {
            date_time,
            category,
            session_term: self.session_term,
            recipient,
            description,
            amount_paid,
            balance_due,
            status: ExpenseStatus::from_balance(balance_due),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BlogPostPayload {
    pub date_time: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlogPostInput {
    pub date_time: String,
    pub category: String,
    pub title: String,
    pub content: String,
}

impl BlogPostPayload {
    pub fn validate(self) -> Result<BlogPostInput, String> {
        Ok(BlogPostInput {
            date_time: require(self.date_time, "date_time")?,
            category: require(self.category, "category")?,
            title: require(self.title, "title")?,
            content: require(self.content, "content")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetPayload {
    pub category: Option<String>,
    pub threshold: Option<f64>,
}

impl BudgetPayload {
    pub fn validate(self) -> Result<(String, f64), String> {
        match (self.category, self.threshold) {
            (Some(category), Some(threshold))
                if !category.trim().is_empty() && threshold >= 0.0 && threshold.is_finite() =>
            {
                Ok((category, threshold))
            }
            _ => Err("Category and non-negative threshold required".to_string()),
        }
    }
}

fn require(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{} is required", field)),
    }
}

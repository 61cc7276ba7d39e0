//! Document-style adapter: each user owns their own record sets, the way the
//! hosted deployment keeps per-user subcollections. Also serves as the test
//! double for the handler suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{BlogPost, BlogPostInput, BudgetLimit, Expense, ExpenseInput, User};
use crate::store::{ExpenseFilter, Store, StoreError};

#[derive(Default)]
struct UserDocuments {
    expenses: Vec<Expense>,
    posts: Vec<BlogPost>,
    /// Singleton budgets document: an array of {category, threshold}
    budgets: Vec<BudgetLimit>,
    next_record_id: i64,
}

impl UserDocuments {
    fn next_id(&mut self) -> i64 {
        self.next_record_id += 1;
        self.next_record_id
    }
}

pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    documents: RwLock<HashMap<i64, UserDocuments>>,
    next_user_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }

        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn list_expenses(
        &self,
        user_id: i64,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, StoreError> {
        let documents = self.documents.read().await;
        let mut expenses: Vec<Expense> = documents
            .get(&user_id)
            .map(|docs| {
                docs.expenses
                    .iter()
                    .filter(|e| filter.matches(e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Stable sort keeps insertion order for equal timestamps
        expenses.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        Ok(expenses)
    }

    async fn create_expense(
        &self,
        user_id: i64,
        input: &ExpenseInput,
    ) -> Result<Expense, StoreError> {
        let mut documents = self.documents.write().await;
        let docs = documents.entry(user_id).or_default();

        let expense = Expense {
            id: docs.next_id(),
            user_id,
            date_time: input.date_time.clone(),
            category: input.category.clone(),
            session_term: input.session_term.clone(),
            recipient: input.recipient.clone(),
            description: input.description.clone(),
            amount_paid: input.amount_paid,
            balance_due: input.balance_due,
            status: input.status,
            created_at: Utc::now(),
        };
        docs.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(docs) = documents.get_mut(&user_id) {
            if let Some(expense) = docs.expenses.iter_mut().find(|e| e.id == id) {
                expense.date_time = input.date_time.clone();
                expense.category = input.category.clone();
                expense.session_term = input.session_term.clone();
                expense.recipient = input.recipient.clone();
                expense.description = input.description.clone();
                expense.amount_paid = input.amount_paid;
                expense.balance_due = input.balance_due;
                expense.status = input.status;
            }
        }
        // Unknown id or foreign owner: silent no-op
        Ok(())
    }

    async fn delete_expense(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(docs) = documents.get_mut(&user_id) {
            docs.expenses.retain(|e| e.id != id);
        }
        Ok(())
    }

    async fn list_posts(&self, user_id: i64) -> Result<Vec<BlogPost>, StoreError> {
        let documents = self.documents.read().await;
        let mut posts: Vec<BlogPost> = documents
            .get(&user_id)
            .map(|docs| docs.posts.clone())
            .unwrap_or_default();
        posts.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        Ok(posts)
    }

    async fn create_post(
        &self,
        user_id: i64,
        input: &BlogPostInput,
    ) -> Result<BlogPost, StoreError> {
        let mut documents = self.documents.write().await;
        let docs = documents.entry(user_id).or_default();

        let post = BlogPost {
            id: docs.next_id(),
            user_id,
            date_time: input.date_time.clone(),
            category: input.category.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            created_at: Utc::now(),
        };
        docs.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        user_id: i64,
        id: i64,
        input: &BlogPostInput,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(docs) = documents.get_mut(&user_id) {
            if let Some(post) = docs.posts.iter_mut().find(|p| p.id == id) {
                post.date_time = input.date_time.clone();
                post.category = input.category.clone();
                post.title = input.title.clone();
                post.content = input.content.clone();
            }
        }
        Ok(())
    }

    async fn delete_post(&self, user_id: i64, id: i64) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(docs) = documents.get_mut(&user_id) {
            docs.posts.retain(|p| p.id != id);
        }
        Ok(())
    }

    async fn list_budgets(&self, user_id: i64) -> Result<Vec<BudgetLimit>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&user_id)
            .map(|docs| docs.budgets.clone())
            .unwrap_or_default())
    }

    async fn upsert_budget(
        &self,
        user_id: i64,
        category: &str,
        threshold: f64,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let docs = documents.entry(user_id).or_default();

        // Replace-by-category on the singleton array
        docs.budgets.retain(|b| b.category != category);
        docs.budgets.push(BudgetLimit {
            category: category.to_string(),
            threshold,
        });
        Ok(())
    }

    async fn delete_budget(&self, user_id: i64, category: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(docs) = documents.get_mut(&user_id) {
            docs.budgets.retain(|b| b.category != category);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseStatus;

    fn input(date_time: &str, category: &str, paid: f64, balance: f64) -> ExpenseInput {
        ExpenseInput {
            date_time: date_time.to_string(),
            category: category.to_string(),
            session_term: None,
            recipient: "Recipient".to_string(),
            description: "Description".to_string(),
            amount_paid: paid,
            balance_due: balance,
            status: ExpenseStatus::from_balance(balance),
        }
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice", "hash").await.unwrap();
        let bob = store.create_user("bob", "hash").await.unwrap();

        let expense = store
            .create_expense(alice.id, &input("2024-01-01", "Food", 10.0, 0.0))
            .await
            .unwrap();

        assert!(store
            .list_expenses(bob.id, &ExpenseFilter::default())
            .await
            .unwrap()
            .is_empty());

        // Guessing another user's id changes nothing
        store.delete_expense(bob.id, expense.id).await.unwrap();
        assert_eq!(
            store
                .list_expenses(alice.id, &ExpenseFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn budget_upsert_keeps_one_entry_per_category() {
        let store = MemoryStore::new();
        let user = store.create_user("alice", "hash").await.unwrap();

        store.upsert_budget(user.id, "Food", 100.0).await.unwrap();
        store.upsert_budget(user.id, "Travel", 50.0).await.unwrap();
        store.upsert_budget(user.id, "Food", 80.0).await.unwrap();

        let budgets = store.list_budgets(user.id).await.unwrap();
        assert_eq!(budgets.len(), 2);
        let food = budgets.iter().find(|b| b.category == "Food").unwrap();
        assert_eq!(food.threshold, 80.0);
    }

    #[tokio::test]
    async fn expenses_list_newest_first() {
        let store = MemoryStore::new();
        let user = store.create_user("alice", "hash").await.unwrap();

        store
            .create_expense(user.id, &input("2024-01-01", "Food", 1.0, 0.0))
            .await
            .unwrap();
        store
            .create_expense(user.id, &input("2024-02-01", "Food", 2.0, 0.0))
            .await
            .unwrap();

        let listed = store
            .list_expenses(user.id, &ExpenseFilter::default())
            .await
            .unwrap();
        assert_eq!(listed[0].date_time, "2024-02-01");
        assert_eq!(listed[1].date_time, "2024-01-01");
    }
}

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod expenses;
pub mod posts;
pub mod status;

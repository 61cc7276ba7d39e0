//! Dashboard aggregation over a snapshot of one user's expenses and budget
//! thresholds. Pure and read-only: same snapshot in, same report out.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{BudgetLimit, Expense};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_expenses: i64,
    pub total_paid: f64,
    pub total_balance: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub count: i64,
    pub total_paid: f64,
    pub total_balance: f64,
}

/// A category whose paid+balance total exceeds its configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub category: String,
    pub threshold: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub statistics: Statistics,
    pub categories: Vec<CategoryTotal>,
    pub budgets: Vec<BudgetLimit>,
    pub alerts: Vec<BudgetAlert>,
    pub storage_mode: String,
}

pub fn build_report(
    expenses: &[Expense],
    budgets: Vec<BudgetLimit>,
    storage_mode: &str,
) -> DashboardReport {
    let mut statistics = Statistics {
        total_expenses: expenses.len() as i64,
        total_paid: 0.0,
        total_balance: 0.0,
        total_cost: 0.0,
    };

    // Grouped totals keep first-seen category order
    let mut categories: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<String, usize> = HashMap::new();

    for expense in expenses {
        statistics.total_paid += expense.amount_paid;
        statistics.total_balance += expense.balance_due;

        let idx = *index_by_category
            .entry(expense.category.clone())
            .or_insert_with(|| {
                categories.push(CategoryTotal {
                    category: expense.category.clone(),
                    count: 0,
                    total_paid: 0.0,
                    total_balance: 0.0,
                });
                categories.len() - 1
            });
        let entry = &mut categories[idx];
        entry.count += 1;
        entry.total_paid += expense.amount_paid;
        entry.total_balance += expense.balance_due;
    }
    statistics.total_cost = statistics.total_paid + statistics.total_balance;

    let thresholds: HashMap<&str, f64> = budgets
        .iter()
        .map(|b| (b.category.as_str(), b.threshold))
        .collect();

    // Strict comparison: hitting the threshold exactly does not alert
    let alerts: Vec<BudgetAlert> = categories
        .iter()
        .filter_map(|cat| {
            let threshold = *thresholds.get(cat.category.as_str())?;
            let total = cat.total_paid + cat.total_balance;
            if total > threshold {
                Some(BudgetAlert {
                    category: cat.category.clone(),
                    threshold,
                    total,
                })
            } else {
                None
            }
        })
        .collect();

    DashboardReport {
        statistics,
        categories,
        budgets,
        alerts,
        storage_mode: storage_mode.to_string(),
    }
}

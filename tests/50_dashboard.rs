mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

fn expense(date_time: &str, category: &str, paid: f64, balance: f64) -> serde_json::Value {
    json!({
        "date_time": date_time,
        "category": category,
        "recipient": "Recipient",
        "description": "Description",
        "amount_paid": paid,
        "balance_due": balance,
    })
}

#[tokio::test]
async fn empty_dashboard_reports_zeroes() -> Result<()> {
    let app = common::test_app();
    let token = common::register(&app, "alice").await?;

    let (status, body) = common::request(&app, "GET", "/api/dashboard", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["statistics"],
        json!({
            "total_expenses": 0,
            "total_paid": 0.0,
            "total_balance": 0.0,
            "total_cost": 0.0,
        })
    );
    assert_eq!(body["categories"], json!([]));
    assert_eq!(body["budgets"], json!([]));
    assert_eq!(body["alerts"], json!([]));
    assert_eq!(body["storage_mode"], "memory");
    Ok(())
}

#[tokio::test]
async fn totals_track_updates() -> Result<()> {
    let app = common::test_app();
    let token = common::register(&app, "alice").await?;

    let id = common::add_expense(&app, &token, expense("2024-01-15T10:30", "Food", 100.0, 0.0))
        .await?;

    // Balance appears after the update and flows into the totals
    let (_, _) = common::request(
        &app,
        "PUT",
        &format!("/api/expenses/{}", id),
        Some(&token),
        Some(expense("2024-01-15T10:30", "Food", 100.0, 50.0)),
    )
    .await?;

    let (_, body) = common::request(&app, "GET", "/api/dashboard", Some(&token), None).await?;
    assert_eq!(body["statistics"]["total_expenses"], 1);
    assert_eq!(body["statistics"]["total_paid"], 100.0);
    assert_eq!(body["statistics"]["total_balance"], 50.0);
    assert_eq!(body["statistics"]["total_cost"], 150.0);
    Ok(())
}

#[tokio::test]
async fn categories_group_with_per_category_totals() -> Result<()> {
    let app = common::test_app();
    let token = common::register(&app, "alice").await?;

    common::add_expense(&app, &token, expense("2024-01-01T08:00", "Food", 60.0, 0.0)).await?;
    common::add_expense(&app, &token, expense("2024-01-02T08:00", "Travel", 200.0, 0.0)).await?;
    common::add_expense(&app, &token, expense("2024-01-03T08:00", "Food", 50.0, 10.0)).await?;

    let (_, body) = common::request(&app, "GET", "/api/dashboard", Some(&token), None).await?;
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);

    let food = categories
        .iter()
        .find(|c| c["category"] == "Food")
        .unwrap();
    assert_eq!(food["count"], 2);
    assert_eq!(food["total_paid"], 110.0);
    assert_eq!(food["total_balance"], 10.0);
    Ok(())
}

#[tokio::test]
async fn alert_fires_when_category_total_exceeds_threshold() -> Result<()> {
    let app = common::test_app();
    let token = common::register(&app, "alice").await?;

    let (_, _) = common::request(
        &app,
        "PUT",
        "/api/budgets",
        Some(&token),
        Some(json!({ "category": "Food", "threshold": 100.0 })),
    )
    .await?;

    common::add_expense(&app, &token, expense("2024-01-01T08:00", "Food", 60.0, 0.0)).await?;
    common::add_expense(&app, &token, expense("2024-01-02T08:00", "Food", 50.0, 0.0)).await?;

    let (_, body) = common::request(&app, "GET", "/api/dashboard", Some(&token), None).await?;
    assert_eq!(
        body["alerts"],
        json!([{ "category": "Food", "threshold": 100.0, "total": 110.0 }])
    );
    Ok(())
}

#[tokio::test]
async fn hitting_the_threshold_exactly_does_not_alert() -> Result<()> {
    let app = common::test_app();
    let token = common::register(&app, "alice").await?;

    let (_, _) = common::request(
        &app,
        "PUT",
        "/api/budgets",
        Some(&token),
        Some(json!({ "category": "Food", "threshold": 100.0 })),
    )
    .await?;
    common::add_expense(&app, &token, expense("2024-01-01T08:00", "Food", 100.0, 0.0)).await?;

    let (_, body) = common::request(&app, "GET", "/api/dashboard", Some(&token), None).await?;
    assert_eq!(body["alerts"], json!([]));
    Ok(())
}

#[tokio::test]
async fn dashboard_only_sees_the_callers_data() -> Result<()> {
    let app = common::test_app();
    let alice = common::register(&app, "alice").await?;
    let bob = common::register(&app, "bob").await?;

    common::add_expense(&app, &alice, expense("2024-01-01T08:00", "Food", 500.0, 0.0)).await?;

    let (_, body) = common::request(&app, "GET", "/api/dashboard", Some(&bob), None).await?;
    assert_eq!(body["statistics"]["total_expenses"], 0);
    assert_eq!(body["categories"], json!([]));
    Ok(())
}

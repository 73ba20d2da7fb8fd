//! Storage gateway tests for Quarry MCP.
//!
//! Writes happen directly through the gateway (never through a tool) and are
//! observed through the MCP surface. Runs last: it changes the fixture data.

use super::common::*;
use quarry_adapter_sqlite::{SqlParam, StoreError};
use serde_json::json;

const INSERT_CUSTOMER: &str = "INSERT INTO customers (id, email, first_name, last_name, country) \
                               VALUES (?, ?, ?, ?, ?)";

async fn customer_count(ctx: &TestContext) -> i64 {
    let stats = ctx.read_resource("db://stats/summary").await;
    stats["record_counts"]["customers"].as_i64().unwrap()
}

fn dave() -> Vec<SqlParam> {
    vec![
        SqlParam::Integer(4),
        SqlParam::from("dave@example.com"),
        SqlParam::from("Dave"),
        SqlParam::from("Miller"),
        SqlParam::from("Germany"),
    ]
}

pub async fn test_failed_session_rolls_back(ctx: &TestContext) {
    println!("  🧪 test_failed_session_rolls_back");

    let before = customer_count(ctx).await;
    let params = dave();
    let result: Result<(), StoreError> = ctx
        .db
        .with_session(move |s| {
            Box::pin(async move {
                s.run(INSERT_CUSTOMER, &params).await?;
                // Duplicate email violates the unique constraint.
                s.run(
                    INSERT_CUSTOMER,
                    &[
                        SqlParam::Integer(5),
                        SqlParam::from("alice@example.com"),
                        SqlParam::from("Alice"),
                        SqlParam::from("Again"),
                        SqlParam::from("USA"),
                    ],
                )
                .await?;
                Ok::<_, StoreError>(())
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(customer_count(ctx).await, before);

    let (payload, _) = ctx
        .call_tool("get_customer_orders", json!({"email": "dave@example.com"}))
        .await;
    assert_eq!(payload["error"], "Customer not found");

    println!("     ✓ No rows from a failed session are visible");
}

pub async fn test_successful_session_commits(ctx: &TestContext) {
    println!("  🧪 test_successful_session_commits");

    let before = customer_count(ctx).await;
    let params = dave();
    let inserted = ctx
        .db
        .with_session(move |s| Box::pin(async move { s.run(INSERT_CUSTOMER, &params).await }))
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(customer_count(ctx).await, before + 1);

    let (payload, is_error) = ctx
        .call_tool("get_customer_orders", json!({"email": "dave@example.com"}))
        .await;
    assert!(!is_error);
    assert_eq!(payload["customer"]["name"], "Dave Miller");
    assert_eq!(payload["total_orders"], 0);

    println!("     ✓ A successful session is committed");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n🗄️  Running Gateway Tests\n");

    test_failed_session_rolls_back(ctx).await;
    test_successful_session_commits(ctx).await;

    println!("\n✅ All gateway tests passed!\n");
}

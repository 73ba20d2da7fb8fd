//! Resource tests for Quarry MCP.
//!
//! Tests the resource reader against the fixture store:
//! - Static table schema documents
//! - The live statistics summary and its stability across reads

use super::common::*;
use serde_json::json;

// =============================================================================
// SCHEMA DOCUMENTS
// =============================================================================

pub async fn test_customer_schema(ctx: &TestContext) {
    println!("  🧪 test_customer_schema");

    let doc = ctx.read_resource("db://schema/customers").await;

    assert_eq!(doc["table"], "customers");
    let columns = doc["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 8);
    assert_eq!(columns[0], json!({"name": "id", "type": "INTEGER", "primary_key": true}));
    assert_eq!(columns[4]["nullable"], true);
    assert_eq!(doc["relationships"], json!(["Has many Orders"]));

    println!("     ✓ Customers schema has 8 columns with id as primary key");
}

pub async fn test_order_schema_lists_statuses(ctx: &TestContext) {
    println!("  🧪 test_order_schema_lists_statuses");

    let doc = ctx.read_resource("db://schema/orders").await;
    let status = doc["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "status")
        .unwrap();

    assert_eq!(
        status["values"],
        json!(["pending", "processing", "shipped", "delivered", "cancelled"])
    );

    let items = ctx.read_resource("db://schema/order_items").await;
    assert_eq!(items["columns"][1]["foreign_key"], "orders.id");

    println!("     ✓ Order status values and foreign keys are published");
}

// =============================================================================
// STATISTICS
// =============================================================================

pub async fn test_stats_summary(ctx: &TestContext) {
    println!("  🧪 test_stats_summary");

    let stats = ctx.read_resource("db://stats/summary").await;

    assert_eq!(
        stats["record_counts"],
        json!({"customers": 3, "products": 5, "orders": 4, "order_items": 6})
    );
    assert_eq!(
        stats["order_status_distribution"],
        json!({"cancelled": 1, "delivered": 1, "pending": 1, "shipped": 1})
    );
    assert_eq!(
        stats["product_categories"],
        json!(["Books", "Clothing", "Electronics"])
    );
    assert_eq!(stats["date_range"]["earliest_order"], "2025-01-05 10:00:00");
    assert_eq!(stats["date_range"]["latest_order"], "2025-03-15 16:45:00");

    println!("     ✓ Live statistics match the fixture data");
}

pub async fn test_stats_are_stable(ctx: &TestContext) {
    println!("  🧪 test_stats_are_stable");

    let first = ctx.read_resource("db://stats/summary").await;
    let second = ctx.read_resource("db://stats/summary").await;
    assert_eq!(first["record_counts"], second["record_counts"]);

    println!("     ✓ Repeated reads without changes agree");
}

// =============================================================================
// TEST RUNNER
// =============================================================================

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📚 Running Resource Tests\n");

    test_customer_schema(ctx).await;
    test_order_schema_lists_statuses(ctx).await;
    test_stats_summary(ctx).await;
    test_stats_are_stable(ctx).await;

    println!("\n✅ All resource tests passed!\n");
}

//! Tool tests for Quarry MCP.
//!
//! Tests each tool end to end through `tools/call`:
//! - `query_database`: accepted queries, the SQL gate, limits, storage errors
//! - `get_customer_orders`: lookup by id and email, unknown customers, bad identifiers
//! - `analyze_product_sales`: ranking, category filter, top_n

use super::common::*;
use serde_json::json;

// =============================================================================
// QUERY DATABASE
// =============================================================================

pub async fn test_query_returns_rows(ctx: &TestContext) {
    println!("  🧪 test_query_returns_rows");

    let (payload, is_error) = ctx
        .call_tool(
            "query_database",
            json!({"sql": "SELECT id, email, phone FROM customers ORDER BY id"}),
        )
        .await;

    assert!(!is_error, "{}", payload);
    assert_eq!(payload["count"], 3);
    assert_eq!(payload["truncated"], false);
    assert_eq!(
        payload["rows"][0],
        json!({"id": 1, "email": "alice@example.com", "phone": "555-0100"})
    );
    assert!(payload["rows"][1]["phone"].is_null());

    println!("     ✓ SELECT returns decoded rows");
}

pub async fn test_query_limit_truncates(ctx: &TestContext) {
    println!("  🧪 test_query_limit_truncates");

    let (payload, is_error) = ctx
        .call_tool(
            "query_database",
            json!({"sql": "SELECT * FROM order_items ORDER BY id", "limit": 2}),
        )
        .await;

    assert!(!is_error);
    assert_eq!(payload["count"], 2);
    assert_eq!(payload["truncated"], true);

    println!("     ✓ Row count is capped at the requested limit");
}

pub async fn test_query_rejects_writes(ctx: &TestContext) {
    println!("  🧪 test_query_rejects_writes");

    let (payload, is_error) = ctx
        .call_tool("query_database", json!({"sql": "DELETE FROM customers"}))
        .await;
    assert_tool_error(&payload, is_error, "query_database", "Only SELECT queries are allowed");

    let (payload, is_error) = ctx
        .call_tool(
            "query_database",
            json!({"sql": "select * from Customers; DROP TABLE customers"}),
        )
        .await;
    assert_tool_error(&payload, is_error, "query_database", "DROP");

    let (payload, is_error) = ctx
        .call_tool(
            "query_database",
            json!({"sql": "SELECT 1; SELECT email FROM customers"}),
        )
        .await;
    assert_tool_error(&payload, is_error, "query_database", "Multiple statements");

    let stats = ctx.read_resource("db://stats/summary").await;
    assert_eq!(stats["record_counts"]["customers"], 3);

    println!("     ✓ Non-SELECT, forbidden keywords and stacked statements are refused");
}

pub async fn test_query_storage_error(ctx: &TestContext) {
    println!("  🧪 test_query_storage_error");

    let (payload, is_error) = ctx
        .call_tool("query_database", json!({"sql": "SELECT * FROM invoices"}))
        .await;
    assert_tool_error(&payload, is_error, "query_database", "Database error");

    let (payload, is_error) = ctx.call_tool("query_database", json!({"limit": 5})).await;
    assert_tool_error(&payload, is_error, "query_database", "Invalid arguments");

    println!("     ✓ Store and argument failures come back as tool errors");
}

// =============================================================================
// CUSTOMER ORDERS
// =============================================================================

pub async fn test_customer_orders_by_id(ctx: &TestContext) {
    println!("  🧪 test_customer_orders_by_id");

    let (payload, is_error) = ctx
        .call_tool("get_customer_orders", json!({"customer_id": 1}))
        .await;

    assert!(!is_error, "{}", payload);
    assert_eq!(
        payload["customer"],
        json!({"id": 1, "name": "Alice Smith", "email": "alice@example.com", "country": "USA"})
    );
    assert_eq!(payload["total_orders"], 2);
    assert!(approx_eq(&payload["total_spent"], 1278.96), "{}", payload["total_spent"]);

    let orders = payload["orders"].as_array().unwrap();
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[0]["order_date"], "2025-01-05 10:00:00");
    assert_eq!(orders[0]["status"], "delivered");
    assert_eq!(orders[0]["items_count"], 2);
    assert_eq!(orders[1]["status"], "shipped");

    println!("     ✓ Orders and total spend returned for customer 1");
}

pub async fn test_customer_orders_by_email(ctx: &TestContext) {
    println!("  🧪 test_customer_orders_by_email");

    let (payload, is_error) = ctx
        .call_tool("get_customer_orders", json!({"email": "bob@example.com"}))
        .await;

    assert!(!is_error);
    assert_eq!(payload["customer"]["id"], 2);
    assert_eq!(payload["total_orders"], 2);
    assert!(approx_eq(&payload["total_spent"], 289.50));

    let (payload, _) = ctx
        .call_tool("get_customer_orders", json!({"email": "carol@example.com"}))
        .await;
    assert_eq!(payload["total_orders"], 0);
    assert!(approx_eq(&payload["total_spent"], 0.0));
    assert_eq!(payload["orders"], json!([]));

    println!("     ✓ Lookup by email works, including customers without orders");
}

pub async fn test_customer_not_found(ctx: &TestContext) {
    println!("  🧪 test_customer_not_found");

    let (payload, is_error) = ctx
        .call_tool("get_customer_orders", json!({"customer_id": 99999}))
        .await;

    assert!(!is_error, "a missing customer is not a tool failure");
    assert_eq!(payload, json!({"error": "Customer not found"}));

    println!("     ✓ Unknown customer yields the soft not-found payload");
}

pub async fn test_customer_identifier_rules(ctx: &TestContext) {
    println!("  🧪 test_customer_identifier_rules");

    let (payload, is_error) = ctx.call_tool("get_customer_orders", json!({})).await;
    assert_tool_error(&payload, is_error, "get_customer_orders", "Invalid arguments");

    let (payload, is_error) = ctx
        .call_tool(
            "get_customer_orders",
            json!({"customer_id": 1, "email": "alice@example.com"}),
        )
        .await;
    assert_tool_error(&payload, is_error, "get_customer_orders", "Invalid arguments");

    println!("     ✓ Neither or both identifiers are rejected");
}

// =============================================================================
// PRODUCT SALES
// =============================================================================

pub async fn test_sales_ranking(ctx: &TestContext) {
    println!("  🧪 test_sales_ranking");

    let (payload, is_error) = ctx.call_tool("analyze_product_sales", json!({})).await;

    assert!(!is_error, "{}", payload);
    assert_eq!(payload["category"], "All Categories");
    assert_eq!(payload["count"], 4);

    let products = payload["top_products"].as_array().unwrap();
    let ids: Vec<_> = products.iter().map(|p| p["product_id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3, 2, 4]);

    assert_eq!(products[1]["name"], "Jacket - Model C");
    assert_eq!(products[1]["units_sold"], 3);
    assert_eq!(products[1]["orders_count"], 2);
    assert!(approx_eq(&products[1]["total_revenue"], 360.0));
    assert!(approx_eq(&products[2]["total_revenue"], 148.5));

    let revenues: Vec<f64> = products
        .iter()
        .map(|p| p["total_revenue"].as_f64().unwrap())
        .collect();
    assert!(revenues.windows(2).all(|w| w[0] >= w[1]));

    println!("     ✓ Products ranked by revenue, unsold products omitted");
}

pub async fn test_sales_by_category(ctx: &TestContext) {
    println!("  🧪 test_sales_by_category");

    let (payload, is_error) = ctx
        .call_tool(
            "analyze_product_sales",
            json!({"category": "Electronics", "top_n": 5}),
        )
        .await;

    assert!(!is_error);
    assert_eq!(payload["category"], "Electronics");
    let products = payload["top_products"].as_array().unwrap();
    assert!(products.len() <= 5);
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["category"] == "Electronics"));

    let (payload, _) = ctx
        .call_tool("analyze_product_sales", json!({"top_n": 1}))
        .await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["top_products"][0]["product_id"], 1);

    let (payload, is_error) = ctx
        .call_tool("analyze_product_sales", json!({"top_n": 0}))
        .await;
    assert_tool_error(&payload, is_error, "analyze_product_sales", "Invalid arguments");

    println!("     ✓ Category filter and top_n are honored");
}

// =============================================================================
// TEST RUNNER
// =============================================================================

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n🔧 Running Tool Tests\n");

    // query_database
    test_query_returns_rows(ctx).await;
    test_query_limit_truncates(ctx).await;
    test_query_rejects_writes(ctx).await;
    test_query_storage_error(ctx).await;

    // get_customer_orders
    test_customer_orders_by_id(ctx).await;
    test_customer_orders_by_email(ctx).await;
    test_customer_not_found(ctx).await;
    test_customer_identifier_rules(ctx).await;

    // analyze_product_sales
    test_sales_ranking(ctx).await;
    test_sales_by_category(ctx).await;

    println!("\n✅ All tool tests passed!\n");
}

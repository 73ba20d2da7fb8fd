//! Prompt tests for Quarry MCP.

use super::common::*;
use serde_json::json;

pub async fn test_analyze_customer_prompt(ctx: &TestContext) {
    println!("  🧪 test_analyze_customer_prompt");

    let result = ctx
        .rpc_ok(
            "prompts/get",
            Some(json!({"name": "analyze_customer", "arguments": {"customer_id": "1"}})),
        )
        .await;

    assert!(result["description"].as_str().unwrap().contains('1'));
    let message = &result["messages"][0];
    assert_eq!(message["role"], "user");
    assert_eq!(message["content"]["type"], "text");
    let text = message["content"]["text"].as_str().unwrap();
    assert!(text.contains("get_customer_orders"));
    assert!(text.contains("customer_id=1"));

    println!("     ✓ analyze_customer renders the customer id and tool name");
}

pub async fn test_category_performance_prompt(ctx: &TestContext) {
    println!("  🧪 test_category_performance_prompt");

    let result = ctx
        .rpc_ok(
            "prompts/get",
            Some(json!({
                "name": "category_performance",
                "arguments": {"category": "Electronics", "period_days": "90"}
            })),
        )
        .await;

    assert_eq!(
        result["description"],
        "Analyze performance for Electronics category"
    );
    let text = result["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("analyze_product_sales"));
    assert!(text.contains("last 90 days"));

    println!("     ✓ category_performance renders category and period");
}

pub async fn test_prompt_without_arguments(ctx: &TestContext) {
    println!("  🧪 test_prompt_without_arguments");

    let result = ctx
        .rpc_ok("prompts/get", Some(json!({"name": "category_performance"})))
        .await;

    assert_eq!(
        result["description"],
        "Analyze performance for <category> category"
    );
    let text = result["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("last 30 days"));

    println!("     ✓ Missing arguments render as placeholders");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n💬 Running Prompt Tests\n");

    test_analyze_customer_prompt(ctx).await;
    test_category_performance_prompt(ctx).await;
    test_prompt_without_arguments(ctx).await;

    println!("\n✅ All prompt tests passed!\n");
}

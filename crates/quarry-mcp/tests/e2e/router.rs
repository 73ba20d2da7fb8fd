//! Router tests for Quarry MCP.
//!
//! Tests the JSON-RPC surface:
//! - Lifecycle methods: initialize, initialized notification, ping, shutdown
//! - Listing: resources, tools, prompts
//! - Protocol errors: unknown method / resource / tool / prompt, bad params

use super::common::*;
use quarry_mcp::protocol::codes;
use serde_json::json;

// =============================================================================
// LIFECYCLE
// =============================================================================

pub async fn test_initialize_handshake(ctx: &TestContext) {
    println!("  🧪 test_initialize_handshake");

    let result = ctx
        .rpc_ok(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "e2e", "version": "0"}
            })),
        )
        .await;

    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "quarry-mcp");
    for capability in ["resources", "tools", "prompts"] {
        assert!(result["capabilities"][capability].is_object(), "{}", capability);
    }

    let ack = ctx
        .server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(ack.is_none(), "notifications must not be answered");

    println!("     ✓ Handshake completes and the initialized notification is silent");
}

pub async fn test_ping_and_shutdown(ctx: &TestContext) {
    println!("  🧪 test_ping_and_shutdown");

    assert_eq!(ctx.rpc_ok("ping", None).await, json!({}));
    assert!(ctx.rpc_ok("shutdown", None).await.is_null());

    println!("     ✓ ping returns {{}} and shutdown returns null");
}

// =============================================================================
// LISTING
// =============================================================================

pub async fn test_list_resources(ctx: &TestContext) {
    println!("  🧪 test_list_resources");

    let result = ctx.rpc_ok("resources/list", None).await;
    let resources = result["resources"].as_array().unwrap();
    let uris: Vec<_> = resources.iter().map(|r| r["uri"].as_str().unwrap()).collect();

    assert_eq!(
        uris,
        vec![
            "db://schema/customers",
            "db://schema/products",
            "db://schema/orders",
            "db://schema/order_items",
            "db://stats/summary",
        ]
    );
    assert!(resources.iter().all(|r| r["mimeType"] == "application/json"));
    assert_eq!(resources[4]["name"], "Database Statistics");

    println!("     ✓ Five resources listed in catalog order");
}

pub async fn test_list_tools(ctx: &TestContext) {
    println!("  🧪 test_list_tools");

    let result = ctx.rpc_ok("tools/list", None).await;
    let tools = result["tools"].as_array().unwrap();

    assert_eq!(tools.len(), 3);
    for tool in tools {
        assert_eq!(tool["annotations"]["readOnlyHint"], true);
        assert!(tool["inputSchema"]["properties"].is_object());
    }
    assert_eq!(tools[1]["name"], "get_customer_orders");
    assert_eq!(tools[1]["inputSchema"]["oneOf"].as_array().unwrap().len(), 2);

    println!("     ✓ Three read-only tools listed with schemas");
}

pub async fn test_list_prompts(ctx: &TestContext) {
    println!("  🧪 test_list_prompts");

    let result = ctx.rpc_ok("prompts/list", None).await;
    let prompts = result["prompts"].as_array().unwrap();

    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["name"], "analyze_customer");
    assert_eq!(prompts[0]["arguments"][0]["name"], "customer_id");
    assert_eq!(prompts[0]["arguments"][0]["required"], true);
    assert_eq!(prompts[1]["arguments"][1]["required"], false);

    println!("     ✓ Two prompts listed with their arguments");
}

// =============================================================================
// PROTOCOL ERRORS
// =============================================================================

pub async fn test_unknown_identifiers(ctx: &TestContext) {
    println!("  🧪 test_unknown_identifiers");

    let response = ctx.rpc("sampling/createMessage", None).await;
    assert_rpc_error(&response, codes::METHOD_NOT_FOUND);

    let response = ctx
        .rpc("resources/read", Some(json!({"uri": "db://schema/users"})))
        .await;
    assert_rpc_error(&response, codes::RESOURCE_NOT_FOUND);
    assert_eq!(response.error.unwrap().data.unwrap()["uri"], "db://schema/users");

    let response = ctx
        .rpc("tools/call", Some(json!({"name": "drop_database", "arguments": {}})))
        .await;
    assert_rpc_error(&response, codes::INVALID_PARAMS);
    assert!(response.error.unwrap().message.contains("drop_database"));

    let response = ctx
        .rpc("prompts/get", Some(json!({"name": "summarize_everything"})))
        .await;
    assert_rpc_error(&response, codes::INVALID_PARAMS);
    assert_eq!(
        response.error.unwrap().data.unwrap()["prompt"],
        "summarize_everything"
    );

    println!("     ✓ Unknown method, URI, tool and prompt are protocol errors");
}

pub async fn test_invalid_params(ctx: &TestContext) {
    println!("  🧪 test_invalid_params");

    let response = ctx.rpc("resources/read", Some(json!({}))).await;
    assert_rpc_error(&response, codes::INVALID_PARAMS);

    let response = ctx.rpc("tools/call", None).await;
    assert_rpc_error(&response, codes::INVALID_PARAMS);

    let response = ctx.server.handle_message("not json at all").await.unwrap();
    assert_rpc_error(&response, codes::PARSE_ERROR);
    assert!(response.id.is_none());

    println!("     ✓ Missing or malformed params are rejected");
}

// =============================================================================
// TEST RUNNER
// =============================================================================

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📡 Running Router Tests\n");

    test_initialize_handshake(ctx).await;
    test_ping_and_shutdown(ctx).await;
    test_list_resources(ctx).await;
    test_list_tools(ctx).await;
    test_list_prompts(ctx).await;
    test_unknown_identifiers(ctx).await;
    test_invalid_params(ctx).await;

    println!("\n✅ All router tests passed!\n");
}

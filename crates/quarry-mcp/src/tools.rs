//! Tool definitions for MCP.
//!
//! The gateway exposes a fixed set of read-only tools. Each one is a variant of
//! [`ToolKind`]; its public name, description and input schema live here, the
//! handlers live in [`crate::executor`].

use crate::protocol::{ToolAnnotations, ToolDefinition};
use crate::registry::Registry;
use quarry_core::MAX_QUERY_LIMIT;
use serde_json::{Value, json};
use std::fmt;

/// The tools the gateway can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    QueryDatabase,
    GetCustomerOrders,
    AnalyzeProductSales,
}

impl ToolKind {
    /// Every tool, in the order `tools/list` reports them.
    pub const ALL: [ToolKind; 3] = [
        ToolKind::QueryDatabase,
        ToolKind::GetCustomerOrders,
        ToolKind::AnalyzeProductSales,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::QueryDatabase => "query_database",
            ToolKind::GetCustomerOrders => "get_customer_orders",
            ToolKind::AnalyzeProductSales => "analyze_product_sales",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::QueryDatabase => {
                "Execute a read-only SQL SELECT query against the database. Returns results as JSON. \
                 Query must be SELECT only (no INSERT/UPDATE/DELETE)."
            }
            ToolKind::GetCustomerOrders => {
                "Get all orders for a specific customer by customer ID or email."
            }
            ToolKind::AnalyzeProductSales => {
                "Analyze sales performance for products in a specific category or overall."
            }
        }
    }

    /// JSON Schema for the tool's `arguments` object.
    pub fn input_schema(&self) -> Value {
        match self {
            ToolKind::QueryDatabase => json!({
                "type": "object",
                "properties": {
                    "sql": {
                        "type": "string",
                        "description": "SQL SELECT query to execute. Must be valid SQLite syntax."
                    },
                    "limit": {
                        "type": "integer",
                        "description": format!(
                            "Maximum number of rows to return (default: 100, max: {MAX_QUERY_LIMIT})"
                        ),
                        "minimum": 1,
                        "default": 100
                    }
                },
                "required": ["sql"]
            }),
            ToolKind::GetCustomerOrders => json!({
                "type": "object",
                "properties": {
                    "customer_id": {
                        "type": "integer",
                        "description": "Customer ID"
                    },
                    "email": {
                        "type": "string",
                        "description": "Customer email address"
                    }
                },
                "oneOf": [
                    {"required": ["customer_id"]},
                    {"required": ["email"]}
                ]
            }),
            ToolKind::AnalyzeProductSales => json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Product category to analyze (optional, omit for all categories)"
                    },
                    "top_n": {
                        "type": "integer",
                        "description": "Number of top products to return (default: 10)",
                        "minimum": 1,
                        "default": 10
                    }
                }
            }),
        }
    }

    /// The entry advertised by `tools/list`.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema(),
            annotations: Some(ToolAnnotations {
                read_only_hint: Some(true),
            }),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name table for `tools/call`.
pub fn tool_registry() -> Registry<ToolKind> {
    ToolKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect()
}

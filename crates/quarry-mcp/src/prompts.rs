//! Prompt templates.
//!
//! Prompts are canned analysis workflows that tell the client which tools to
//! call and what to report. Rendering is plain string templating; arguments the
//! caller leaves out show up as a `<name>` placeholder.

use crate::protocol::{
    GetPromptResponse, PromptArgument, PromptContent, PromptDefinition, PromptMessage,
};
use crate::registry::Registry;
use serde_json::{Map, Value};
use std::fmt;

const DEFAULT_PERIOD_DAYS: &str = "30";

/// The prompt templates the gateway serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    AnalyzeCustomer,
    CategoryPerformance,
}

impl PromptKind {
    pub const ALL: [PromptKind; 2] = [PromptKind::AnalyzeCustomer, PromptKind::CategoryPerformance];

    pub fn name(&self) -> &'static str {
        match self {
            PromptKind::AnalyzeCustomer => "analyze_customer",
            PromptKind::CategoryPerformance => "category_performance",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PromptKind::AnalyzeCustomer => "Analyze a customer's purchase history and behavior",
            PromptKind::CategoryPerformance => {
                "Generate a performance report for a product category"
            }
        }
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        match self {
            PromptKind::AnalyzeCustomer => vec![argument(
                "customer_id",
                "Customer ID to analyze",
                true,
            )],
            PromptKind::CategoryPerformance => vec![
                argument("category", "Product category name", true),
                argument(
                    "period_days",
                    "Analysis period in days (default: 30)",
                    false,
                ),
            ],
        }
    }

    /// The entry advertised by `prompts/list`.
    pub fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            arguments: self.arguments(),
        }
    }

    /// Fill in the template.
    pub fn render(&self, args: &Map<String, Value>) -> GetPromptResponse {
        let (description, text) = match self {
            PromptKind::AnalyzeCustomer => {
                let customer_id = required(args, "customer_id");
                (
                    format!("Analyze customer {customer_id}"),
                    format!(
                        "Please analyze customer {customer_id} using the following steps:

1. Use the `get_customer_orders` tool to retrieve all orders for customer_id={customer_id}
2. Analyze their purchase patterns:
   - Total orders and spend
   - Favorite product categories
   - Average order value
   - Order frequency
3. Provide insights and recommendations:
   - Customer segment (high-value, occasional, at-risk)
   - Product recommendations based on purchase history
   - Potential upsell opportunities

Format the analysis professionally with clear sections and actionable insights."
                    ),
                )
            }
            PromptKind::CategoryPerformance => {
                let category = required(args, "category");
                let period_days =
                    optional(args, "period_days").unwrap_or_else(|| DEFAULT_PERIOD_DAYS.to_string());
                (
                    format!("Analyze performance for {category} category"),
                    format!(
                        "Generate a performance report for the '{category}' product category:

1. Use `analyze_product_sales` tool with category='{category}' to get top products
2. Use `query_database` to find:
   - Total orders containing {category} products in last {period_days} days
   - Average order value for {category} items
   - Inventory levels (stock_quantity)
3. Provide analysis:
   - Best-performing products and why
   - Revenue trends
   - Inventory recommendations (restock alerts)
   - Pricing optimization opportunities

Present findings in an executive summary format suitable for leadership."
                    ),
                )
            }
        };

        GetPromptResponse {
            description,
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: PromptContent::Text { text },
            }],
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name table for `prompts/get`.
pub fn prompt_registry() -> Registry<PromptKind> {
    PromptKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect()
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

/// Render an argument value as text. Strings are used as-is, anything else verbatim.
fn optional(args: &Map<String, Value>, name: &str) -> Option<String> {
    match args.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn required(args: &Map<String, Value>, name: &str) -> String {
    optional(args, name).unwrap_or_else(|| {
        tracing::debug!(argument = name, "Prompt argument missing, using placeholder");
        format!("<{name}>")
    })
}

//! Tool execution engine.
//!
//! This module handles the actual execution of MCP tools:
//! - checking arguments against each tool's input schema
//! - running the SQL safety gate for ad-hoc queries
//! - reading through the storage gateway, one session per call
//! - turning handler faults into tool payloads

use crate::error::McpError;
use crate::protocol::CallToolResponse;
use crate::tools::ToolKind;
use crate::validator::{self, Rejection};
use jsonschema::Validator;
use quarry_adapter_sqlite::{Database, QueryRows, SqlParam, StoreError};
use quarry_core::model::round_cents;
use quarry_core::{GuardrailsConfig, MAX_QUERY_LIMIT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value, json};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const CUSTOMER_BY_ID: &str = "\
SELECT id, first_name || ' ' || last_name AS name, email, country
FROM customers
WHERE id = ?";

const CUSTOMER_BY_EMAIL: &str = "\
SELECT id, first_name || ' ' || last_name AS name, email, country
FROM customers
WHERE email = ?";

const ORDERS_BY_CUSTOMER_ID: &str = "\
SELECT o.id, o.order_date, o.status, o.total_amount, COUNT(oi.id) AS items_count
FROM orders o
LEFT JOIN order_items oi ON oi.order_id = o.id
WHERE o.customer_id = ?
GROUP BY o.id
ORDER BY o.order_date, o.id";

const ORDERS_BY_CUSTOMER_EMAIL: &str = "\
SELECT o.id, o.order_date, o.status, o.total_amount, COUNT(oi.id) AS items_count
FROM orders o
JOIN customers c ON c.id = o.customer_id
LEFT JOIN order_items oi ON oi.order_id = o.id
WHERE c.email = ?
GROUP BY o.id
ORDER BY o.order_date, o.id";

const SALES_ALL: &str = "\
SELECT p.id AS product_id, p.name, p.category, p.price,
       SUM(oi.quantity) AS units_sold,
       SUM(oi.subtotal) AS total_revenue,
       COUNT(oi.id) AS orders_count
FROM products p
JOIN order_items oi ON oi.product_id = p.id
GROUP BY p.id
ORDER BY total_revenue DESC, p.id
LIMIT ?";

const SALES_BY_CATEGORY: &str = "\
SELECT p.id AS product_id, p.name, p.category, p.price,
       SUM(oi.quantity) AS units_sold,
       SUM(oi.subtotal) AS total_revenue,
       COUNT(oi.id) AS orders_count
FROM products p
JOIN order_items oi ON oi.product_id = p.id
WHERE p.category = ?
GROUP BY p.id
ORDER BY total_revenue DESC, p.id
LIMIT ?";

const ALL_CATEGORIES: &str = "All Categories";
const DEFAULT_TOP_N: u64 = 10;

/// A failure inside a tool handler.
///
/// Faults never become JSON-RPC errors. [`ToolFault::into_payload`] turns them
/// into a `{error, tool}` document returned with `isError: true`, except for a
/// store that cannot hand out sessions, which [`ToolExecutor::call`] escalates.
#[derive(Debug, Error)]
pub enum ToolFault {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Query timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<Rejection> for ToolFault {
    fn from(reason: Rejection) -> Self {
        ToolFault::InvalidArgument(reason.to_string())
    }
}

impl ToolFault {
    /// The document reported back to the caller.
    pub fn into_payload(self, tool: ToolKind) -> Value {
        json!({
            "error": self.to_string(),
            "tool": tool.name(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct QueryDatabaseArgs {
    sql: String,
    // Kept as a raw number so out-of-range integers are capped, not rejected.
    limit: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct CustomerOrdersArgs {
    customer_id: Option<i64>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductSalesArgs {
    category: Option<String>,
    top_n: Option<u64>,
}

/// How a customer is looked up.
enum CustomerLookup {
    Id(i64),
    Email(String),
}

impl CustomerLookup {
    fn from_args(args: CustomerOrdersArgs) -> Result<Self, ToolFault> {
        match (args.customer_id, args.email) {
            (Some(id), None) => Ok(CustomerLookup::Id(id)),
            (None, Some(email)) => Ok(CustomerLookup::Email(email)),
            _ => Err(ToolFault::InvalidArgument(
                "Exactly one of customer_id or email is required".to_string(),
            )),
        }
    }

    fn queries(&self) -> (&'static str, &'static str) {
        match self {
            CustomerLookup::Id(_) => (CUSTOMER_BY_ID, ORDERS_BY_CUSTOMER_ID),
            CustomerLookup::Email(_) => (CUSTOMER_BY_EMAIL, ORDERS_BY_CUSTOMER_EMAIL),
        }
    }

    fn param(&self) -> SqlParam {
        match self {
            CustomerLookup::Id(id) => SqlParam::Integer(*id),
            CustomerLookup::Email(email) => SqlParam::Text(email.clone()),
        }
    }
}

/// The tool executor handles running tools against the database.
pub struct ToolExecutor {
    db: Database,
    guardrails: GuardrailsConfig,
    schemas: HashMap<ToolKind, Validator>,
}

impl ToolExecutor {
    /// Create a new tool executor, compiling every tool's input schema.
    pub fn new(db: Database, guardrails: GuardrailsConfig) -> Result<Self, McpError> {
        let mut schemas = HashMap::with_capacity(ToolKind::ALL.len());
        for kind in ToolKind::ALL {
            let validator = jsonschema::validator_for(&kind.input_schema()).map_err(|e| {
                McpError::StartupFailed(format!("invalid input schema for tool {kind}: {e}"))
            })?;
            schemas.insert(kind, validator);
        }

        Ok(Self {
            db,
            guardrails,
            schemas,
        })
    }

    /// Run a tool and package its outcome as an MCP tool result.
    ///
    /// A missing or `null` argument object is treated as `{}`.
    pub async fn call(&self, kind: ToolKind, arguments: Value) -> Result<CallToolResponse, McpError> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        tracing::debug!(tool = %kind, "Executing tool");

        match self.execute(kind, arguments).await {
            Ok(payload) => Ok(CallToolResponse::json(&payload, false)?),
            Err(ToolFault::Storage(err)) if err.is_unavailable() => {
                tracing::error!(tool = %kind, error = %err, "Database unavailable");
                Err(McpError::StoreUnavailable(err))
            }
            Err(fault) => {
                tracing::warn!(tool = %kind, error = %fault, "Tool call failed");
                Ok(CallToolResponse::json(&fault.into_payload(kind), true)?)
            }
        }
    }

    /// Run a tool, returning its raw result document.
    pub async fn execute(&self, kind: ToolKind, arguments: Value) -> Result<Value, ToolFault> {
        self.check_arguments(kind, &arguments)?;

        match kind {
            ToolKind::QueryDatabase => self.query_database(parse_args(kind, arguments)?).await,
            ToolKind::GetCustomerOrders => {
                self.get_customer_orders(parse_args(kind, arguments)?).await
            }
            ToolKind::AnalyzeProductSales => {
                self.analyze_product_sales(parse_args(kind, arguments)?).await
            }
        }
    }

    fn check_arguments(&self, kind: ToolKind, arguments: &Value) -> Result<(), ToolFault> {
        let Some(validator) = self.schemas.get(&kind) else {
            return Ok(());
        };

        let errors: Vec<String> = validator
            .iter_errors(arguments)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToolFault::InvalidArgument(format!(
                "Invalid arguments for {kind}: {}",
                errors.join("; ")
            )))
        }
    }

    async fn query_database(&self, args: QueryDatabaseArgs) -> Result<Value, ToolFault> {
        validator::validate(&args.sql).into_result()?;

        let limit = match &args.limit {
            Some(requested) => capped_limit(requested),
            None => self.guardrails.default_query_limit.min(MAX_QUERY_LIMIT),
        } as usize;
        let seconds = self.guardrails.query_timeout_seconds;
        let sql = args.sql;

        let query = self.db.with_session(move |session| {
            Box::pin(async move { session.fetch_limited(&sql, &[], limit).await })
        });
        let rows: QueryRows = tokio::time::timeout(Duration::from_secs(seconds), query)
            .await
            .map_err(|_| ToolFault::Timeout { seconds })??;

        let count = rows.len();
        tracing::debug!(rows = count, limit, "Ad-hoc query finished");

        Ok(json!({
            "rows": rows.rows,
            "count": count,
            "truncated": count == limit,
        }))
    }

    async fn get_customer_orders(&self, args: CustomerOrdersArgs) -> Result<Value, ToolFault> {
        let lookup = CustomerLookup::from_args(args)?;
        let (customer_sql, orders_sql) = lookup.queries();
        let param = lookup.param();

        self.db
            .with_session(move |session| {
                Box::pin(async move {
                    let params = [param];
                    let Some(customer) = session.fetch_optional(customer_sql, &params).await?
                    else {
                        return Ok(json!({ "error": "Customer not found" }));
                    };

                    let orders = session.execute(orders_sql, &params).await?;
                    let total_spent: f64 = orders
                        .rows
                        .iter()
                        .filter_map(|order| order.get("total_amount").and_then(Value::as_f64))
                        .sum();

                    Ok::<_, ToolFault>(json!({
                        "customer": customer,
                        "total_orders": orders.len(),
                        "total_spent": total_spent,
                        "orders": orders.rows,
                    }))
                })
            })
            .await
    }

    async fn analyze_product_sales(&self, args: ProductSalesArgs) -> Result<Value, ToolFault> {
        let category = args.category.filter(|c| !c.is_empty());
        let top_n = i64::try_from(args.top_n.unwrap_or(DEFAULT_TOP_N)).unwrap_or(i64::MAX);

        let (sql, params) = match &category {
            Some(category) => (
                SALES_BY_CATEGORY,
                vec![SqlParam::from(category.as_str()), SqlParam::Integer(top_n)],
            ),
            None => (SALES_ALL, vec![SqlParam::Integer(top_n)]),
        };

        let mut sales: QueryRows = self
            .db
            .with_session(move |session| {
                Box::pin(async move { session.execute(sql, &params).await })
            })
            .await?;

        for product in &mut sales.rows {
            if let Some(revenue) = product.get("total_revenue").and_then(Value::as_f64) {
                product.insert("total_revenue".to_string(), json!(round_cents(revenue)));
            }
        }

        Ok(json!({
            "category": category.as_deref().unwrap_or(ALL_CATEGORIES),
            "count": sales.len(),
            "top_products": sales.rows,
        }))
    }
}

/// Clamp a requested row limit to `MAX_QUERY_LIMIT`.
fn capped_limit(requested: &Number) -> u32 {
    let max = u64::from(MAX_QUERY_LIMIT);
    let value = requested
        .as_u64()
        .or_else(|| requested.as_f64().map(|f| f.clamp(1.0, max as f64) as u64))
        .unwrap_or(max);
    value.clamp(1, max) as u32
}

fn parse_args<T: DeserializeOwned>(kind: ToolKind, arguments: Value) -> Result<T, ToolFault> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolFault::InvalidArgument(format!("Invalid arguments for {kind}: {e}")))
}

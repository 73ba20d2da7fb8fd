//! Resource reader.
//!
//! Table schema documents come straight from the static catalog. The statistics
//! summary is computed live, every aggregate inside one session so the numbers
//! describe a single snapshot.

use crate::error::McpError;
use crate::protocol::{ResourceContents, ResourceDefinition};
use crate::registry::Registry;
use quarry_adapter_sqlite::{Database, StoreError};
use quarry_core::{ResourceId, Table};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const STATUS_DISTRIBUTION: &str =
    "SELECT status, COUNT(id) AS count FROM orders GROUP BY status ORDER BY status";
const CATEGORIES: &str = "SELECT DISTINCT category FROM products ORDER BY category";
const DATE_RANGE: &str =
    "SELECT MIN(order_date) AS earliest_order, MAX(order_date) AS latest_order FROM orders";

/// Live `db://stats/summary` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub record_counts: BTreeMap<String, i64>,
    pub order_status_distribution: BTreeMap<String, i64>,
    pub product_categories: Vec<String>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub earliest_order: Option<String>,
    pub latest_order: Option<String>,
}

/// Name table for `resources/read`.
pub fn resource_registry() -> Registry<ResourceId> {
    ResourceId::ALL.iter().map(|id| (id.uri(), *id)).collect()
}

/// Reads resource documents.
#[derive(Debug, Clone)]
pub struct ResourceReader {
    db: Database,
}

impl ResourceReader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The entry advertised by `resources/list`.
    pub fn definition(id: ResourceId) -> ResourceDefinition {
        ResourceDefinition {
            uri: id.uri().to_string(),
            name: id.name().to_string(),
            mime_type: id.mime_type().to_string(),
            description: id.description().to_string(),
        }
    }

    /// Render a resource as pretty-printed JSON.
    pub async fn read(&self, id: ResourceId) -> Result<String, McpError> {
        let text = match id {
            ResourceId::TableSchema(table) => serde_json::to_string_pretty(table.descriptor())?,
            ResourceId::StatsSummary => serde_json::to_string_pretty(&self.stats_summary().await?)?,
        };
        tracing::debug!(uri = %id.uri(), bytes = text.len(), "Read resource");
        Ok(text)
    }

    /// Wrap [`ResourceReader::read`] in the `resources/read` content entry.
    pub async fn contents(&self, id: ResourceId) -> Result<ResourceContents, McpError> {
        Ok(ResourceContents {
            uri: id.uri().to_string(),
            mime_type: id.mime_type().to_string(),
            text: self.read(id).await?,
        })
    }

    /// Compute the statistics summary.
    pub async fn stats_summary(&self) -> Result<StatsSummary, StoreError> {
        self.db
            .with_session(|session| {
                Box::pin(async move {
                    let mut record_counts = BTreeMap::new();
                    for table in Table::ALL {
                        record_counts.insert(table.name().to_string(), session.count_rows(table).await?);
                    }

                    let order_status_distribution = session
                        .execute(STATUS_DISTRIBUTION, &[])
                        .await?
                        .rows
                        .iter()
                        .filter_map(|row| Some((text(row, "status")?, row.get("count")?.as_i64()?)))
                        .collect();

                    let product_categories = session
                        .execute(CATEGORIES, &[])
                        .await?
                        .rows
                        .iter()
                        .filter_map(|row| text(row, "category"))
                        .collect();

                    let range = session.fetch_optional(DATE_RANGE, &[]).await?;
                    let date_range = DateRange {
                        earliest_order: range.as_ref().and_then(|row| text(row, "earliest_order")),
                        latest_order: range.as_ref().and_then(|row| text(row, "latest_order")),
                    };

                    Ok::<_, StoreError>(StatsSummary {
                        record_counts,
                        order_status_distribution,
                        product_categories,
                        date_range,
                    })
                })
            })
            .await
    }
}

fn text(row: &Map<String, Value>, column: &str) -> Option<String> {
    row.get(column)?.as_str().map(str::to_string)
}

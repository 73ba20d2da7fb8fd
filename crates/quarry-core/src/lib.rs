//! # quarry-core
//!
//! Shared types for the Quarry MCP database gateway.
//!
//! - [`model`]: the e-commerce entities (customers, products, orders, order items)
//! - [`catalog`]: static descriptions of every addressable resource
//! - [`config`]: the `quarry.yaml` configuration model

pub mod catalog;
pub mod config;
pub mod model;

pub use catalog::{ColumnDescriptor, ResourceId, Table, TableDescriptor};
pub use config::{
    ConfigError, DatabaseConfig, GuardrailsConfig, LogFormat, LoggingConfig, McpConfig,
    PoolConfig, QuarryConfig, Transport,
};
pub use model::{Customer, Dataset, Order, OrderItem, OrderStatus, Product};

/// Hard ceiling on the number of rows an ad-hoc query may return.
pub const MAX_QUERY_LIMIT: u32 = 1000;

/// Product categories the sample catalog draws from. Not enforced by the store.
pub const PRODUCT_CATEGORIES: [&str; 6] = [
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Sports",
    "Books",
    "Toys",
];

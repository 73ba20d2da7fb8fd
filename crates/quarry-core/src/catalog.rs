//! Schema catalog.
//!
//! Static descriptions of every resource the gateway exposes: one schema document
//! per table plus the live statistics summary. Nothing here touches the database.

use serde::Serialize;
use std::fmt;

/// MIME type of every resource document.
pub const RESOURCE_MIME_TYPE: &str = "application/json";

/// Column metadata as published in a table schema document.
///
/// Flags are only serialized when set, so a plain column renders as `{name, type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub sql_type: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub primary_key: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub unique: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub indexed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<&'static str>,
    #[serde(skip_serializing_if = "is_empty")]
    pub values: &'static [&'static str],
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn is_empty(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

impl ColumnDescriptor {
    const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            unique: false,
            indexed: false,
            nullable: false,
            foreign_key: None,
            values: &[],
        }
    }

    const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    const fn references(mut self, target: &'static str) -> Self {
        self.foreign_key = Some(target);
        self
    }

    const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.values = values;
        self
    }
}

/// Schema document for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub table: &'static str,
    pub description: &'static str,
    pub columns: &'static [ColumnDescriptor],
    pub relationships: &'static [&'static str],
    pub indexes: &'static [&'static str],
    pub sample_query: &'static str,
}

impl TableDescriptor {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const ID: ColumnDescriptor = ColumnDescriptor::new("id", "INTEGER").primary_key();
const CREATED_AT: ColumnDescriptor = ColumnDescriptor::new("created_at", "DATETIME");
const UPDATED_AT: ColumnDescriptor = ColumnDescriptor::new("updated_at", "DATETIME");

static CUSTOMERS: TableDescriptor = TableDescriptor {
    table: "customers",
    description: "Customer master data with contact information",
    columns: &[
        ID,
        ColumnDescriptor::new("email", "VARCHAR(255)").unique().indexed(),
        ColumnDescriptor::new("first_name", "VARCHAR(100)"),
        ColumnDescriptor::new("last_name", "VARCHAR(100)"),
        ColumnDescriptor::new("phone", "VARCHAR(20)").nullable(),
        ColumnDescriptor::new("country", "VARCHAR(100)").indexed(),
        CREATED_AT,
        UPDATED_AT,
    ],
    relationships: &["Has many Orders"],
    indexes: &[
        "idx_customer_name (last_name, first_name)",
        "idx_customer_country (country)",
    ],
    sample_query: "SELECT * FROM customers WHERE country = 'USA' LIMIT 10",
};

static PRODUCTS: TableDescriptor = TableDescriptor {
    table: "products",
    description: "Product catalog with pricing and inventory",
    columns: &[
        ID,
        ColumnDescriptor::new("sku", "VARCHAR(50)").unique().indexed(),
        ColumnDescriptor::new("name", "VARCHAR(255)"),
        ColumnDescriptor::new("description", "VARCHAR(1000)").nullable(),
        ColumnDescriptor::new("category", "VARCHAR(100)").indexed(),
        ColumnDescriptor::new("price", "FLOAT"),
        ColumnDescriptor::new("stock_quantity", "INTEGER"),
        CREATED_AT,
        UPDATED_AT,
    ],
    relationships: &["Has many OrderItems"],
    indexes: &["idx_product_category_price (category, price)"],
    sample_query: "SELECT * FROM products WHERE category = 'Electronics' ORDER BY price DESC LIMIT 10",
};

static ORDERS: TableDescriptor = TableDescriptor {
    table: "orders",
    description: "Customer orders with status tracking",
    columns: &[
        ID,
        ColumnDescriptor::new("customer_id", "INTEGER")
            .references("customers.id")
            .indexed(),
        ColumnDescriptor::new("order_date", "DATETIME"),
        ColumnDescriptor::new("status", "VARCHAR(50)")
            .indexed()
            .one_of(&["pending", "processing", "shipped", "delivered", "cancelled"]),
        ColumnDescriptor::new("total_amount", "FLOAT"),
        ColumnDescriptor::new("shipping_address", "VARCHAR(500)"),
        CREATED_AT,
        UPDATED_AT,
    ],
    relationships: &["Belongs to Customer", "Has many OrderItems"],
    indexes: &[
        "idx_order_customer_date (customer_id, order_date)",
        "idx_order_status_date (status, order_date)",
    ],
    sample_query: "SELECT * FROM orders WHERE status = 'delivered' ORDER BY order_date DESC LIMIT 10",
};

static ORDER_ITEMS: TableDescriptor = TableDescriptor {
    table: "order_items",
    description: "Line items for orders with quantity and pricing snapshot",
    columns: &[
        ID,
        ColumnDescriptor::new("order_id", "INTEGER")
            .references("orders.id")
            .indexed(),
        ColumnDescriptor::new("product_id", "INTEGER")
            .references("products.id")
            .indexed(),
        ColumnDescriptor::new("quantity", "INTEGER"),
        ColumnDescriptor::new("unit_price", "FLOAT"),
        ColumnDescriptor::new("subtotal", "FLOAT"),
    ],
    relationships: &["Belongs to Order", "Belongs to Product"],
    indexes: &["idx_order_item_order_product (order_id, product_id)"],
    sample_query: "SELECT * FROM order_items WHERE order_id = 1",
};

/// The four tables of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Customers,
    Products,
    Orders,
    OrderItems,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Customers,
        Table::Products,
        Table::Orders,
        Table::OrderItems,
    ];

    /// SQL table name.
    pub fn name(&self) -> &'static str {
        self.descriptor().table
    }

    pub fn descriptor(&self) -> &'static TableDescriptor {
        match self {
            Table::Customers => &CUSTOMERS,
            Table::Products => &PRODUCTS,
            Table::Orders => &ORDERS,
            Table::OrderItems => &ORDER_ITEMS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every addressable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Static schema document for a table.
    TableSchema(Table),
    /// Live statistics computed from the store on each read.
    StatsSummary,
}

impl ResourceId {
    /// Catalog order: the four table schemas, then the statistics summary.
    pub const ALL: [ResourceId; 5] = [
        ResourceId::TableSchema(Table::Customers),
        ResourceId::TableSchema(Table::Products),
        ResourceId::TableSchema(Table::Orders),
        ResourceId::TableSchema(Table::OrderItems),
        ResourceId::StatsSummary,
    ];

    pub fn uri(&self) -> &'static str {
        match self {
            ResourceId::TableSchema(Table::Customers) => "db://schema/customers",
            ResourceId::TableSchema(Table::Products) => "db://schema/products",
            ResourceId::TableSchema(Table::Orders) => "db://schema/orders",
            ResourceId::TableSchema(Table::OrderItems) => "db://schema/order_items",
            ResourceId::StatsSummary => "db://stats/summary",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceId::TableSchema(Table::Customers) => "Customer Table Schema",
            ResourceId::TableSchema(Table::Products) => "Product Table Schema",
            ResourceId::TableSchema(Table::Orders) => "Order Table Schema",
            ResourceId::TableSchema(Table::OrderItems) => "Order Items Table Schema",
            ResourceId::StatsSummary => "Database Statistics",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResourceId::TableSchema(Table::Customers) => {
                "Schema definition and sample data for customers table"
            }
            ResourceId::TableSchema(Table::Products) => {
                "Schema definition and sample data for products table"
            }
            ResourceId::TableSchema(Table::Orders) => {
                "Schema definition and sample data for orders table"
            }
            ResourceId::TableSchema(Table::OrderItems) => "Schema definition for order line items",
            ResourceId::StatsSummary => "Summary statistics: record counts, value ranges, etc.",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        RESOURCE_MIME_TYPE
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

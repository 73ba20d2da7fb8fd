//! Entity model for the e-commerce store.
//!
//! The gateway itself only ever reads these tables. The in-memory types here are
//! what the seeder builds before writing a fresh dataset.
//!
//! Ownership follows the relational shape: a [`Dataset`] owns every row in flat
//! arenas, an [`Order`] owns its line items by index into
//! [`Dataset::order_items`], and an [`OrderItem`] only carries the foreign key of
//! the product it references.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in workflow order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The value stored in the `orders.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Display name, `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub shipping_address: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Indices into [`Dataset::order_items`].
    #[serde(skip)]
    pub items: Vec<usize>,
}

/// A line item. `unit_price` is a snapshot of the product price at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl OrderItem {
    /// Build a line item, deriving `subtotal` from quantity and unit price.
    pub fn new(id: i64, order_id: i64, product_id: i64, quantity: i64, unit_price: f64) -> Self {
        Self {
            id,
            order_id,
            product_id,
            quantity,
            unit_price,
            subtotal: round_cents(quantity as f64 * unit_price),
        }
    }
}

/// A complete set of rows for the four tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

impl Dataset {
    /// Line items owned by `order`.
    pub fn items_of<'a>(&'a self, order: &'a Order) -> impl Iterator<Item = &'a OrderItem> + 'a {
        order
            .items
            .iter()
            .filter_map(move |&index| self.order_items.get(index))
    }

    /// Sum of the subtotals of the items owned by `order`, rounded to cents.
    pub fn order_total(&self, order: &Order) -> f64 {
        round_cents(self.items_of(order).map(|item| item.subtotal).sum())
    }
}

/// Round a monetary amount to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

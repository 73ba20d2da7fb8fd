//! Sample data generation.
//!
//! [`generate`] builds a complete [`Dataset`] in memory; [`insert`] writes it in a
//! single session. Passing a fixed `rng_seed` makes the dataset reproducible.

use crate::error::StoreError;
use crate::session::Database;
use crate::value::SqlParam;
use chrono::{Duration, NaiveDateTime};
use quarry_core::model::round_cents;
use quarry_core::{Customer, Dataset, Order, OrderItem, OrderStatus, PRODUCT_CATEGORIES, Product};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, index};
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Barbara", "David", "Elizabeth", "Richard", "Susan", "Joseph", "Jessica",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas",
];

const COUNTRIES: &[&str] = &[
    "USA", "Canada", "UK", "Germany", "France", "Australia", "Japan", "India",
];

const CITIES: &[&str] = &[
    "New York", "Los Angeles", "London", "Berlin", "Paris", "Sydney", "Tokyo", "Mumbai",
];

const MODELS: &[&str] = &["A", "B", "C", "D"];

fn product_names(category: &str) -> &'static [&'static str] {
    match category {
        "Electronics" => &["Laptop", "Smartphone", "Tablet", "Headphones", "Smart Watch", "Camera"],
        "Clothing" => &["T-Shirt", "Jeans", "Jacket", "Sneakers", "Dress", "Hoodie"],
        "Home & Garden" => &["Coffee Maker", "Blender", "Vacuum Cleaner", "Plant Pot", "Lamp", "Rug"],
        "Sports" => &["Running Shoes", "Yoga Mat", "Dumbbell Set", "Tennis Racket", "Bicycle", "Backpack"],
        "Books" => &["Fiction Novel", "Cookbook", "Biography", "Tech Manual", "Mystery Thriller", "Self-Help"],
        _ => &["Board Game", "Action Figure", "Puzzle", "Building Blocks", "Doll", "RC Car"],
    }
}

/// How much data to generate.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    /// Fixed seed for reproducible data; random when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            customers: 50,
            products: 100,
            orders: 200,
            rng_seed: None,
        }
    }
}

/// Rows written by [`insert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Build a dataset relative to `now`. Ids start at 1 in every table.
pub fn generate(plan: &SeedPlan, now: NaiveDateTime) -> Dataset {
    let mut rng = match plan.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut dataset = Dataset::default();

    for i in 1..=plan.customers {
        let created_at = now - Duration::days(rng.random_range(0..=365));
        dataset.customers.push(Customer {
            id: i as i64,
            email: format!("customer{}@example.com", i),
            first_name: pick(&mut rng, FIRST_NAMES).to_string(),
            last_name: pick(&mut rng, LAST_NAMES).to_string(),
            phone: Some(format!("+1-555-{}", rng.random_range(1000..=9999))),
            country: pick(&mut rng, COUNTRIES).to_string(),
            created_at,
            updated_at: created_at,
        });
    }

    for i in 1..=plan.products {
        let category = pick(&mut rng, &PRODUCT_CATEGORIES);
        let base_name = pick(&mut rng, product_names(category));
        let created_at = now - Duration::days(rng.random_range(0..=180));
        let prefix: String = category.chars().take(3).collect::<String>().to_uppercase();
        dataset.products.push(Product {
            id: i as i64,
            sku: format!("SKU-{}-{:04}", prefix, i),
            name: format!("{} - Model {}", base_name, pick(&mut rng, MODELS)),
            description: Some(format!(
                "High-quality {} from {} collection",
                base_name.to_lowercase(),
                category
            )),
            category: category.to_string(),
            price: round_cents(rng.random_range(9.99..=999.99)),
            stock_quantity: rng.random_range(0..=500),
            created_at,
            updated_at: created_at,
        });
    }

    if dataset.customers.is_empty() || dataset.products.is_empty() {
        return dataset;
    }

    for i in 1..=plan.orders {
        let order_id = i as i64;
        let customer_index = rng.random_range(0..dataset.customers.len());
        let order_date = now - Duration::days(rng.random_range(0..=90));
        let item_count = rng.random_range(1..=5).min(dataset.products.len());

        let mut items = Vec::with_capacity(item_count);
        for product_index in index::sample(&mut rng, dataset.products.len(), item_count) {
            let product = &dataset.products[product_index];
            let item_id = dataset.order_items.len() as i64 + 1;
            let quantity = rng.random_range(1..=3);
            items.push(dataset.order_items.len());
            dataset
                .order_items
                .push(OrderItem::new(item_id, order_id, product.id, quantity, product.price));
        }

        let customer = &dataset.customers[customer_index];
        let shipping_address = format!(
            "{} Main St, {}, {}",
            rng.random_range(100..=9999),
            pick(&mut rng, CITIES),
            customer.country
        );
        let mut order = Order {
            id: order_id,
            customer_id: customer.id,
            order_date,
            status: *OrderStatus::ALL.choose(&mut rng).unwrap_or(&OrderStatus::Pending),
            total_amount: 0.0,
            shipping_address,
            created_at: order_date,
            updated_at: order_date,
            items,
        };
        order.total_amount = dataset.order_total(&order);
        dataset.orders.push(order);
    }

    dataset
}

/// Write `dataset` in one session. Nothing is written if any insert fails.
pub async fn insert(db: &Database, dataset: Dataset) -> Result<SeedReport, StoreError> {
    db.with_session(move |session| {
        Box::pin(async move {
            for c in &dataset.customers {
                session
                    .run(
                        "INSERT INTO customers (id, email, first_name, last_name, phone, country, created_at, updated_at) \
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                        &[
                            c.id.into(),
                            c.email.as_str().into(),
                            c.first_name.as_str().into(),
                            c.last_name.as_str().into(),
                            c.phone.clone().into(),
                            c.country.as_str().into(),
                            c.created_at.into(),
                            c.updated_at.into(),
                        ],
                    )
                    .await?;
            }
            tracing::debug!(count = dataset.customers.len(), "Inserted customers");

            for p in &dataset.products {
                session
                    .run(
                        "INSERT INTO products (id, sku, name, description, category, price, stock_quantity, created_at, updated_at) \
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        &[
                            p.id.into(),
                            p.sku.as_str().into(),
                            p.name.as_str().into(),
                            p.description.clone().into(),
                            p.category.as_str().into(),
                            p.price.into(),
                            p.stock_quantity.into(),
                            p.created_at.into(),
                            p.updated_at.into(),
                        ],
                    )
                    .await?;
            }
            tracing::debug!(count = dataset.products.len(), "Inserted products");

            for o in &dataset.orders {
                session
                    .run(
                        "INSERT INTO orders (id, customer_id, order_date, status, total_amount, shipping_address, created_at, updated_at) \
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                        &[
                            o.id.into(),
                            o.customer_id.into(),
                            o.order_date.into(),
                            o.status.as_str().into(),
                            o.total_amount.into(),
                            o.shipping_address.as_str().into(),
                            o.created_at.into(),
                            o.updated_at.into(),
                        ],
                    )
                    .await?;

                for item in dataset.items_of(o) {
                    session
                        .run(
                            "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, subtotal) \
                             VALUES (?, ?, ?, ?, ?, ?)",
                            &[
                                item.id.into(),
                                item.order_id.into(),
                                item.product_id.into(),
                                item.quantity.into(),
                                item.unit_price.into(),
                                item.subtotal.into(),
                            ],
                        )
                        .await?;
                }
            }
            tracing::debug!(
                orders = dataset.orders.len(),
                items = dataset.order_items.len(),
                "Inserted orders"
            );

            Ok::<_, StoreError>(SeedReport {
                customers: dataset.customers.len(),
                products: dataset.products.len(),
                orders: dataset.orders.len(),
                order_items: dataset.order_items.len(),
            })
        })
    })
    .await
}

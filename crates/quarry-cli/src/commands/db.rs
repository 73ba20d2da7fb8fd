//! `quarry init` and `quarry seed` - schema and sample data management.

use anyhow::{Context, Result};
use clap::Args;
use quarry_adapter_sqlite::{Database, SeedPlan, SeedReport, seed};
use quarry_core::QuarryConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Drop all tables before creating them
    #[arg(long, default_value_t = false)]
    pub reset: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Number of customers to generate
    #[arg(long, default_value_t = 50)]
    pub customers: usize,

    /// Number of products to generate
    #[arg(long, default_value_t = 100)]
    pub products: usize,

    /// Number of orders to generate
    #[arg(long, default_value_t = 200)]
    pub orders: usize,

    /// Fixed RNG seed for reproducible data
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Drop and recreate all tables first
    #[arg(long, default_value_t = false)]
    pub reset: bool,
}

impl SeedArgs {
    fn plan(&self) -> SeedPlan {
        SeedPlan {
            customers: self.customers,
            products: self.products,
            orders: self.orders,
            rng_seed: self.rng_seed,
        }
    }
}

pub async fn init(config: QuarryConfig, args: InitArgs) -> Result<()> {
    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let result = prepare(&db, args.reset).await;
    db.close().await;
    result?;

    println!("✅ Schema ready at {}", config.database.connection_string());
    Ok(())
}

pub async fn seed(config: QuarryConfig, args: SeedArgs) -> Result<()> {
    if args.orders > 0 && (args.customers == 0 || args.products == 0) {
        anyhow::bail!("Orders need at least one customer and one product");
    }

    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let result = seed_database(&db, &args).await;
    db.close().await;
    let report = result?;

    println!("🌱 Seeded {}", config.database.connection_string());
    print_report(&report);
    Ok(())
}

async fn prepare(db: &Database, reset: bool) -> Result<()> {
    if reset {
        db.reset().await.context("Failed to drop tables")?;
        println!("🗑️  Dropped existing tables");
    }
    db.bootstrap().await.context("Failed to create schema")?;
    Ok(())
}

async fn seed_database(db: &Database, args: &SeedArgs) -> Result<SeedReport> {
    prepare(db, args.reset).await?;

    let dataset = seed::generate(&args.plan(), chrono::Local::now().naive_local());
    seed::insert(db, dataset)
        .await
        .context("Failed to insert sample data")
}

fn print_report(report: &SeedReport) {
    println!("   👤 Customers:   {}", report.customers);
    println!("   📦 Products:    {}", report.products);
    println!("   🧾 Orders:      {}", report.orders);
    println!("   📋 Order items: {}", report.order_items);
}

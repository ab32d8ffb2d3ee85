//! Seed data script - loads the apple/ibm demo rows
//!
//! Run with: cargo run --bin seed-data
//!
//! Expects a migrated, empty database at `DATABASE_URL`.

use biztime_api::{db, seed};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== BizTime Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://biztime.db?mode=rwc".to_string());

    let config = db::DbConfig {
        url: database_url.clone(),
        max_connections: 5,
        connect_timeout: Duration::from_secs(10),
        acquire_timeout: Duration::from_secs(10),
        ..Default::default()
    };

    info!("Connecting to database: {}", database_url);
    let pool = db::establish_connection_with_config(&config).await?;

    let summary = seed::seed_demo_data(&pool).await?;
    info!(
        "Created {} companies and {} invoices",
        summary.companies, summary.invoices
    );

    info!("Try these API calls:");
    info!("  curl http://localhost:8080/companies/apple");
    info!("  curl http://localhost:8080/invoices");

    db::close_pool(pool).await?;
    Ok(())
}

//! Applies the schema migrations to `DATABASE_URL`.
//!
//! Run with: cargo run --bin migration

use biztime_api::{db, migrator::Migrator};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting database migration");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://biztime.db?mode=rwc".to_string());
    info!("Connecting to database: {}", database_url);

    let config = db::DbConfig {
        url: database_url,
        max_connections: 5,
        connect_timeout: Duration::from_secs(10),
        acquire_timeout: Duration::from_secs(10),
        idle_timeout: Duration::from_secs(300),
        sqlx_logging: true,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config).await?;

    db::run_migrations(&pool).await?;

    let applied = Migrator::get_applied_migrations(&pool).await?;
    info!("{} migrations applied", applied.len());

    db::close_pool(pool).await?;
    info!("Migration completed successfully");
    Ok(())
}

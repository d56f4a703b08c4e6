//! Persistence layer for Shelfwatch.
//!
//! Exposes the connection pool helpers, row models, and zero-sized
//! repository structs. Seller-owned rows are always queried with the
//! owner in the WHERE clause; handlers never build SQL themselves.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod resolver;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

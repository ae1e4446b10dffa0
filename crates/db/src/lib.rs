//! Tourwise database layer.
//!
//! Entity models, DTOs, and the repositories that own all mutation of the
//! scheduling and capacity tables. Callers outside this crate never write
//! `staff_assignments`, `tour_transports`, or `transport_guest_assignments`
//! directly — the no-overlap and counter invariants are only trustworthy
//! because every mutation path goes through a repository here.

use sqlx::postgres::PgPoolOptions;

pub mod error;
mod locks;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

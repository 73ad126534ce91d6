//! Database connection and schema bootstrap.
//!
//! The PostgreSQL pool is the only shared state in the process; every request
//! synchronizes through it. The schema is applied idempotently at startup so
//! a fresh database becomes usable without a separate migration step.

use log::info;
use sqlx::{Executor, PgPool};

/// Establishes a connection pool to the PostgreSQL database.
///
/// # Parameters
///
/// - `database_url`: PostgreSQL connection string
///
/// # Returns
///
/// - `Ok(PgPool)`: A connection pool to the database
/// - `Err(sqlx::Error)`: If the connection fails
pub async fn get_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to PostgreSQL database");

    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to PostgreSQL database");

    Ok(pool)
}

/// Applies the schema in `src/sql/schema.sql`.
///
/// Every statement is `IF NOT EXISTS`, so this is safe to run on every boot.
pub async fn prepare_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Ensuring database schema is up to date");
    pool.execute(include_str!("sql/schema.sql")).await?;
    Ok(())
}

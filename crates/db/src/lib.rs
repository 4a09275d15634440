//! Persistence layer: connection pool, migrations, row models and
//! repositories for users, auth tokens and products.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod health;
#[cfg(feature = "memory")]
pub mod memory;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// The pool is the only state shared between requests; `max_connections`
/// bounds concurrent statements and `max_lifetime` recycles connections.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    max_lifetime: Duration,
) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(max_connections, ?max_lifetime, "Creating database pool");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .max_lifetime(max_lifetime)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

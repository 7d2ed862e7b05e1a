//! PostgreSQL persistence: pool setup, migrations, row models and
//! repositories, plus [`PgProfileRepository`] which plugs the `profiles`
//! table into the core [`ProfileRepository`](homecarpent_core::ports::ProfileRepository)
//! trait.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod profile_store;
pub mod repositories;

pub use profile_store::PgProfileRepository;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

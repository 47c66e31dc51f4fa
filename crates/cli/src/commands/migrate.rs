//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Run everything (catalog, admin users, both session tables)
//! jozoor migrate
//!
//! # Catalog and admin tables, plus the admin session table
//! jozoor migrate admin
//!
//! # Storefront session table only
//! jozoor migrate storefront
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for storefront
//! - `DATABASE_URL` - fallback for both
//!
//! # Migration Files
//!
//! SQL migrations live in `crates/admin/migrations/`. Session tables are
//! created by `tower-sessions-sqlx-store`.

use jozoor_admin::{db, middleware};
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use super::database_url;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the SQL migrations and create the admin session table.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn admin() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let url = database_url("ADMIN_DATABASE_URL").map_err(MigrationError::MissingEnvVar)?;

    tracing::info!("Connecting to admin database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Creating admin session table...");
    middleware::create_session_store(&pool).migrate().await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}

/// Create the storefront session table.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the table cannot be
/// created.
pub async fn storefront() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let url = database_url("STOREFRONT_DATABASE_URL").map_err(MigrationError::MissingEnvVar)?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Creating storefront session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}

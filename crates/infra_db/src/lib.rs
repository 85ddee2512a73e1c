//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL infrastructure for the loan origination
//! system using SQLx.
//!
//! The crate follows the repository pattern: repositories hide the SQL behind
//! the port traits the domain defines, so the domain layer never sees the
//! database implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, ApplicationRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/loans")).await?;
//! let repo = ApplicationRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::{ApplicationRepository, UserRepository};

/// Applies the embedded migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    tracing::info!("Database ready");
    Ok(())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `PostGIS` spatial store, connection, and migrations for street cards.
//!
//! Uses `switchy_database` for connections and `switchy_schema` for
//! embedded SQL migrations. Every spatial query is raw SQL via
//! `query_raw_params()`; distances are computed by `PostGIS` on the
//! `geography` type.

pub mod db;
pub mod queries;
pub mod store;

pub use store::PostgisStore;

use include_dir::{Dir, include_dir};
use street_card::StoreError;
use switchy_database::Database;
use switchy_schema::discovery::embedded::EmbeddedMigrationSource;
use switchy_schema::runner::MigrationRunner;

/// Embedded SQL migrations from the `migrations/` directory.
static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../../migrations");

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] switchy_schema::MigrationError),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conversion { message } => Self::Conversion { message },
            DbError::Database(_) | DbError::Migration(_) => Self::Query {
                message: e.to_string(),
            },
        }
    }
}

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns [`DbError`] if any migration fails to apply.
pub async fn run_migrations(db: &dyn Database) -> Result<(), DbError> {
    let source = EmbeddedMigrationSource::new(&MIGRATIONS_DIR);
    let runner = MigrationRunner::new(Box::new(source));
    runner.run(db).await?;
    log::info!("Database migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_errors_stay_conversion_errors() {
        let err = StoreError::from(DbError::Conversion {
            message: "bad id".to_string(),
        });
        assert_eq!(
            err,
            StoreError::Conversion {
                message: "bad id".to_string()
            }
        );
    }

    #[test]
    fn migrations_are_embedded() {
        assert!(
            MIGRATIONS_DIR.dirs().next().is_some(),
            "expected at least one migration directory"
        );
    }
}

// ABOUTME: Data layer and persistence for Storefront
// ABOUTME: Provides the shared error taxonomy and SQLite pool construction

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Tag not found")]
    NotFound,
    #[error("Duplicate tag name: {0}")]
    DuplicateName(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Open the SQLite database at `database_path` and run migrations.
///
/// Foreign keys are enabled on every connection; join-row cleanup on tag
/// deletion relies on the cascade rules in the schema.
pub async fn connect(database_path: &Path) -> StorageResult<SqlitePool> {
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    debug!("Connecting to database: {}", database_path.display());

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!("Database connection established");

    MIGRATOR.run(&pool).await?;

    debug!("Database migrations completed");

    Ok(pool)
}

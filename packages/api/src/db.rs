// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use storefront_storage::StorageResult;
use storefront_tags::TagStorage;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub tag_storage: Arc<TagStorage>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        let tag_storage = Arc::new(TagStorage::new(pool.clone()));
        Self { pool, tag_storage }
    }

    /// Initialize database state, connecting to `database_path` and
    /// running migrations
    pub async fn init(database_path: &Path) -> StorageResult<Self> {
        let pool = storefront_storage::connect(database_path).await?;
        Ok(Self::new(pool))
    }
}

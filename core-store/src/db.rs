//! # Database Connection Pool Module
//!
//! Provides SQLite connection pooling for the catalog cache.
//!
//! ## Features
//!
//! - **WAL Mode**: Enabled for better concurrency (multiple readers, one writer)
//! - **Connection Pooling**: Configurable min/max connections with timeouts
//! - **Foreign Keys**: Enforced for referential integrity
//! - **Schema Application**: Idempotent `CREATE TABLE IF NOT EXISTS` on init
//! - **Health Checks**: Connection validation
//!
//! ## Testing
//!
//! For tests, use in-memory databases:
//!
//! ```rust,ignore
//! let pool = create_test_pool().await?;
//! ```

use core_types::{CatalogError, CatalogResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Database configuration for the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL, `sqlite::memory:` for an in-memory database.
    pub database_url: String,

    /// Minimum number of connections in the pool.
    pub min_connections: u32,

    /// Maximum number of connections in the pool.
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Create a configuration for the given database file path.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        Self {
            database_url: format!("sqlite:{}", path.display()),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Create a configuration for an in-memory database (useful for testing).
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool.
///
/// Configures connection options (WAL mode, foreign keys), creates the
/// pool, applies the cache schema, and performs a health check.
pub async fn create_pool(config: DatabaseConfig) -> CatalogResult<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| CatalogError::Io(e.to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true)
        .pragma("cache_size", "-64000");

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            CatalogError::Io(e.to_string())
        })?;

    apply_schema(&pool).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// Create a connection pool for testing with an in-memory database.
pub async fn create_test_pool() -> CatalogResult<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

/// Apply the cache schema.
///
/// Every statement is idempotent, so this is safe to run on each startup.
async fn apply_schema(pool: &Pool<Sqlite>) -> CatalogResult<()> {
    debug!("Applying cache schema");

    let statements = [
        "CREATE TABLE IF NOT EXISTS cache_items (
            feed TEXT NOT NULL,
            id INTEGER NOT NULL,
            position INTEGER NOT NULL CHECK (position >= 0),
            payload TEXT NOT NULL,
            PRIMARY KEY (feed, id)
        )",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_cache_items_feed_position
            ON cache_items (feed, position)",
        "CREATE TABLE IF NOT EXISTS remote_cursors (
            feed TEXT NOT NULL,
            id INTEGER NOT NULL,
            prev_offset INTEGER,
            next_offset INTEGER,
            PRIMARY KEY (feed, id)
        )",
        "CREATE TABLE IF NOT EXISTS favorites (
            entity_id INTEGER NOT NULL,
            entity_type TEXT NOT NULL,
            added_at INTEGER NOT NULL,
            PRIMARY KEY (entity_id, entity_type)
        )",
        "CREATE INDEX IF NOT EXISTS idx_favorites_added_at
            ON favorites (added_at)",
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await.map_err(|e| {
            warn!(error = %e, "Schema statement failed");
            CatalogError::Io(e.to_string())
        })?;
    }

    debug!("Cache schema applied");
    Ok(())
}

/// Verify the database is accessible and the pool is functioning.
async fn health_check(pool: &Pool<Sqlite>) -> CatalogResult<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        CatalogError::Io(e.to_string())
    })?;
    Ok(())
}

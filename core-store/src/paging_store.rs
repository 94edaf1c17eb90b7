//! Persisted paging cache: ordered display items plus remote cursor state.
//!
//! One [`PagingStore`] serves one *feed* (an entity kind in one list
//! context, e.g. `"recent_characters"`). All feeds share two tables keyed
//! by a feed discriminator, so the store is implemented once and
//! parameterized per kind instead of duplicated.

use core_types::{CatalogEntity, CatalogError, CatalogResult};
use sqlx::{FromRow, Pool, Sqlite};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// One cached display item: the payload plus its absolute rank in the
/// remote ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem<T> {
    /// Absolute position in the remote ordering; unique within a feed and
    /// the basis for ordered range reads and continuation offsets.
    pub position: i64,
    pub info: T,
}

/// Persisted pagination bookkeeping for one cached item.
///
/// A cursor row exists iff a merge wrote it; it is always written in the
/// same transaction as the items produced by the same fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCursor {
    pub id: i64,
    /// `None` means start-of-list for backward loads.
    pub prev_offset: Option<u32>,
    /// `None` means end-of-pagination for forward loads.
    pub next_offset: Option<u32>,
}

#[derive(FromRow)]
struct CacheItemRow {
    position: i64,
    payload: String,
}

#[derive(FromRow)]
struct RemoteCursorRow {
    id: i64,
    prev_offset: Option<i64>,
    next_offset: Option<i64>,
}

impl From<RemoteCursorRow> for RemoteCursor {
    fn from(row: RemoteCursorRow) -> Self {
        RemoteCursor {
            id: row.id,
            prev_offset: row.prev_offset.map(|v| v as u32),
            next_offset: row.next_offset.map(|v| v as u32),
        }
    }
}

/// Transactional store for one feed's cache items and remote cursors.
pub struct PagingStore<T> {
    pool: Pool<Sqlite>,
    feed: String,
    changes: Arc<watch::Sender<u64>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for PagingStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            feed: self.feed.clone(),
            changes: Arc::clone(&self.changes),
            _marker: PhantomData,
        }
    }
}

impl<T: CatalogEntity> PagingStore<T> {
    /// Create a store bound to the given feed discriminator.
    pub fn new(pool: Pool<Sqlite>, feed: impl Into<String>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            feed: feed.into(),
            changes: Arc::new(changes),
            _marker: PhantomData,
        }
    }

    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Receiver of a version counter bumped after every committed `save`.
    /// Readers use it to re-read current state after a merge lands.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Option<CacheItem<T>>> {
        let row = sqlx::query_as::<_, CacheItemRow>(
            "SELECT position, payload FROM cache_items WHERE feed = ? AND id = ?",
        )
        .bind(&self.feed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Io(e.to_string()))?;

        row.map(decode_item).transpose()
    }

    pub async fn get_cursor_by_id(&self, id: i64) -> CatalogResult<Option<RemoteCursor>> {
        let row = sqlx::query_as::<_, RemoteCursorRow>(
            "SELECT id, prev_offset, next_offset FROM remote_cursors WHERE feed = ? AND id = ?",
        )
        .bind(&self.feed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Io(e.to_string()))?;

        Ok(row.map(RemoteCursor::from))
    }

    /// Read up to `limit` items at positions `>= from_position`, ordered by
    /// position ascending. Every call re-reads current state, which makes
    /// reads restartable after invalidation.
    pub async fn get_range(&self, from_position: i64, limit: u32) -> CatalogResult<Vec<CacheItem<T>>> {
        let rows = sqlx::query_as::<_, CacheItemRow>(
            "SELECT position, payload FROM cache_items
             WHERE feed = ? AND position >= ?
             ORDER BY position ASC
             LIMIT ?",
        )
        .bind(&self.feed)
        .bind(from_position)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Io(e.to_string()))?;

        rows.into_iter().map(decode_item).collect()
    }

    pub async fn count(&self) -> CatalogResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cache_items WHERE feed = ?")
            .bind(&self.feed)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(count as u64)
    }

    /// Item at the lowest position, if any.
    pub async fn first(&self) -> CatalogResult<Option<CacheItem<T>>> {
        self.boundary_item("ASC").await
    }

    /// Item at the highest position, if any.
    pub async fn last(&self) -> CatalogResult<Option<CacheItem<T>>> {
        self.boundary_item("DESC").await
    }

    async fn boundary_item(&self, order: &str) -> CatalogResult<Option<CacheItem<T>>> {
        let sql = format!(
            "SELECT position, payload FROM cache_items
             WHERE feed = ? ORDER BY position {order} LIMIT 1"
        );
        let row = sqlx::query_as::<_, CacheItemRow>(&sql)
            .bind(&self.feed)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        row.map(decode_item).transpose()
    }

    /// Persist one merged page: cursors and items, all-or-nothing.
    ///
    /// With `clear_before_save` the feed's items and cursors are deleted
    /// first inside the same transaction (full refresh only). Any failure
    /// rolls the entire write back and surfaces `CatalogError::Io`; partial
    /// writes are never observable.
    #[instrument(skip(self, items, cursors), fields(feed = %self.feed, items = items.len()))]
    pub async fn save(
        &self,
        items: &[CacheItem<T>],
        cursors: &[RemoteCursor],
        clear_before_save: bool,
    ) -> CatalogResult<()> {
        // Encode payloads before the transaction is entered, so an encoding
        // failure cannot leave a write half-applied.
        let encoded: Vec<(i64, i64, String)> = items
            .iter()
            .map(|item| {
                serde_json::to_string(&item.info)
                    .map(|payload| (item.info.id(), item.position, payload))
                    .map_err(|e| CatalogError::Io(e.to_string()))
            })
            .collect::<CatalogResult<_>>()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        if clear_before_save {
            sqlx::query("DELETE FROM cache_items WHERE feed = ?")
                .bind(&self.feed)
                .execute(&mut *tx)
                .await
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            sqlx::query("DELETE FROM remote_cursors WHERE feed = ?")
                .bind(&self.feed)
                .execute(&mut *tx)
                .await
                .map_err(|e| CatalogError::Io(e.to_string()))?;
        }

        for cursor in cursors {
            sqlx::query(
                "INSERT OR REPLACE INTO remote_cursors (feed, id, prev_offset, next_offset)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&self.feed)
            .bind(cursor.id)
            .bind(cursor.prev_offset.map(|v| v as i64))
            .bind(cursor.next_offset.map(|v| v as i64))
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        }

        for (id, position, payload) in &encoded {
            sqlx::query(
                "INSERT OR REPLACE INTO cache_items (feed, id, position, payload)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&self.feed)
            .bind(id)
            .bind(position)
            .bind(payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        debug!(cleared = clear_before_save, "Merged page into cache");
        self.changes.send_modify(|version| *version += 1);
        Ok(())
    }
}

fn decode_item<T: CatalogEntity>(row: CacheItemRow) -> CatalogResult<CacheItem<T>> {
    let info = serde_json::from_str(&row.payload).map_err(|e| CatalogError::Io(e.to_string()))?;
    Ok(CacheItem {
        position: row.position,
        info,
    })
}

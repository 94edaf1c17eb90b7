//! Position-ordered paging windows over the persisted cache.
//!
//! This is the read side of a mediated feed: the mediator merges remote
//! pages into the store, and this source serves the consuming list purely
//! from the store. Keys are absolute cache positions. Every load re-reads
//! current state, so after a merge lands the consumer re-drives its loads
//! off the store's change signal and observes the new state.

use crate::load::{LoadParams, LoadResult, LoadType};
use core_store::PagingStore;
use core_types::CatalogEntity;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Reads ordered windows of one feed's cached items.
pub struct StorePagingSource<T> {
    store: PagingStore<T>,
    /// Cap on served positions; positions at or past it are never returned.
    max_items: Option<u32>,
}

impl<T: CatalogEntity> StorePagingSource<T> {
    pub fn new(store: PagingStore<T>) -> Self {
        Self {
            store,
            max_items: None,
        }
    }

    /// Serve at most `max_items` leading items of the feed. Used for
    /// fixed-size slices of a feed, e.g. a preview row.
    pub fn with_limit(mut self, max_items: u32) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Change signal of the backing store; bumps after every merge.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }

    /// Wait until the next merge commits. Consumers that must not miss a
    /// merge between loads should hold a [`changes`] receiver instead.
    ///
    /// [`changes`]: StorePagingSource::changes
    pub async fn invalidated(&self) {
        let mut changes = self.store.changes();
        let _ = changes.borrow_and_update();
        // Err means the store was dropped; nothing further will change.
        let _ = changes.changed().await;
    }

    /// Read one window of cached items.
    ///
    /// Refresh and append read `load_size` items starting at the key
    /// (default 0); prepend reads the window ending just before the key.
    /// `next_key` is absent when the read came up short of a full window,
    /// `prev_key` when the window starts at position 0.
    #[instrument(skip(self), fields(feed = %self.store.feed()))]
    pub async fn load(&self, params: &LoadParams) -> LoadResult<T> {
        let key = params.key.unwrap_or(0);

        let (from, limit) = match params.load_type {
            LoadType::Refresh | LoadType::Append => (key, params.load_size),
            LoadType::Prepend => {
                let from = key.saturating_sub(params.load_size);
                (from, key - from)
            }
        };
        let limit = match self.max_items {
            Some(max) => limit.min(max.saturating_sub(from)),
            None => limit,
        };

        if limit == 0 {
            return LoadResult::Page {
                items: Vec::new(),
                prev_key: None,
                next_key: if from == key { Some(key) } else { None },
            };
        }

        let items = match self.store.get_range(from as i64, limit).await {
            Ok(items) => items,
            Err(e) => return LoadResult::Error(e.into()),
        };
        let read = items.len() as u32;
        debug!(from, limit, read, "Served cache window");

        let prev_key = if from == 0 { None } else { Some(from) };
        let next_key = if read < limit {
            None
        } else {
            match self.max_items {
                Some(max) if from + read >= max => None,
                _ => Some(from + read),
            }
        };

        LoadResult::Page {
            items: items.into_iter().map(|item| item.info).collect(),
            prev_key,
            next_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entity, TestEntity};
    use core_store::{create_test_pool, CacheItem};

    async fn seeded_store(count: i64) -> PagingStore<TestEntity> {
        let pool = create_test_pool().await.unwrap();
        let store = PagingStore::new(pool, "recent_characters");
        let items: Vec<_> = (0..count)
            .map(|position| CacheItem {
                position,
                info: entity(position + 1),
            })
            .collect();
        store.save(&items, &[], false).await.unwrap();
        store
    }

    fn page(result: LoadResult<TestEntity>) -> (Vec<i64>, Option<u32>, Option<u32>) {
        match result {
            LoadResult::Page {
                items,
                prev_key,
                next_key,
            } => (items.iter().map(|i| i.id).collect(), prev_key, next_key),
            LoadResult::Error(e) => panic!("expected page, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_reads_leading_window() {
        let source = StorePagingSource::new(seeded_store(8).await);
        let (ids, prev, next) = page(source.load(&LoadParams::refresh(5)).await);
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(prev, None);
        assert_eq!(next, Some(5));
    }

    #[tokio::test]
    async fn test_append_continues_from_key() {
        let source = StorePagingSource::new(seeded_store(8).await);
        let (ids, prev, next) = page(source.load(&LoadParams::append(5, 5)).await);
        assert_eq!(ids, vec![6, 7, 8]);
        assert_eq!(prev, Some(5));
        // Short read: the cache ends here until the next merge.
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn test_prepend_reads_window_before_key() {
        let source = StorePagingSource::new(seeded_store(8).await);
        let (ids, prev, next) = page(source.load(&LoadParams::prepend(5, 3)).await);
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(prev, Some(2));
        assert_eq!(next, Some(5));
    }

    #[tokio::test]
    async fn test_prepend_clamps_at_start() {
        let source = StorePagingSource::new(seeded_store(8).await);
        let (ids, prev, next) = page(source.load(&LoadParams::prepend(2, 5)).await);
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(prev, None);
        assert_eq!(next, Some(2));
    }

    #[tokio::test]
    async fn test_prepend_at_position_zero_is_empty() {
        let source = StorePagingSource::new(seeded_store(8).await);
        let (ids, prev, next) = page(source.load(&LoadParams::prepend(0, 5)).await);
        assert!(ids.is_empty());
        assert_eq!(prev, None);
        assert_eq!(next, Some(0));
    }

    #[tokio::test]
    async fn test_empty_cache_is_terminal() {
        let source = StorePagingSource::new(seeded_store(0).await);
        let (ids, prev, next) = page(source.load(&LoadParams::refresh(5)).await);
        assert!(ids.is_empty());
        assert_eq!(prev, None);
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn test_limit_caps_served_positions() {
        let source = StorePagingSource::new(seeded_store(8).await).with_limit(4);

        let (ids, _, next) = page(source.load(&LoadParams::refresh(3)).await);
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(next, Some(3));

        let (ids, _, next) = page(source.load(&LoadParams::append(3, 3)).await);
        assert_eq!(ids, vec![4]);
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn test_invalidated_resolves_on_merge() {
        let store = seeded_store(1).await;
        let source = StorePagingSource::new(store.clone());

        let waiter = {
            let source = StorePagingSource::new(store.clone());
            tokio::spawn(async move { source.invalidated().await })
        };
        tokio::task::yield_now().await;

        store
            .save(
                &[CacheItem {
                    position: 1,
                    info: entity(2),
                }],
                &[],
                false,
            )
            .await
            .unwrap();
        waiter.await.unwrap();

        let (ids, _, _) = page(source.load(&LoadParams::refresh(5)).await);
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_reload_after_merge_sees_new_state() {
        let store = seeded_store(2).await;
        let source = StorePagingSource::new(store.clone());
        let mut changes = source.changes();
        changes.borrow_and_update();

        let (ids, _, _) = page(source.load(&LoadParams::refresh(5)).await);
        assert_eq!(ids, vec![1, 2]);

        let merged = vec![
            CacheItem {
                position: 2,
                info: entity(3),
            },
        ];
        store.save(&merged, &[], false).await.unwrap();
        assert!(changes.has_changed().unwrap());

        let (ids, _, _) = page(source.load(&LoadParams::refresh(5)).await);
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

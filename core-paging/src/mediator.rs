//! Remote mediator: fetch-and-merge state machine for feed lists backed
//! 1:1 by the remote catalog.
//!
//! One mediator serves one feed. It decides whether a load event needs a
//! network call at all, fetches the right window, and persists fetched
//! pages together with their cursor state in a single store transaction.
//! It never retries: a failed load produces one classified error, and the
//! caller's retry replays the same load type.

use crate::load::{LoadError, LoadType, MediatorResult, PagingState};
use crate::repo::CatalogRepository;
use core_store::{CacheItem, PagingStore, RemoteCursor};
use core_types::{CatalogEntity, CatalogResult, Filter, Sort};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Fetch-and-merge orchestrator for one feed.
pub struct RemoteMediator<T, R> {
    store: PagingStore<T>,
    repo: Arc<R>,
    sort: Option<Sort>,
    filters: Vec<Filter>,
    // Serializes loads for this feed so concurrent Prepend/Append can never
    // interleave store writes.
    load_lock: Mutex<()>,
}

impl<T, R> RemoteMediator<T, R>
where
    T: CatalogEntity,
    R: CatalogRepository<T>,
{
    pub fn new(
        store: PagingStore<T>,
        repo: Arc<R>,
        sort: Option<Sort>,
        filters: Vec<Filter>,
    ) -> Self {
        Self {
            store,
            repo,
            sort,
            filters,
            load_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &PagingStore<T> {
        &self.store
    }

    /// Handle one load event.
    ///
    /// Offsets for continuation are taken from the fetched envelope's own
    /// counters, so a drifting `number_of_total_results` (remote inserts or
    /// deletes during pagination) is absorbed by trusting the latest
    /// envelope. That is a known consistency gap, not a guarantee.
    #[instrument(skip(self, state), fields(feed = %self.store.feed()))]
    pub async fn load(&self, load_type: LoadType, state: &PagingState) -> MediatorResult {
        let _guard = self.load_lock.lock().await;

        let offset = match self.resolve_offset(load_type, state).await {
            Ok(Some(offset)) => offset,
            Ok(None) => {
                debug!(?load_type, "No more data in this direction; skipping fetch");
                return MediatorResult::Success {
                    end_of_pagination: true,
                };
            }
            Err(e) => return MediatorResult::Error(e.into()),
        };

        let envelope = match self
            .repo
            .get_items(offset, state.page_size, self.sort.as_ref(), &self.filters)
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, offset, "Remote fetch failed");
                return MediatorResult::Error(e.into());
            }
        };

        if !envelope.is_ok() {
            warn!(status = %envelope.status_code, "Remote catalog reported an error");
            return MediatorResult::Error(LoadError::from_envelope(&envelope));
        }

        // The envelope's counters are the authority for continuation.
        let offset = envelope.offset;
        let total = envelope.number_of_total_results;
        let end_of_pagination = envelope.end_of_results();
        let next_offset = if end_of_pagination {
            None
        } else {
            Some((offset + envelope.limit).min(total))
        };
        let prev_offset = if offset == 0 {
            None
        } else {
            Some(offset.saturating_sub(envelope.limit))
        };

        let cursors: Vec<RemoteCursor> = envelope
            .results
            .iter()
            .map(|info| RemoteCursor {
                id: info.id(),
                prev_offset,
                next_offset,
            })
            .collect();
        let items: Vec<CacheItem<T>> = envelope
            .results
            .into_iter()
            .enumerate()
            .map(|(index, info)| CacheItem {
                position: offset as i64 + index as i64,
                info,
            })
            .collect();

        let clear_before_save = load_type == LoadType::Refresh;
        match self.store.save(&items, &cursors, clear_before_save).await {
            Ok(()) => {
                debug!(
                    offset,
                    fetched = items.len(),
                    end_of_pagination,
                    "Merged remote page"
                );
                MediatorResult::Success { end_of_pagination }
            }
            Err(e) => MediatorResult::Error(e.into()),
        }
    }

    /// Decide the remote offset for a load event, or `None` when the load
    /// can be answered as end-of-pagination without a network call.
    async fn resolve_offset(
        &self,
        load_type: LoadType,
        state: &PagingState,
    ) -> CatalogResult<Option<u32>> {
        match load_type {
            LoadType::Refresh => Ok(Some(0)),
            LoadType::Prepend => {
                let Some(first_id) = state.first_item_id else {
                    return Ok(None);
                };
                let cursor = self.store.get_cursor_by_id(first_id).await?;
                Ok(cursor.and_then(|c| c.prev_offset))
            }
            LoadType::Append => {
                let Some(last_id) = state.last_item_id else {
                    return Ok(None);
                };
                let cursor = self.store.get_cursor_by_id(last_id).await?;
                Ok(cursor.and_then(|c| c.next_offset))
            }
        }
    }
}

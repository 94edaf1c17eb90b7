//! One consuming list's bundle of paging machinery.
//!
//! A [`FeedSession`] owns the mediator, the cache-backed source, and the
//! favorites overlay for a single feed, so the consumer holds one handle
//! with one lifetime. Dropping the session drops every live favorite
//! subscription it created, which is the teardown boundary for the list.

use crate::load::{LoadParams, LoadResult, LoadType, MediatorResult, PagingState};
use crate::mediator::RemoteMediator;
use crate::overlay::{subscribe, FavoriteFlag, FavoriteStatus, OverlaySet};
use crate::repo::CatalogRepository;
use crate::source::FavoritesAware;
use crate::store_source::StorePagingSource;
use core_store::{FavoritesRepository, PagingStore};
use core_types::{CatalogEntity, EntityType, Filter, Sort};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::instrument;

/// Mediator, cache source, and favorites overlay for one feed.
pub struct FeedSession<T, R> {
    store: PagingStore<T>,
    mediator: RemoteMediator<T, R>,
    source: StorePagingSource<T>,
    favorites: Option<Arc<dyn FavoritesRepository>>,
    overlay: Mutex<OverlaySet>,
}

impl<T, R> FeedSession<T, R>
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
        let mediator = RemoteMediator::new(store.clone(), repo, sort, filters);
        let source = StorePagingSource::new(store.clone());
        Self {
            store,
            mediator,
            source,
            favorites: None,
            overlay: Mutex::new(OverlaySet::new()),
        }
    }

    /// Attach a favorites repository; items served by [`load_local`] then
    /// carry live flags instead of frozen unknowns.
    ///
    /// [`load_local`]: FeedSession::load_local
    pub fn with_favorites(mut self, favorites: Arc<dyn FavoritesRepository>) -> Self {
        self.favorites = Some(favorites);
        self
    }

    /// Serve only the first `max_items` cached positions.
    pub fn with_limit(mut self, max_items: u32) -> Self {
        self.source = StorePagingSource::new(self.store.clone()).with_limit(max_items);
        self
    }

    pub fn store(&self) -> &PagingStore<T> {
        &self.store
    }

    /// Change signal of the backing cache; bumps after every merge.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }

    /// Drive the mediator for one load event, deriving the paging state
    /// from the current cache boundaries.
    #[instrument(skip(self), fields(feed = %self.store.feed()))]
    pub async fn load_remote(&self, load_type: LoadType, page_size: u32) -> MediatorResult {
        let first = match self.store.first().await {
            Ok(item) => item,
            Err(e) => return MediatorResult::Error(e.into()),
        };
        let last = match self.store.last().await {
            Ok(item) => item,
            Err(e) => return MediatorResult::Error(e.into()),
        };
        let state = PagingState {
            first_item_id: first.map(|item| item.info.id()),
            last_item_id: last.map(|item| item.info.id()),
            page_size,
        };
        self.mediator.load(load_type, &state).await
    }

    /// Read one window from the cache, joining favorite flags onto items.
    pub async fn load_local(&self, params: &LoadParams) -> LoadResult<FavoritesAware<T>> {
        let (items, prev_key, next_key) = match self.source.load(params).await {
            LoadResult::Page {
                items,
                prev_key,
                next_key,
            } => (items, prev_key, next_key),
            LoadResult::Error(e) => return LoadResult::Error(e),
        };

        let mut overlay = self.overlay.lock().await;
        let items = items
            .into_iter()
            .map(|info| {
                let favorite = match &self.favorites {
                    Some(favorites) => {
                        let (flag, sub) =
                            subscribe(favorites.as_ref(), info.id(), T::ENTITY_TYPE);
                        overlay.insert(info.id(), T::ENTITY_TYPE, sub);
                        flag
                    }
                    None => FavoriteFlag::frozen(FavoriteStatus::Unknown),
                };
                FavoritesAware { info, favorite }
            })
            .collect();

        LoadResult::Page {
            items,
            prev_key,
            next_key,
        }
    }

    /// Prune favorite subscriptions to the given visible keys.
    pub async fn retain_visible(&self, visible: &[(i64, EntityType)]) {
        self.overlay.lock().await.retain_visible(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{envelope, FakeRepo, TestEntity};
    use core_store::{create_test_pool, SqliteFavoritesRepository};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn session_with_favorites() -> (
        FeedSession<TestEntity, FakeRepo>,
        Arc<FakeRepo>,
        Arc<SqliteFavoritesRepository>,
    ) {
        let pool = create_test_pool().await.unwrap();
        let store = PagingStore::new(pool.clone(), "recent_characters");
        let repo = Arc::new(FakeRepo::new());
        let favorites = Arc::new(SqliteFavoritesRepository::new(pool));
        let session = FeedSession::new(store, repo.clone(), None, vec![])
            .with_favorites(favorites.clone() as Arc<dyn FavoritesRepository>);
        (session, repo, favorites)
    }

    async fn settled(flag: &mut FavoriteFlag) -> FavoriteStatus {
        while flag.get() == FavoriteStatus::Unknown {
            if !timeout(Duration::from_secs(1), flag.changed()).await.unwrap() {
                break;
            }
        }
        flag.get()
    }

    fn page_ids(result: &LoadResult<FavoritesAware<TestEntity>>) -> Vec<i64> {
        match result {
            LoadResult::Page { items, .. } => items.iter().map(|i| i.info.id).collect(),
            LoadResult::Error(e) => panic!("expected page, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_then_local_read() {
        let (session, repo, _) = session_with_favorites().await;
        repo.push_ok(envelope(0, 5, 5, 12, &[1, 2, 3, 4, 5]));

        let result = session.load_remote(LoadType::Refresh, 5).await;
        assert_eq!(
            result,
            MediatorResult::Success {
                end_of_pagination: false
            }
        );

        let local = session.load_local(&LoadParams::refresh(5)).await;
        assert_eq!(page_ids(&local), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_remote_append_uses_cache_boundaries() {
        let (session, repo, _) = session_with_favorites().await;
        repo.push_ok(envelope(0, 5, 5, 12, &[1, 2, 3, 4, 5]));
        session.load_remote(LoadType::Refresh, 5).await;

        repo.push_ok(envelope(5, 5, 5, 12, &[6, 7, 8, 9, 10]));
        let result = session.load_remote(LoadType::Append, 5).await;
        assert_eq!(
            result,
            MediatorResult::Success {
                end_of_pagination: false
            }
        );
        // The state was derived from the cache: the append fetched at the
        // last item's persisted next offset.
        assert_eq!(repo.last_request(), Some((5, 5)));
    }

    #[tokio::test]
    async fn test_local_items_carry_live_flags() {
        let (session, repo, favorites) = session_with_favorites().await;
        repo.push_ok(envelope(0, 3, 3, 3, &[1, 2, 3]));
        session.load_remote(LoadType::Refresh, 3).await;
        favorites.add(2, EntityType::Character).await.unwrap();

        let local = session.load_local(&LoadParams::refresh(3)).await;
        let LoadResult::Page { mut items, .. } = local else {
            panic!("expected page");
        };
        assert_eq!(settled(&mut items[1].favorite).await, FavoriteStatus::Favorite);
        assert_eq!(settled(&mut items[0].favorite).await, FavoriteStatus::NotFavorite);
    }

    #[tokio::test]
    async fn test_without_favorites_flags_are_frozen() {
        let pool = create_test_pool().await.unwrap();
        let store = PagingStore::new(pool, "recent_characters");
        let repo = Arc::new(FakeRepo::new());
        let session: FeedSession<TestEntity, FakeRepo> =
            FeedSession::new(store, repo.clone(), None, vec![]);

        repo.push_ok(envelope(0, 2, 2, 2, &[1, 2]));
        session.load_remote(LoadType::Refresh, 2).await;

        let local = session.load_local(&LoadParams::refresh(2)).await;
        let LoadResult::Page { mut items, .. } = local else {
            panic!("expected page");
        };
        assert_eq!(items[0].favorite.get(), FavoriteStatus::Unknown);
        assert!(!items[0].favorite.changed().await);
    }

    #[tokio::test]
    async fn test_dropping_session_stops_flag_updates() {
        let (session, repo, favorites) = session_with_favorites().await;
        repo.push_ok(envelope(0, 2, 2, 2, &[1, 2]));
        session.load_remote(LoadType::Refresh, 2).await;

        let local = session.load_local(&LoadParams::refresh(2)).await;
        let LoadResult::Page { mut items, .. } = local else {
            panic!("expected page");
        };
        settled(&mut items[0].favorite).await;

        drop(session);

        favorites.add(1, EntityType::Character).await.unwrap();
        assert!(!timeout(Duration::from_secs(1), items[0].favorite.changed())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_limit_applies_to_local_reads() {
        let (session, repo, _) = session_with_favorites().await;
        let session = session.with_limit(3);
        repo.push_ok(envelope(0, 5, 5, 5, &[1, 2, 3, 4, 5]));
        session.load_remote(LoadType::Refresh, 5).await;

        let local = session.load_local(&LoadParams::refresh(5)).await;
        assert_eq!(page_ids(&local), vec![1, 2, 3]);
    }
}

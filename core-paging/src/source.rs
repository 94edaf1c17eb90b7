//! Paging over a fixed, caller-supplied id list.
//!
//! Used for detail screens that show related entities: the parent record
//! carries the full id list up front, and pages are fetched by slicing that
//! list and asking the remote catalog for exactly those ids. Keys are
//! offsets into the id list, not remote offsets.

use crate::load::{LoadError, LoadParams, LoadResult};
use crate::overlay::{subscribe, FavoriteFlag, OverlaySet};
use crate::repo::CatalogRepository;
use core_store::FavoritesRepository;
use core_types::{CatalogEntity, EntityType, Filter, Sort};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// A list item with its live favorite flag attached.
#[derive(Debug, Clone)]
pub struct FavoritesAware<T> {
    pub info: T,
    pub favorite: FavoriteFlag,
}

/// Pages over `id_list` in order, joining a favorite flag onto each item.
pub struct FixedIdListSource<T, R> {
    id_list: Vec<i64>,
    sort: Option<Sort>,
    repo: Arc<R>,
    favorites: Arc<dyn FavoritesRepository>,
    overlay: Mutex<OverlaySet>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, R> FixedIdListSource<T, R>
where
    T: CatalogEntity,
    R: CatalogRepository<T>,
{
    pub fn new(
        id_list: Vec<i64>,
        sort: Option<Sort>,
        repo: Arc<R>,
        favorites: Arc<dyn FavoritesRepository>,
    ) -> Self {
        Self {
            id_list,
            sort,
            repo,
            favorites,
            overlay: Mutex::new(OverlaySet::new()),
            _marker: std::marker::PhantomData,
        }
    }

    /// Load one page. The key is an offset into the id list; the first load
    /// passes no key and starts at 0.
    #[instrument(skip(self), fields(ids = self.id_list.len()))]
    pub async fn load(&self, params: &LoadParams) -> LoadResult<FavoritesAware<T>> {
        let key = params.key.unwrap_or(0);
        let len = self.id_list.len() as u32;

        let from = key.min(len) as usize;
        let to = key.saturating_add(params.load_size).min(len) as usize;
        let slice = &self.id_list[from..to];
        if slice.is_empty() {
            debug!(key, "Key past the end of the id list");
            return LoadResult::empty_terminal();
        }

        let envelope = match self
            .repo
            .get_items(
                key,
                params.load_size,
                self.sort.as_ref(),
                &[Filter::Id(slice.to_vec())],
            )
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, key, "Fetch for id slice failed");
                return LoadResult::Error(e.into());
            }
        };

        if !envelope.is_ok() {
            warn!(status = %envelope.status_code, "Remote catalog reported an error");
            return LoadResult::Error(LoadError::from_envelope(&envelope));
        }

        // End of the list is reached when this window covered the tail or
        // the service returned nothing for it.
        let next_key = if key.saturating_add(params.load_size) >= len
            || envelope.number_of_page_results == 0
        {
            None
        } else {
            Some(key + envelope.number_of_page_results)
        };
        let prev_key = if key == 0 {
            None
        } else {
            Some(key.saturating_sub(params.load_size))
        };

        let mut overlay = self.overlay.lock().await;
        let items = envelope
            .results
            .into_iter()
            .map(|info| {
                let (favorite, sub) = subscribe(self.favorites.as_ref(), info.id(), T::ENTITY_TYPE);
                overlay.insert(info.id(), T::ENTITY_TYPE, sub);
                FavoritesAware { info, favorite }
            })
            .collect::<Vec<_>>();
        debug!(key, loaded = items.len(), ?next_key, "Loaded id-list page");

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

    /// Drop every live favorite subscription this source holds.
    pub async fn teardown(&self) {
        self.overlay.lock().await.clear();
    }
}

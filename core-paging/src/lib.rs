//! # Catalog Paging Engine
//!
//! Keeps the locally persisted, ordered cache of catalog entities
//! consistent with the paginated remote catalog, and overlays live
//! favorite flags onto list items.
//!
//! ## Components
//!
//! - **Load Types** (`load`): load events, page results, and the classified
//!   error union handed to the consuming list
//! - **Catalog Repository** (`repo`): the trait boundary to the remote
//!   catalog, one implementation per entity kind
//! - **Remote Mediator** (`mediator`): decides when to fetch, maps pages
//!   onto persisted cursor state, and merges them transactionally
//! - **Store Source** (`store_source`): position-ordered windows over the
//!   persisted cache, restartable after invalidation
//! - **Fixed-Id-List Source** (`source`): pages over a caller-supplied id
//!   list with a live favorite flag joined onto every item
//! - **Favorites Overlay** (`overlay`): per-item subscription handles with
//!   a defined cancellation point for off-screen items
//! - **Feed Session** (`session`): owns one list's mediator, source, and
//!   overlay with an explicit creation/teardown boundary

pub mod load;
pub mod mediator;
pub mod overlay;
pub mod repo;
pub mod session;
pub mod source;
pub mod store_source;

#[cfg(test)]
pub(crate) mod testutil;

pub use load::{LoadError, LoadParams, LoadResult, LoadType, MediatorResult, PagingState};
pub use mediator::RemoteMediator;
pub use overlay::{subscribe, FavoriteFlag, FavoriteStatus, FavoriteSubscription, OverlaySet};
pub use repo::CatalogRepository;
pub use session::FeedSession;
pub use source::{FavoritesAware, FixedIdListSource};
pub use store_source::StorePagingSource;

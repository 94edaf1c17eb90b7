//! Live favorite flags joined onto list items.
//!
//! Each visible item gets a [`FavoriteFlag`] fed by a background forwarder
//! task that follows the favorites stream for the item's key. Dropping the
//! paired [`FavoriteSubscription`] aborts the forwarder, which is the
//! defined cancellation point for items scrolled out of the kept window.

use core_store::FavoritesRepository;
use core_types::{EntityType, FavoriteFetchResult};
use futures::StreamExt;
use std::collections::HashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Current favorite flag for one item.
///
/// `Unknown` covers both "not yet resolved" and "lookup failed"; a failed
/// favorite lookup degrades the flag, it never fails the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteStatus {
    Unknown,
    Favorite,
    NotFavorite,
}

impl From<FavoriteFetchResult> for FavoriteStatus {
    fn from(result: FavoriteFetchResult) -> Self {
        match result {
            FavoriteFetchResult::Success { is_favorite: true } => FavoriteStatus::Favorite,
            FavoriteFetchResult::Success { is_favorite: false } => FavoriteStatus::NotFavorite,
            FavoriteFetchResult::Failed(_) => FavoriteStatus::Unknown,
        }
    }
}

/// Read side of one item's live favorite flag.
#[derive(Debug, Clone)]
pub struct FavoriteFlag {
    rx: watch::Receiver<FavoriteStatus>,
}

impl FavoriteFlag {
    /// A flag frozen at `status`, with no subscription behind it. Used for
    /// lists that carry no favorites overlay.
    pub fn frozen(status: FavoriteStatus) -> Self {
        let (_, rx) = watch::channel(status);
        Self { rx }
    }

    pub fn get(&self) -> FavoriteStatus {
        *self.rx.borrow()
    }

    /// Wait for the next flag change. Returns `false` once the subscription
    /// behind this flag has ended.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Handle to one item's forwarder task; dropping it stops the updates.
#[derive(Debug)]
pub struct FavoriteSubscription {
    task: JoinHandle<()>,
}

impl Drop for FavoriteSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start following the favorite flag for one `(entity id, entity type)` key.
///
/// The flag starts as `Unknown` and settles once the stream yields the
/// current persisted state. Must be called from within a tokio runtime.
pub fn subscribe(
    favorites: &dyn FavoritesRepository,
    entity_id: i64,
    entity_type: EntityType,
) -> (FavoriteFlag, FavoriteSubscription) {
    let (tx, rx) = watch::channel(FavoriteStatus::Unknown);
    let mut stream = favorites.observe(entity_id, entity_type);

    let task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            if tx.send(FavoriteStatus::from(result)).is_err() {
                // No flag holder left.
                break;
            }
        }
    });

    (FavoriteFlag { rx }, FavoriteSubscription { task })
}

/// The set of live subscriptions one list currently holds, keyed by item.
///
/// The owning source inserts a subscription per emitted item and prunes to
/// the visible window as the consumer scrolls; teardown drops the rest.
#[derive(Debug, Default)]
pub struct OverlaySet {
    subscriptions: HashMap<(i64, EntityType), FavoriteSubscription>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a subscription for the key, replacing (and thereby aborting)
    /// any previous one for the same key.
    pub fn insert(&mut self, entity_id: i64, entity_type: EntityType, sub: FavoriteSubscription) {
        self.subscriptions.insert((entity_id, entity_type), sub);
    }

    pub fn contains(&self, entity_id: i64, entity_type: EntityType) -> bool {
        self.subscriptions.contains_key(&(entity_id, entity_type))
    }

    /// Drop every subscription whose key is not in `visible`.
    pub fn retain_visible(&mut self, visible: &[(i64, EntityType)]) {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|key, _| visible.contains(key));
        let dropped = before - self.subscriptions.len();
        if dropped > 0 {
            debug!(dropped, kept = self.subscriptions.len(), "Pruned favorite subscriptions");
        }
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

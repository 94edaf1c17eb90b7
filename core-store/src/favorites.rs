//! Persisted favorite flags with live per-key observation.
//!
//! Mutations are broadcast on a `tokio::sync::broadcast` channel; every
//! `observe` stream yields the current flag first and then follows changes
//! for its `(entity id, entity type)` key. The paging core only consumes
//! `observe` — it never writes favorite state.

use async_trait::async_trait;
use core_types::{CatalogError, CatalogResult, EntityType, FavoriteChange, FavoriteFetchResult};
use futures::stream::{self, BoxStream};
use sqlx::{Pool, Sqlite};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

/// Live favorite-flag lookup, independent of paging.
///
/// Multiple simultaneous subscriptions for the same key are allowed and
/// independent. A failed observation degrades one item's flag to unknown;
/// it never fails a page load.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Current flag for the key.
    async fn is_favorite(&self, entity_id: i64, entity_type: EntityType) -> CatalogResult<bool>;

    /// Live stream for the key: current flag first, then every change.
    fn observe(
        &self,
        entity_id: i64,
        entity_type: EntityType,
    ) -> BoxStream<'static, FavoriteFetchResult>;
}

/// SQLite-backed favorites with broadcast change notification.
pub struct SqliteFavoritesRepository {
    pool: Pool<Sqlite>,
    events: broadcast::Sender<FavoriteChange>,
}

impl SqliteFavoritesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self { pool, events }
    }

    /// Mark the key as a favorite. Idempotent.
    #[instrument(skip(self))]
    pub async fn add(&self, entity_id: i64, entity_type: EntityType) -> CatalogResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO favorites (entity_id, entity_type, added_at)
             VALUES (?, ?, ?)",
        )
        .bind(entity_id)
        .bind(entity_type.as_str())
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Io(e.to_string()))?;

        self.notify(entity_id, entity_type, true);
        Ok(())
    }

    /// Remove the key from favorites. Idempotent.
    #[instrument(skip(self))]
    pub async fn remove(&self, entity_id: i64, entity_type: EntityType) -> CatalogResult<()> {
        sqlx::query("DELETE FROM favorites WHERE entity_id = ? AND entity_type = ?")
            .bind(entity_id)
            .bind(entity_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Io(e.to_string()))?;

        self.notify(entity_id, entity_type, false);
        Ok(())
    }

    fn notify(&self, entity_id: i64, entity_type: EntityType, is_favorite: bool) {
        // Send fails only when no observer is subscribed, which is fine.
        let _ = self.events.send(FavoriteChange {
            entity_id,
            entity_type,
            is_favorite,
        });
        debug!(entity_id, %entity_type, is_favorite, "Favorite flag changed");
    }
}

async fn query_flag(
    pool: &Pool<Sqlite>,
    entity_id: i64,
    entity_type: EntityType,
) -> FavoriteFetchResult {
    let result = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM favorites WHERE entity_id = ? AND entity_type = ?",
    )
    .bind(entity_id)
    .bind(entity_type.as_str())
    .fetch_one(pool)
    .await;

    match result {
        Ok(count) => FavoriteFetchResult::Success {
            is_favorite: count > 0,
        },
        Err(e) => FavoriteFetchResult::Failed(CatalogError::Io(e.to_string())),
    }
}

struct ObserveState {
    pool: Pool<Sqlite>,
    receiver: broadcast::Receiver<FavoriteChange>,
    emitted_initial: bool,
}

#[async_trait]
impl FavoritesRepository for SqliteFavoritesRepository {
    async fn is_favorite(&self, entity_id: i64, entity_type: EntityType) -> CatalogResult<bool> {
        match query_flag(&self.pool, entity_id, entity_type).await {
            FavoriteFetchResult::Success { is_favorite } => Ok(is_favorite),
            FavoriteFetchResult::Failed(e) => Err(e),
        }
    }

    fn observe(
        &self,
        entity_id: i64,
        entity_type: EntityType,
    ) -> BoxStream<'static, FavoriteFetchResult> {
        let state = ObserveState {
            pool: self.pool.clone(),
            receiver: self.events.subscribe(),
            emitted_initial: false,
        };

        Box::pin(stream::unfold(state, move |mut state| async move {
            if !state.emitted_initial {
                state.emitted_initial = true;
                let result = query_flag(&state.pool, entity_id, entity_type).await;
                return Some((result, state));
            }

            loop {
                match state.receiver.recv().await {
                    Ok(change)
                        if change.entity_id == entity_id
                            && change.entity_type == entity_type =>
                    {
                        return Some((
                            FavoriteFetchResult::Success {
                                is_favorite: change.is_favorite,
                            },
                            state,
                        ));
                    }
                    // Change for a different key.
                    Ok(_) => continue,
                    // Missed events; re-read current state instead.
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        let result = query_flag(&state.pool, entity_id, entity_type).await;
                        return Some((result, state));
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }))
    }
}

//! # Local Catalog Cache Store
//!
//! SQLite persistence for the catalog paging core.
//!
//! ## Components
//!
//! - **Connection Pool** (`db`): pool construction with WAL mode, pragmas,
//!   idempotent schema application, and a health check
//! - **Paging Cache Store** (`paging_store`): per-feed tables of ordered
//!   display items plus remote cursor state, written transactionally
//! - **Favorites Repository** (`favorites`): persisted favorite flags with
//!   live per-key observation streams
//!
//! The store is the only mutual-exclusion boundary of the system: `save` is
//! one SQLite transaction, so a reader never observes cursors without their
//! items or vice versa.

pub mod db;
pub mod favorites;
pub mod paging_store;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use favorites::{FavoritesRepository, SqliteFavoritesRepository};
pub use paging_store::{CacheItem, PagingStore, RemoteCursor};

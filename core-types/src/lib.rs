//! # Shared Catalog Types
//!
//! Value types shared by every crate in the workspace: the result/error
//! taxonomy, remote status codes, the response envelope, entity payloads,
//! filters/sorts, and the favorites value types.
//!
//! This crate performs no I/O. Everything here is either received from the
//! remote catalog, persisted by `core-store`, or passed between the paging
//! components in `core-paging`.

pub mod entities;
pub mod envelope;
pub mod favorites;
pub mod filter;
pub mod result;
pub mod status;

pub use entities::{
    CatalogEntity, CharacterInfo, ConceptInfo, EntityType, ImageInfo, IssueInfo, MovieInfo,
    NameRef, StoryArcInfo, VolumeInfo,
};
pub use envelope::Envelope;
pub use favorites::{FavoriteChange, FavoriteFetchResult};
pub use filter::{Filter, Sort, SortDirection, SortField};
pub use result::{ApiKeyError, CatalogError, CatalogResult};
pub use status::StatusCode;

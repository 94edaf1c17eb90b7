//! Trait boundary to the remote catalog.

use async_trait::async_trait;
use core_types::{CatalogEntity, CatalogResult, Envelope, Filter, Sort};

/// Remote catalog access for one entity kind.
///
/// The engine treats implementations as opaque: transport, authentication,
/// and credential storage live behind this boundary. Failures surface as
/// raw `CatalogError`s; a non-OK envelope is returned as a *success* here
/// and classified by the paging layer, because only the envelope carries
/// the service's own status code and message.
#[async_trait]
pub trait CatalogRepository<T: CatalogEntity>: Send + Sync {
    /// Fetch one page: `offset`/`limit` select the window, `sort` and
    /// `filters` shape the result set.
    async fn get_items(
        &self,
        offset: u32,
        limit: u32,
        sort: Option<&Sort>,
        filters: &[Filter],
    ) -> CatalogResult<Envelope<T>>;
}

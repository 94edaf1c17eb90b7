//! Value types for the favorites overlay.

use crate::entities::EntityType;
use crate::result::CatalogError;
use serde::{Deserialize, Serialize};

/// One observation of a favorite flag for an `(entity id, entity type)` key.
///
/// A failed observation degrades a single item's flag; it never fails the
/// page the item belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteFetchResult {
    Success { is_favorite: bool },
    Failed(CatalogError),
}

impl FavoriteFetchResult {
    pub fn is_favorite(&self) -> Option<bool> {
        match self {
            FavoriteFetchResult::Success { is_favorite } => Some(*is_favorite),
            FavoriteFetchResult::Failed(_) => None,
        }
    }
}

/// A favorite flag mutation, broadcast to live observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteChange {
    pub entity_id: i64,
    pub entity_type: EntityType,
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_exposes_flag() {
        let result = FavoriteFetchResult::Success { is_favorite: true };
        assert_eq!(result.is_favorite(), Some(true));
    }

    #[test]
    fn test_failure_has_no_flag() {
        let result = FavoriteFetchResult::Failed(CatalogError::Io("disk".to_string()));
        assert_eq!(result.is_favorite(), None);
    }
}

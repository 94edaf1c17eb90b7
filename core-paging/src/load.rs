//! Load events, page results, and the classified error union.
//!
//! These types form the boundary with the paging primitive that drives the
//! engine: it supplies a load type, key, and requested size, and receives
//! back a page of items with continuation keys or a single terminal error.

use core_types::{ApiKeyError, CatalogError, Envelope, StatusCode};
use thiserror::Error;

/// The three load events a paginated list can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    /// Fresh forward load from the start, discarding cached state.
    Refresh,
    /// Load the window before the first visible item.
    Prepend,
    /// Load the window after the last visible item.
    Append,
}

/// One load request from the consuming list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    pub load_type: LoadType,
    /// Continuation key from a previous page; `None` on the first load.
    pub key: Option<u32>,
    pub load_size: u32,
}

impl LoadParams {
    pub fn refresh(load_size: u32) -> Self {
        Self {
            load_type: LoadType::Refresh,
            key: None,
            load_size,
        }
    }

    pub fn prepend(key: u32, load_size: u32) -> Self {
        Self {
            load_type: LoadType::Prepend,
            key: Some(key),
            load_size,
        }
    }

    pub fn append(key: u32, load_size: u32) -> Self {
        Self {
            load_type: LoadType::Append,
            key: Some(key),
            load_size,
        }
    }
}

/// What the consuming list knows when it asks the mediator to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingState {
    /// Id of the first currently visible item, if any.
    pub first_item_id: Option<i64>,
    /// Id of the last currently visible item, if any.
    pub last_item_id: Option<i64>,
    /// Items to request per remote page.
    pub page_size: u32,
}

/// Classified, caller-visible load failure.
///
/// Classification is total: every repository or store failure maps onto
/// exactly one kind, and a non-OK envelope carries its own status code and
/// message through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("service error {status_code}: {error_message}")]
    Service {
        status_code: StatusCode,
        error_message: String,
    },

    #[error("API key error: {0}")]
    ApiKey(ApiKeyError),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("storage error: {0}")]
    Io(String),
}

impl LoadError {
    /// Classify a non-OK envelope into a service error carrying the
    /// envelope's own status and message.
    pub fn from_envelope<T>(envelope: &Envelope<T>) -> Self {
        LoadError::Service {
            status_code: envelope.status_code,
            error_message: envelope.error.clone(),
        }
    }
}

impl From<CatalogError> for LoadError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Io(message) => LoadError::Io(message),
            CatalogError::NetworkError(message) => LoadError::NetworkError(message),
            CatalogError::ApiKeyError(cause) => LoadError::ApiKey(cause),
            CatalogError::Service {
                status_code,
                error_message,
            } => LoadError::Service {
                status_code,
                error_message,
            },
        }
    }
}

/// One page of items, or a terminal error for this load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    Page {
        items: Vec<T>,
        /// Key for loading the window before this page; `None` at the start.
        prev_key: Option<u32>,
        /// Key for loading the window after this page; `None` at the end.
        next_key: Option<u32>,
    },
    Error(LoadError),
}

impl<T> LoadResult<T> {
    pub fn empty_terminal() -> Self {
        LoadResult::Page {
            items: Vec::new(),
            prev_key: None,
            next_key: None,
        }
    }
}

/// Outcome of one mediator load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediatorResult {
    /// The load completed; `end_of_pagination` means no further data exists
    /// in the loaded direction.
    Success { end_of_pagination: bool },
    /// Terminal error for this load; retry is caller-initiated and replays
    /// the same load type.
    Error(LoadError),
}

//! Result and error taxonomy shared by every repository and paging component.
//!
//! The taxonomy is deliberately small: every remote or local outcome is one
//! of four kinds. Components propagate these unchanged — nothing re-wraps an
//! error it cannot add information to.

use crate::status::StatusCode;
use thiserror::Error;

/// Why an API key could not be used for a remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyError {
    /// No credential has been configured on this device.
    #[error("no API key configured")]
    NoApiKey,

    /// A credential exists but the remote service rejected it.
    #[error("API key rejected by the service")]
    Rejected,

    /// The credential store itself failed.
    #[error("failed to read API key: {0}")]
    Storage(String),
}

/// Failure of a catalog or favorites operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Local storage raised an I/O fault.
    #[error("storage error: {0}")]
    Io(String),

    /// Transport unreachable, timed out, or otherwise failed before a
    /// response envelope was produced.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The remote call could not be attempted or authenticated.
    #[error("API key error: {0}")]
    ApiKeyError(#[from] ApiKeyError),

    /// The remote catalog answered with a non-OK status.
    #[error("service error {status_code}: {error_message}")]
    Service {
        status_code: StatusCode,
        error_message: String,
    },
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display_carries_code_and_message() {
        let err = CatalogError::Service {
            status_code: StatusCode::InvalidApiKey,
            error_message: "Invalid API Key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "service error 100 (invalid API key): Invalid API Key"
        );
    }

    #[test]
    fn test_api_key_error_converts_into_catalog_error() {
        let err: CatalogError = ApiKeyError::NoApiKey.into();
        assert_eq!(err, CatalogError::ApiKeyError(ApiKeyError::NoApiKey));
    }
}

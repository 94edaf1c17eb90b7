//! # Configuration Module
//!
//! Settings for the catalog paging core, validated fail-fast before any
//! component is constructed.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::new("catalog.db")
//!     .page_size(50)
//!     .details_page_size(20);
//! config.validate().expect("invalid configuration");
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Hard cap the remote catalog places on a single page request.
pub const MAX_REMOTE_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Settings for the local SQLite database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file path, or `:memory:` for tests.
    pub path: PathBuf,

    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Page sizing for the two kinds of paged lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Items fetched per remote page for feed lists (recent/favorites).
    pub page_size: u32,

    /// Items fetched per remote query for fixed-id-list detail sources.
    pub details_page_size: u32,

    /// How many items the consuming list keeps favorite subscriptions for.
    pub visible_window: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            details_page_size: 20,
            visible_window: 100,
        }
    }
}

impl PagingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("paging.page_size", self.page_size),
            ("paging.details_page_size", self.details_page_size),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            if value > MAX_REMOTE_PAGE_SIZE {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must not exceed the remote cap of {MAX_REMOTE_PAGE_SIZE}"),
                });
            }
        }
        Ok(())
    }
}

/// Top-level configuration for the catalog paging core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub database: DatabaseSettings,
    pub paging: PagingConfig,
}

impl CoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseSettings::new(database_path),
            paging: PagingConfig::default(),
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.paging.page_size = page_size;
        self
    }

    pub fn details_page_size(mut self, details_page_size: u32) -> Self {
        self.paging.details_page_size = details_page_size;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.database.max_connections = max;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.paging.validate()?;
        Ok(())
    }
}

//! # Runtime Infrastructure
//!
//! Ambient services shared by the catalog paging crates: structured logging
//! bootstrap and the typed configuration layer.
//!
//! ## Components
//!
//! - **Configuration** (`config`): builder-validated settings for the local
//!   database and page sizes
//! - **Logging** (`logging`): `tracing-subscriber` setup with env-filter and
//!   pretty/compact/JSON output formats

pub mod config;
pub mod logging;

pub use config::{ConfigError, CoreConfig, DatabaseSettings, PagingConfig};
pub use logging::{init_logging, LogFormat, LoggingConfig};

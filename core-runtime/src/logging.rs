//! # Logging & Tracing Infrastructure
//!
//! Configures the `tracing-subscriber` stack for the catalog paging core:
//! env-filter based module filtering plus pretty, compact, or JSON output.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default().with_format(LogFormat::Compact);
//! init_logging(config).expect("failed to initialize logging");
//! tracing::info!("core started");
//! ```

use thiserror::Error;
use tracing_subscriber::{
    filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid filter directive: {0}")]
    InvalidFilter(String),

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    Pretty,
    /// Compact single-line format.
    Compact,
    /// Structured JSON format for machine parsing.
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,

    /// Filter directive in `EnvFilter` syntax, used when `RUST_LOG` is
    /// not set (e.g. `"info,core_paging=debug"`).
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; falls back to the configured default
/// filter otherwise. Returns an error if a subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.default_filter)
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
    })?;

    let fmt_layer = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(())
}

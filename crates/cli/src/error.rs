//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file given with `--config` does not exist.
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The request file could not be parsed as a report request.
    #[error("invalid request file {path}: {message}")]
    InvalidRequest { path: PathBuf, message: String },

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred talking to the reporting service.
    #[error(transparent)]
    Service(#[from] jsreport::Error),

    /// An error occurred in the MCP server.
    #[error(transparent)]
    Mcp(#[from] mcp::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<jsreport::ValidationError> for Error {
    fn from(err: jsreport::ValidationError) -> Self {
        Self::Service(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

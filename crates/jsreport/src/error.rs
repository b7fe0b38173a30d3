//! Error types for report building and reporting-service calls.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Maximum number of characters of an upstream response body kept in errors.
pub const BODY_EXCERPT_LEN: usize = 500;

/// Errors from building a report or talking to the reporting service.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request was rejected before any network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service answered with a non-2xx status.
    #[error("reporting service returned HTTP {status}: {body_excerpt}")]
    Upstream { status: u16, body_excerpt: String },

    /// The service could not be reached (connect, DNS, timeout).
    #[error("could not reach reporting service: {cause}")]
    Transport { cause: String },

    /// The named template does not exist on the service.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The service answered 2xx but the body could not be decoded.
    #[error("invalid response from reporting service: {0}")]
    InvalidResponse(String),

    /// The client configuration is unusable.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Stable tag for this error, used in tool results.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status reported by the service, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn upstream(status: u16, body: &str) -> Self {
        Self::Upstream {
            status,
            body_excerpt: excerpt(body),
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Upstream,
    Transport,
    NotFound,
    InvalidResponse,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Validation => "validation",
            Self::Upstream => "upstream",
            Self::Transport => "transport",
            Self::NotFound => "not_found",
            Self::InvalidResponse => "invalid_response",
            Self::Config => "config",
        };
        f.write_str(tag)
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

/// Every problem found in a request, collected in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid report request: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Names of the violated fields, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Returns `Err(self)` if any violation was recorded.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Truncates a response body on a char boundary.
fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

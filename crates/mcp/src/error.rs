//! Tool server error types.

use thiserror::Error;

use crate::protocol::ToolFailure;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to initialize MCP session: {0}")]
    Initialize(String),

    #[error("MCP server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<&jsreport::Error> for ToolFailure {
    fn from(err: &jsreport::Error) -> Self {
        let (details, violations) = match err {
            jsreport::Error::Upstream { body_excerpt, .. } if !body_excerpt.is_empty() => {
                (Some(body_excerpt.clone()), Vec::new())
            }
            jsreport::Error::Validation(v) => (None, v.violations.clone()),
            _ => (None, Vec::new()),
        };

        Self {
            success: false,
            error_kind: err.kind(),
            error: err.to_string(),
            status_code: err.status_code(),
            details,
            violations,
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("{0} environment variable missing")]
    MissingEnv(&'static str),

    #[error("unsupported handler type: {0}")]
    UnsupportedHandler(String),

    /// Boolean env values surface the parser's own message.
    #[error(transparent)]
    InvalidFlag(#[from] std::str::ParseBoolError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected approval status '{0}'")]
    UnexpectedStatus(String),

    #[error("failed to send event: {method} {url}: HTTP/{code} {reason}")]
    Http {
        method: String,
        url: String,
        code: u16,
        reason: String,
        body: String,
    },

    #[error("failed to write to {}: {source}", path.display())]
    StatusWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl From<url::ParseError> for ApprovalError {
    fn from(e: url::ParseError) -> Self {
        ApprovalError::InvalidUrl(e.to_string())
    }
}

pub type Result<T, E = ApprovalError> = std::result::Result<T, E>;

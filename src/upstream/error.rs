//! Upstream failure taxonomy.

use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur while calling the upstream transit API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, reset, TLS failure.
    #[error("upstream transport error calling {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connect or total timeout elapsed.
    #[error("upstream request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered 404.
    #[error("upstream resource not found: {url}")]
    NotFound { url: String },

    /// Upstream answered any other status >= 400.
    #[error("upstream returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Body is not JSON, or not the expected shape.
    #[error("invalid payload from upstream {url}: {reason}")]
    InvalidPayload { url: String, reason: String },

    /// The pool has been released by [`UpstreamClient::shutdown`].
    ///
    /// [`UpstreamClient::shutdown`]: crate::upstream::UpstreamClient::shutdown
    #[error("upstream client is shut down")]
    Closed,

    /// The client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Build(String),
}

impl UpstreamError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::NotFound { .. } => "not_found",
            UpstreamError::Status { .. } => "status",
            UpstreamError::InvalidPayload { .. } => "invalid_payload",
            UpstreamError::Closed => "closed",
            UpstreamError::Build(_) => "build",
        }
    }

    /// Message including every underlying cause, for diagnostics.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !detail.contains(&text) {
                detail.push_str(": ");
                detail.push_str(&text);
            }
            source = cause.source();
        }
        detail
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

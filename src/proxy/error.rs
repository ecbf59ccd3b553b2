//! Dispatch failure signal.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::ParamError;
use crate::upstream::UpstreamError;

/// Everything a dispatch can fail with.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected before any upstream call.
    #[error(transparent)]
    InvalidParams(#[from] ParamError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl DispatchError {
    /// HTTP status presented to the inbound caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            DispatchError::Upstream(UpstreamError::NotFound { .. }) => StatusCode::NOT_FOUND,
            DispatchError::Upstream(UpstreamError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            DispatchError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Human-readable message including the underlying cause.
    pub fn detail(&self) -> String {
        match self {
            DispatchError::InvalidParams(e) => e.to_string(),
            DispatchError::Upstream(e) => e.detail(),
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                DispatchError::from(ParamError::Missing("orgId")),
                StatusCode::BAD_REQUEST,
            ),
            (
                DispatchError::from(UpstreamError::NotFound { url: "u".into() }),
                StatusCode::NOT_FOUND,
            ),
            (
                DispatchError::from(UpstreamError::Status {
                    url: "u".into(),
                    status: 500,
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DispatchError::from(UpstreamError::InvalidPayload {
                    url: "u".into(),
                    reason: "r".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DispatchError::from(UpstreamError::Closed),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err);
        }
    }
}

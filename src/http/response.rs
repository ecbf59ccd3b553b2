//! Response shaping.
//!
//! # Responsibilities
//! - Mark successful proxy responses as non-cacheable
//! - Map dispatch failures to status codes with a structured JSON body
//! - Map page failures to plain-text responses
//!
//! # Design Decisions
//! - Error bodies carry the underlying cause for diagnostics
//! - No partial data: a failure replaces the whole body

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::proxy::DispatchError;
use crate::render::RenderError;

/// JSON body sent with `Cache-Control: no-store`.
#[derive(Debug)]
pub struct NoStore<T>(pub T);

impl<T: Serialize> IntoResponse for NoStore<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.0).into_response();
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

/// Structured error body consumed by client-side code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub detail: String,
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            status: status.as_u16(),
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure while serving an HTML page.
#[derive(Debug)]
pub enum PageError {
    Dispatch(DispatchError),
    Render(RenderError),
}

impl From<DispatchError> for PageError {
    fn from(e: DispatchError) -> Self {
        PageError::Dispatch(e)
    }
}

impl From<RenderError> for PageError {
    fn from(e: RenderError) -> Self {
        PageError::Render(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Dispatch(e) => (e.status_code(), e.detail()).into_response(),
            PageError::Render(e) => {
                tracing::error!(error = %e, "Failed to render page");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to render page",
                )
                    .into_response()
            }
        }
    }
}

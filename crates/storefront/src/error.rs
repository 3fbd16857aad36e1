//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type that logs the failure before responding
//! to the client. Internal failures are also captured to Sentry. Route handlers
//! return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use thiserror::Error;
use tokio::task::JoinError;

use crate::page::PageId;
use crate::view::ViewError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The page was never loaded or has expired.
    #[error("Cart page not found: {0}")]
    PageNotFound(PageId),

    /// A row interaction failed.
    #[error("Cart view error: {0}")]
    View(#[from] ViewError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JoinError> for AppError {
    fn from(err: JoinError) -> Self {
        Self::Internal(format!("storage task failed: {err}"))
    }
}

/// HTMX response header asking the browser for a full page reload.
pub const HX_REFRESH: &str = "HX-Refresh";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request failed"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let status = match &self {
            Self::PageNotFound(_) | Self::View(ViewError::UnknownRow(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::PageNotFound(_) => "This cart page has expired, please reload".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        // HTMX ignores error bodies; a stale page reloads instead of showing
        // an edited input next to an old total.
        if matches!(self, Self::PageNotFound(_) | Self::View(_)) {
            return (status, AppendHeaders([(HX_REFRESH, "true")]), message).into_response();
        }

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Server error type.
//!
//! Every error renders as `{"error": "..."}` with a matching status code.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use o24_store::{StoreError, StoreErrorKind};
use serde_json::json;

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("A document with slug \"{0}\" already exists")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Document store error: {0}")]
    Store(StoreError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) | Self::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        let slug = err.slug.clone().unwrap_or_default();
        match err.kind {
            StoreErrorKind::NotFound => Self::DocumentNotFound(slug),
            StoreErrorKind::AlreadyExists => Self::Conflict(slug),
            StoreErrorKind::InvalidInput => Self::BadRequest(err.to_string()),
            _ => Self::Store(err),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if let Self::Store(e) = &self {
            tracing::error!(error = %e, "Document store request failed");
            "Failed to access document store".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. JSON route handlers return
//! `Result<T, AppError>`; every error body is `{ "message": ... }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use nextshop_core::ProductError;

use crate::db::StoreError;
use crate::uploads::UploadError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product input failed validation.
    #[error("{0}")]
    Validation(#[from] ProductError),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit.
    #[error("Request body is too large")]
    PayloadTooLarge,

    /// Request body encoding is not accepted.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Store operation failed. `context` is the client-facing message.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Writing an uploaded file failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

impl AppError {
    /// Wrap a store error with the message the client should see.
    #[must_use]
    pub const fn store(context: &'static str, source: StoreError) -> Self {
        Self::Store { context, source }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Store { .. } | Self::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Store { context, .. } => (*context).to_string(),
            Self::Upload(_) => "Failed to store image".to_string(),
            _ => self.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Rejected request");
        }

        let body = ErrorBody {
            message: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

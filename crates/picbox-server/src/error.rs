//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce the service's wire
//! contract for failures: a JSON body `{"code": <status>, "msg": "..."}`
//! mirroring the HTTP status. The one exception is [`ApiError::LoginRequired`],
//! which renders a 302 redirect to `/login` -- routes gated on an
//! authenticated session redirect rather than deny.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use picbox_storage::StorageError;

use crate::blob::BlobError;

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required form or multipart fields are missing or blank (403).
    #[error("missing fields: {0}")]
    MissingFields(String),

    /// A uniqueness constraint would be violated (403).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The session is in the wrong state for this operation: already logged
    /// in, unknown account, or bad password (403).
    #[error("auth error: {0}")]
    AuthState(String),

    /// Authenticated, but not the owner of the target resource (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The route requires an authenticated session (302 to `/login`).
    #[error("authentication required")]
    LoginRequired,

    /// Storage or blob I/O failure (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_)
            | ApiError::Conflict(_)
            | ApiError::AuthState(_)
            | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::LoginRequired => StatusCode::FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = axum::Json(serde_json::json!({
            "code": status.as_u16(),
            "msg": self.to_string(),
        }));
        if let ApiError::LoginRequired = self {
            return (status, [(header::LOCATION, "/login")], body).into_response();
        }
        (status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::PersonNotFound(_)
            | StorageError::AlbumNotFound(_)
            | StorageError::PictureNotFound(_) => ApiError::NotFound(err.to_string()),
            StorageError::NameTaken { .. }
            | StorageError::DuplicateAlbumName { .. }
            | StorageError::DuplicatePictureName { .. } => ApiError::Conflict(err.to_string()),
            StorageError::Database(_) | StorageError::Migration(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<BlobError> for ApiError {
    fn from(err: BlobError) -> Self {
        match &err {
            // An undecodable payload is a client problem, like a missing field.
            BlobError::NotAnImage => ApiError::MissingFields(err.to_string()),
            BlobError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

//! Error types.
//!
//! [`StoreError`] is what the storage collaborators report. [`CatalogError`]
//! is the taxonomy surfaced by the search and favorites components and, via
//! [`IntoResponse`], by the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rusqlite::ErrorCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Storage service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid continuation token")]
    InvalidContinuationToken,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
                StoreError::DuplicateKey(err.to_string())
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::ResourceNotFound(err.to_string()),
            _ => StoreError::ServiceUnavailable(err.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ResourceNotFound(what) => CatalogError::NotFound(what),
            StoreError::ServiceUnavailable(reason) => CatalogError::StorageUnavailable(reason),
            StoreError::DuplicateKey(key) => CatalogError::Conflict(key),
            StoreError::InvalidContinuationToken => {
                CatalogError::InvalidArgument("malformed continuation token".to_string())
            }
        }
    }
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

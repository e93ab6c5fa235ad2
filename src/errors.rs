use axum::{http::StatusCode, Json};
use serde::Serialize;
use thiserror::Error;

/// Failure talking to the remote contents store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Status { status, .. } if *status == StatusCode::CONFLICT)
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn misconfigured() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured")
    }

    /// Wraps a failed remote call. Remote statuses are passed through to the
    /// caller; transport and decode failures become an unexpected error.
    pub fn upstream(message: impl Into<String>, err: StoreError) -> Self {
        match err {
            StoreError::Status { status, body } => Self {
                status,
                error: message.into(),
                detail: Some(body),
            },
            other => Self::unexpected(other),
        }
    }

    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Unexpected error".to_string(),
            detail: Some(err.to_string()),
        }
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
            detail: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            error: &self.error,
            detail: self.detail.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

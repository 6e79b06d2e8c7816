//! Error responses for the JSON API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::contact::{RelayError, ValidationError};
use crate::vault::FetchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound { path: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Sorry, your message could not be sent. Please email {fallback} directly.")]
    Relay {
        fallback: String,
        #[source]
        source: RelayError,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Fetch(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Fetch(FetchError::InvalidPath { .. }) => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Relay { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Vault path the error is about, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            AppError::NotFound { path } => Some(path.as_str()),
            AppError::Fetch(FetchError::NotFound(path)) => Some(path.as_str()),
            AppError::Fetch(FetchError::InvalidPath { path, .. }) => Some(path.as_str()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.to_string(),
            "path": self.path(),
        });
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

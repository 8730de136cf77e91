//! # Centralized Error Handling
//!
//! This module provides a unified error handling system for the application.
//! It centralizes error logging and HTTP response generation, eliminating
//! repetitive error handling patterns throughout the codebase.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::repository::StoreError;

/// Central application error type that encompasses all possible error conditions.
///
/// This enum provides a unified way to handle errors across the application,
/// with automatic conversion to appropriate HTTP responses. _Db errors are logged
/// automatically, while other errors should be logged at the point of creation if needed._
#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error")]
    Db(#[source] sqlx::Error),

    #[error("invalid request payload")]
    Validation(#[from] validator::ValidationErrors),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("internal server error")]
    Internal,
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Database(e) => AppError::Db(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Db(e) = &self {
            // Storage details stay in the logs
            error!(?e, "Database error occurred");
        }

        let (status, message) = match self {
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid request payload"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(ErrorBody { message });
        (status, body).into_response()
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;

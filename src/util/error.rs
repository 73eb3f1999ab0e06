use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

use crate::repository::repository_error::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl HandlerErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation => StatusCode::BAD_REQUEST,
            HandlerErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::RateLimited => "RateLimited",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

/// Failure envelope shared by every endpoint: `{"success": false, "message": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

#[derive(Debug)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new<T: Into<String>>(error: HandlerErrorKind, message: T) -> Self {
        HandlerError { error, message: message.into() }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Validation, message)
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::NotFound, message)
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Internal, message)
    }

    /// Map a service failure, replacing storage details with `context` so they never reach
    /// the client.
    pub fn from_service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::Persistence(_) => Self::internal(context),
            other => Self::from(other),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
        });
        (status, body).into_response()
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::validation(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::RateLimited(msg) => Self::new(HandlerErrorKind::RateLimited, msg),
            ServiceError::Persistence(_) => Self::internal("Internal server error"),
        }
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Service-level failure taxonomy. Nothing here is retried by the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    #[error("Persistence Error: {0}")]
    Persistence(String),
}

// Allow conversion from RepositoryError to ServiceError
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Persistence(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::Persistence(msg),
            RepositoryError::ConnectionError(msg) => ServiceError::Persistence(msg),
            RepositoryError::SerializationError(msg) => ServiceError::Persistence(msg),
        }
    }
}

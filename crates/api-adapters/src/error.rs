//! Maps domain failures onto HTTP status codes.
//!
//! Clients match on `code` from `{"code": "POST_NOT_FOUND", "message": "..."}`.
//! Codes never change; messages may be reworded.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::errors::DomainError;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError(pub DomainError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials | DomainError::SessionLocked(_) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::CommentNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.0 {
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::UserNotFound(_) => "USER_NOT_FOUND",
            DomainError::PostNotFound(_) => "POST_NOT_FOUND",
            DomainError::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            DomainError::SessionLocked(_) => "SESSION_LOCKED",
            DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
            DomainError::Unauthorized(_) => "UNAUTHORIZED",
            DomainError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            // don't leak backend details
            DomainError::Storage(ref detail) => {
                tracing::error!(%detail, "request failed on storage");
                "internal storage error".to_string()
            }
            ref other => other.to_string(),
        };
        let body = ErrorBody {
            code: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

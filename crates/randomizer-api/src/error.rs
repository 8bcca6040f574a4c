//! API error handling
//!
//! Every error renders as `{"detail": "..."}` with a flat, stable mapping
//! onto HTTP statuses. Identity and database failures are converted here;
//! anything without a mapping collapses to a 500 so upstream specifics
//! never reach clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use randomizer_db::DbError;
use randomizer_identity::IdentityError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not authenticated")]
    MissingCredentials,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Verify your account")]
    UnconfirmedAccount,

    #[error("The provided code does not match the expected value.")]
    CodeMismatch,

    #[error("The provided code has expired.")]
    ExpiredCode,

    #[error("Access token provided has wrong format")]
    MalformedToken,

    #[error("Invalid access token provided")]
    InvalidToken,

    #[error("Not enough permissions")]
    InsufficientScope,

    #[error("{0}")]
    RateLimited(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::Validation(_)
            | Self::CodeMismatch
            | Self::ExpiredCode
            | Self::MalformedToken => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::InsufficientScope => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::UnconfirmedAccount => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 429 Too Many Requests
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error detail
    pub detail: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Conflict => Self::Conflict("Account with email exists".to_string()),
            IdentityError::NotFound => Self::NotFound("User not found".to_string()),
            IdentityError::Unconfirmed => Self::UnconfirmedAccount,
            IdentityError::InvalidCredentials => Self::InvalidCredentials,
            IdentityError::CodeMismatch => Self::CodeMismatch,
            IdentityError::ExpiredCode => Self::ExpiredCode,
            // Normally intercepted by the verify handler, which answers 200
            IdentityError::AlreadyConfirmed => Self::Conflict("User already verified.".to_string()),
            IdentityError::MalformedToken => Self::MalformedToken,
            IdentityError::InvalidToken | IdentityError::KeyNotFound => Self::InvalidToken,
            IdentityError::RateLimited => Self::RateLimited("Too many requests".to_string()),
            IdentityError::Upstream(detail) => {
                tracing::error!(error = %detail, "Upstream identity provider failure");
                Self::Internal
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => Self::NotFound(msg),
            DbError::Duplicate(_) => Self::Conflict("Account with email exists".to_string()),
            other => {
                tracing::error!(error = ?other, "Database error");
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UnconfirmedAccount.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::CodeMismatch.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InsufficientScope.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::RateLimited("Too many requests".to_string()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_strings() {
        assert_eq!(ApiError::MissingCredentials.to_string(), "Not authenticated");
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Incorrect username or password"
        );
        assert_eq!(ApiError::UnconfirmedAccount.to_string(), "Verify your account");
        assert_eq!(
            ApiError::CodeMismatch.to_string(),
            "The provided code does not match the expected value."
        );
        assert_eq!(ApiError::ExpiredCode.to_string(), "The provided code has expired.");
        assert_eq!(
            ApiError::MalformedToken.to_string(),
            "Access token provided has wrong format"
        );
        assert_eq!(
            ApiError::InvalidToken.to_string(),
            "Invalid access token provided"
        );
        assert_eq!(ApiError::InsufficientScope.to_string(), "Not enough permissions");
    }

    #[test]
    fn test_identity_conversions() {
        let err = ApiError::from(IdentityError::Conflict);
        assert_eq!(err.to_string(), "Account with email exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::from(IdentityError::KeyNotFound);
        assert!(matches!(err, ApiError::InvalidToken));

        // Unmapped upstream details are swallowed
        let err = ApiError::from(IdentityError::Upstream("SomethingOddException".to_string()));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_db_conversions() {
        let err = ApiError::from(DbError::Duplicate("user exists".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::from(DbError::Connection("refused".to_string()));
        assert!(!err.to_string().contains("refused"));
    }
}

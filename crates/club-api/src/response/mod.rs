//! How handlers fail and succeed over HTTP.
//!
//! Failures render as `{ "error": { "code", "message", "field"?, "details"? } }`.
//! 5xx messages are replaced with a fixed string and the cause is logged.
//! Throttled requests carry `Retry-After` when the wait is known.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use club_common::{domain_status, AppError, ErrorBody, ErrorResponse};
use club_core::DomainError;
use club_service::ServiceError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Invalid or expired access token")]
    InvalidToken,
}

impl ApiError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }

    fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            Self::Service(e) => e.as_domain(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Domain(e) => domain_status(e),
            Self::Validation(_) | Self::InvalidPath(_) | Self::InvalidQuery(_) | Self::InvalidBody(_) => 400,
            Self::MissingAuth | Self::InvalidToken => 401,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidPath(_) => "INVALID_PATH_PARAMETER",
            Self::InvalidQuery(_) => "INVALID_QUERY_PARAMETER",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingAuth => "MISSING_AUTHORIZATION",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }

    /// Input field the error refers to; for rule violations the first in name order
    pub fn field(&self) -> Option<String> {
        match self {
            Self::App(e) => e.field().map(str::to_string),
            Self::Service(e) => e.field().map(str::to_string),
            Self::Domain(e) => e.field().map(str::to_string),
            Self::Validation(errors) => errors.field_errors().keys().map(ToString::to_string).min(),
            _ => None,
        }
    }

    fn retry_after_secs(&self) -> Option<u64> {
        match self.domain()? {
            DomainError::ResendCooldown { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    fn body(&self, status: StatusCode) -> ErrorBody {
        let message = if status.is_server_error() {
            tracing::error!(error = ?self, code = self.error_code(), "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let details = match self {
            Self::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };

        ErrorBody {
            error: ErrorResponse {
                code: self.error_code().to_string(),
                message,
                field: self.field(),
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.body(status))).into_response();
        if let Some(secs) = self.retry_after_secs() {
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 201 around any response body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, self.0).into_response()
    }
}

/// 204
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use club_core::Points;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::MissingAuth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::invalid_path("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DomainError::NotEligible {
                required: Points::new(300),
                actual: Points::new(10),
            })
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(DomainError::ResendCooldown { retry_after_secs: 5 }).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_conflict_carries_field() {
        let err = ApiError::from(ServiceError::from(DomainError::EmailTaken));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "EMAIL_TAKEN");
        assert_eq!(err.field().as_deref(), Some("email"));
    }

    #[test]
    fn test_cooldown_sets_retry_after() {
        let err = ApiError::from(ServiceError::from(DomainError::ResendCooldown { retry_after_secs: 42 }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn test_other_errors_have_no_retry_after() {
        let response = ApiError::from(DomainError::TooManyAttempts).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_internal_message_is_opaque() {
        let err = ApiError::from(DomainError::DatabaseError("password=hunter2".to_string()));
        let body = err.body(err.status_code());
        assert_eq!(body.error.message, "Internal server error");
        assert_eq!(body.error.code, "DATABASE_ERROR");
    }

    #[test]
    fn test_created_overrides_status() {
        let response = Created(Json(serde_json::json!({ "id": 1 }))).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::identity::errors::IdentityError;

pub mod current_identity;
pub mod login;
pub mod not_found;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Infrastructure failures are logged in full and reported generically.
impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidIdentifier(_) | IdentityError::InvalidSecret(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            IdentityError::DuplicateIdentity => ApiError::Conflict(err.to_string()),
            IdentityError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            IdentityError::TokenExpired | IdentityError::TokenInvalid => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            IdentityError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Identity store unavailable");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            IdentityError::Integrity(_)
            | IdentityError::Hashing(_)
            | IdentityError::TokenIssuance(_)
            | IdentityError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Unreadable request bodies share the error envelope of every other failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::UnprocessableEntity(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::errors::SecretError;

    #[test]
    fn test_input_errors_are_precise() {
        let err = IdentityError::InvalidSecret(SecretError::TooShort { min: 8, actual: 3 });

        assert_eq!(
            ApiError::from(err),
            ApiError::UnprocessableEntity(
                "Invalid secret: Secret too short: minimum 8 characters, got 3".to_string()
            )
        );
    }

    #[test]
    fn test_infrastructure_errors_are_generic() {
        assert_eq!(
            ApiError::from(IdentityError::StoreUnavailable("pool timed out".to_string())),
            ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
        );
        assert_eq!(
            ApiError::from(IdentityError::Integrity("bad phc".to_string())),
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_duplicate_identity_is_conflict() {
        assert_eq!(
            ApiError::from(IdentityError::DuplicateIdentity),
            ApiError::Conflict("Identity already exists".to_string())
        );
    }
}

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Error body returned by every handler: `{"error": <category>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, error: error.to_string(), message }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AuthError", Some(message.into()))
    }

    fn internal(detail: &str) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError", Some(INTERNAL_MESSAGE.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.error,
            "message": self.message.unwrap_or_default(),
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::validation(m),
            ServiceError::Conflict(m) => Self::new(StatusCode::BAD_REQUEST, "ConflictError", Some(m)),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, "NotFoundError", Some(m)),
            other @ (ServiceError::Storage(_) | ServiceError::Db(_)) => Self::internal(&other.to_string()),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match &e {
            AuthError::Validation(m) => Self::validation(m.clone()),
            AuthError::Conflict => Self::new(StatusCode::BAD_REQUEST, "ConflictError", Some(e.to_string())),
            AuthError::InvalidCredentials => Self::new(StatusCode::UNAUTHORIZED, "InvalidCredentialsError", Some(e.to_string())),
            AuthError::Unauthorized(m) => Self::unauthorized(m.clone()),
            AuthError::Locked => Self::new(StatusCode::FORBIDDEN, "LockedError", Some(e.to_string())),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                error!(code = e.code(), "auth failure");
                Self::internal(&e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<MultipartRejection> for JsonApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::validation(e.body_text())
    }
}

impl From<MultipartError> for JsonApiError {
    fn from(e: MultipartError) -> Self {
        Self::validation(e.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

//! Authentication Errors
//! Mission: One taxonomy for every credential and session outcome

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Where unauthenticated callers are sent.
pub const LOGIN_PATH: &str = "/login";

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not authenticated")]
    Unauthenticated,

    #[error("signup disabled")]
    RegistrationDisabled,

    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),

    #[error("storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Message safe to show to the caller. Never distinguishes a missing
    /// user from a wrong password, and never carries storage detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::DuplicateUsername => "registration failed (username may already exist)",
            AuthError::InvalidCredentials => "invalid username or password",
            AuthError::Unauthenticated => "authentication required",
            AuthError::RegistrationDisabled => "signup disabled",
            AuthError::ValidationFailed(msg) => msg,
            AuthError::StorageError(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                "internal server error"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUsername => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Unauthenticated => StatusCode::FOUND,
            AuthError::RegistrationDisabled => StatusCode::FORBIDDEN,
            AuthError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AuthError::StorageError(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(e: tokio::task::JoinError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

/// HTTP 302 with no body.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Unauthenticated = self {
            return found(LOGIN_PATH);
        }

        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, self.public_message()).into_response()
    }
}

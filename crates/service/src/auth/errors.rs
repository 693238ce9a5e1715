use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors of the auth workflows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired reset token")]
    InvalidResetToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("session storage error: {0}")]
    Session(String),
    #[error("auth service error: {0}")]
    Remote(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::NotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::InvalidResetToken => 1005,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Session(_) => 1200,
            AuthError::Remote(_) => 1300,
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Storage(msg) => AuthError::Session(msg),
            ServiceError::Validation(msg) => AuthError::Validation(msg),
            ServiceError::Unauthorized(_) => AuthError::InvalidCredentials,
            ServiceError::NotFound(_) => AuthError::NotFound,
            other => AuthError::Remote(other.to_string()),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ServiceError::Validation(msg),
            AuthError::NotFound => ServiceError::NotFound(e.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidResetToken | AuthError::TokenError(_) => {
                ServiceError::Unauthorized(e.to_string())
            }
            AuthError::Session(msg) => ServiceError::Storage(msg),
            AuthError::HashError(_) | AuthError::Remote(_) => ServiceError::Transport(e.to_string()),
        }
    }
}

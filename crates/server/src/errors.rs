use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ApiResponse;
use service::auth::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Handler error: a service failure rendered as a failed envelope.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self { Self(ServiceError::Validation(msg.into())) }

    pub fn unauthorized(msg: impl Into<String>) -> Self { Self(ServiceError::Unauthorized(msg.into())) }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ServiceError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message without the variant prefix, e.g. `papel not found`.
    pub fn message(&self) -> String {
        match &self.0 {
            ServiceError::Validation(m)
            | ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Storage(m)
            | ServiceError::Transport(m) => m.clone(),
            ServiceError::Http { message, .. } => message.clone(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self(e) }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self { Self(e.into()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.message();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, Json(ApiResponse::<()>::failure(msg, Vec::new()))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("auth setup failed: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

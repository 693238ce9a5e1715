use async_trait::async_trait;
use serde_json::json;
use service::auth::domain::{AuthSession, LoginInput, PasswordResetConfirm, ResetTicket};
use service::auth::{AuthError, CredentialVerifier};
use service::ServiceError;
use tracing::instrument;

use crate::api::ApiClient;

/// [`CredentialVerifier`] backed by the `/auth` endpoints.
#[derive(Clone)]
pub struct RemoteCredentials {
    api: ApiClient,
}

impl RemoteCredentials {
    pub fn new(api: ApiClient) -> Self { Self { api } }
}

/// Map an API failure onto the auth taxonomy; `rejected` stands for a 401.
fn auth_error(e: ServiceError, rejected: AuthError) -> AuthError {
    match e {
        ServiceError::Http { status: 401, .. } => rejected,
        ServiceError::Http { status: 404, .. } => AuthError::NotFound,
        ServiceError::Http { status: 400, message } => AuthError::Validation(message),
        other => AuthError::Remote(other.to_string()),
    }
}

#[async_trait]
impl CredentialVerifier for RemoteCredentials {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn verify(&self, input: &LoginInput) -> Result<AuthSession, AuthError> {
        self.api
            .post("/auth/login", input)
            .await
            .map_err(|e| auth_error(e, AuthError::InvalidCredentials))
    }

    async fn request_password_reset(&self, email: &str) -> Result<ResetTicket, AuthError> {
        self.api
            .post("/auth/password-reset", &json!({ "email": email }))
            .await
            .map_err(|e| auth_error(e, AuthError::InvalidCredentials))
    }

    async fn validate_reset_token(&self, token: &str) -> Result<bool, AuthError> {
        self.api
            .get(&format!("/auth/password-reset/{}", urlencoding::encode(token)))
            .await
            .map_err(|e| auth_error(e, AuthError::InvalidResetToken))
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError> {
        let body = PasswordResetConfirm { token: token.to_string(), new_password: new_password.to_string() };
        self.api
            .post("/auth/password-reset/confirm", &body)
            .await
            .map_err(|e| auth_error(e, AuthError::InvalidResetToken))
    }
}

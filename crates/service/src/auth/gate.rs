use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::credentials::CredentialVerifier;
use super::domain::{AuthSession, AuthUser, LoginInput, ResetTicket};
use super::errors::AuthError;
use super::routes::{NavigationDecision, RouteTable, HOME_PATH, LOGIN_PATH};
use super::session::SessionStore;

/// Result of a successful login: the session and where to navigate next.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: AuthSession,
    pub redirect: &'static str,
}

/// Session lifecycle and route access, independent of how credentials are checked.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn CredentialVerifier>,
    session: Arc<dyn SessionStore>,
    routes: RouteTable,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, session: Arc<dyn SessionStore>) -> Self {
        Self { verifier, session, routes: RouteTable::admin() }
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> { self.session.clone() }

    /// Check credentials and persist token and user together. Nothing is stored on failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }
        let input = LoginInput { email: email.to_string(), password: password.to_string() };
        let session = match self.verifier.verify(&input).await {
            Ok(s) => s,
            Err(e) => {
                warn!(code = e.code(), error = %e, "login_failed");
                return Err(e);
            }
        };
        self.session.save(&session).await?;
        info!(user_id = session.user.id, "login_succeeded");
        Ok(LoginOutcome { session, redirect: HOME_PATH })
    }

    /// Drop the stored session. Storage errors are logged, never returned; the
    /// caller always lands on the login screen.
    pub async fn logout(&self) -> &'static str {
        match self.session.clear().await {
            Ok(()) => info!("logout"),
            Err(e) => error!(error = %e, "logout_failed"),
        }
        LOGIN_PATH
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.token().await.is_some()
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        self.session.user().await
    }

    pub async fn token(&self) -> Option<String> {
        self.session.token().await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<ResetTicket, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::Validation("email is required".into()));
        }
        self.verifier.request_password_reset(email).await
    }

    /// `false` for invalid tokens and for verifier errors alike.
    pub async fn validate_reset_token(&self, token: &str) -> bool {
        match self.verifier.validate_reset_token(token).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "reset_token_validation_failed");
                false
            }
        }
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError> {
        self.verifier.reset_password(token, new_password).await
    }

    pub async fn guard(&self, path: &str) -> NavigationDecision {
        let authenticated = self.is_authenticated().await;
        self.routes.guard(path, authenticated)
    }
}

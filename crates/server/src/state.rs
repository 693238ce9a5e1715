use std::sync::Arc;

use models::Entity;
use service::auth::{AuthError, CredentialVerifier, FixedCredentials, TokenIssuer};
use service::repository::HasCollection;
use service::{LinkKind, LocalCrud, LocalLinks, LocalPlanos, Repository};

/// Shared state of every handler: the repository plus the credential checker.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, credentials: Arc<dyn CredentialVerifier>, tokens: TokenIssuer) -> Self {
        Self { repo, credentials, tokens }
    }

    /// In-memory backend with the demo accounts. Tokens are JWTs when a secret is given.
    pub fn mock(seeded: bool, jwt_secret: Option<String>) -> Result<Self, AuthError> {
        let repo = if seeded { Repository::seeded() } else { Repository::empty() };
        let tokens = TokenIssuer::new(jwt_secret);
        let credentials = FixedCredentials::demo(tokens.clone())?;
        Ok(Self::new(Arc::new(repo), Arc::new(credentials), tokens))
    }

    pub fn crud<T>(&self) -> LocalCrud<T>
    where
        T: Entity,
        Repository: HasCollection<T>,
    {
        LocalCrud::new(Arc::clone(&self.repo))
    }

    pub fn links(&self, kind: LinkKind) -> LocalLinks { LocalLinks::new(Arc::clone(&self.repo), kind) }

    pub fn planos(&self) -> LocalPlanos { LocalPlanos::new(Arc::clone(&self.repo)) }
}

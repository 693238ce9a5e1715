use std::collections::HashMap;
use std::time::Duration;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, ResetTicket};
use super::errors::AuthError;
use super::token::TokenIssuer;

pub const RESET_TOKEN_PREFIX: &str = "valid-token-";
const MIN_PASSWORD_LEN: usize = 6;
pub const RESET_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Checks credentials and runs the password reset flow, locally or against the API.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, input: &LoginInput) -> Result<AuthSession, AuthError>;

    async fn request_password_reset(&self, email: &str) -> Result<ResetTicket, AuthError>;

    async fn validate_reset_token(&self, token: &str) -> Result<bool, AuthError>;

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError>;
}

struct Account {
    user: AuthUser,
    password_hash: String,
}

struct ResetGrant {
    email: String,
    issued: Instant,
}

impl ResetGrant {
    fn expired(&self) -> bool { self.issued.elapsed() >= RESET_TOKEN_TTL }
}

/// Fixed account set used in mock mode. Passwords are kept as argon2 hashes.
///
/// At most one reset grant is live per account; a grant expires after [`RESET_TOKEN_TTL`].
pub struct FixedCredentials {
    accounts: RwLock<Vec<Account>>,
    reset_tokens: RwLock<HashMap<String, ResetGrant>>,
    issuer: TokenIssuer,
}

fn hasher() -> Result<Argon2<'static>, AuthError> {
    // light parameters: these are demo accounts hashed at every startup
    let params = Params::new(8 * 1024, 2, 1, None).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn check_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

// argon2 work runs on the blocking pool
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| AuthError::HashError(e.to_string()))?
}

impl FixedCredentials {
    /// `(email, password, nome, papel)` tuples; ids follow the given order starting at 1.
    pub fn new(accounts: &[(&str, &str, &str, &str)], issuer: TokenIssuer) -> Result<Self, AuthError> {
        let mut list = Vec::with_capacity(accounts.len());
        for (i, (email, password, nome, papel)) in accounts.iter().enumerate() {
            list.push(Account {
                user: AuthUser {
                    id: i as u64 + 1,
                    email: email.to_string(),
                    nome: nome.to_string(),
                    papel: papel.to_string(),
                },
                password_hash: hash_password(password)?,
            });
        }
        Ok(Self { accounts: RwLock::new(list), reset_tokens: RwLock::new(HashMap::new()), issuer })
    }

    /// The two demo accounts of the admin.
    pub fn demo(issuer: TokenIssuer) -> Result<Self, AuthError> {
        Self::new(
            &[
                ("admin@follawup.com", "123456", "Administrador", "admin"),
                ("gestor@follawup.com", "123456", "Gestor", "gestor"),
            ],
            issuer,
        )
    }

    pub fn issuer(&self) -> &TokenIssuer { &self.issuer }
}

fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

#[async_trait]
impl CredentialVerifier for FixedCredentials {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn verify(&self, input: &LoginInput) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&input.email);
        let (user, hash) = {
            let accounts = self.accounts.read().await;
            let account = accounts.iter().find(|a| a.user.email == email).ok_or(AuthError::InvalidCredentials)?;
            (account.user.clone(), account.password_hash.clone())
        };

        let password = input.password.clone();
        if !blocking(move || check_password(&password, &hash)).await? {
            debug!("password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    #[instrument(skip(self))]
    async fn request_password_reset(&self, email: &str) -> Result<ResetTicket, AuthError> {
        let email = normalize_email(email);
        if !self.accounts.read().await.iter().any(|a| a.user.email == email) {
            return Err(AuthError::NotFound);
        }
        let token = format!("{RESET_TOKEN_PREFIX}{}", Uuid::new_v4());
        let mut grants = self.reset_tokens.write().await;
        grants.retain(|_, g| !g.expired() && g.email != email);
        grants.insert(token.clone(), ResetGrant { email, issued: Instant::now() });
        info!(pending = grants.len(), "password_reset_requested");
        Ok(ResetTicket { message: "recovery e-mail sent".into(), token: Some(token) })
    }

    async fn validate_reset_token(&self, token: &str) -> Result<bool, AuthError> {
        Ok(token.starts_with(RESET_TOKEN_PREFIX) && token.len() > RESET_TOKEN_PREFIX.len())
    }

    #[instrument(skip(self, token, new_password))]
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError> {
        if !self.validate_reset_token(token).await? {
            return Err(AuthError::InvalidResetToken);
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        // only a live grant we issued touches an account; other well-formed tokens change nothing
        let grant = self.reset_tokens.write().await.remove(token).filter(|g| !g.expired());
        if let Some(ResetGrant { email, .. }) = grant {
            let password = new_password.to_string();
            let hash = blocking(move || hash_password(&password)).await?;
            let mut accounts = self.accounts.write().await;
            if let Some(account) = accounts.iter_mut().find(|a| a.user.email == email) {
                account.password_hash = hash;
                info!(user_id = account.user.id, "password_reset");
            }
        }
        Ok("password changed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn demo_accounts_log_in() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        let session = creds.verify(&login("admin@follawup.com", "123456")).await?;
        assert_eq!(session.user.nome, "Administrador");
        assert!(session.token.starts_with("mock-jwt-token-"));
        let session = creds.verify(&login(" Gestor@Follawup.com ", "123456")).await?;
        assert_eq!(session.user.papel, "gestor");
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_or_email_fails() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        assert!(matches!(creds.verify(&login("admin@follawup.com", "nope")).await, Err(AuthError::InvalidCredentials)));
        assert!(matches!(creds.verify(&login("wrong", "wrong")).await, Err(AuthError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn reset_changes_password() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        assert!(matches!(creds.request_password_reset("ninguem@follawup.com").await, Err(AuthError::NotFound)));

        let ticket = creds.request_password_reset("gestor@follawup.com").await?;
        let token = ticket.token.unwrap();
        assert!(creds.validate_reset_token(&token).await?);
        assert!(!creds.validate_reset_token("expired-123").await?);
        assert!(matches!(creds.reset_password("bad", "abcdef").await, Err(AuthError::InvalidResetToken)));
        assert!(matches!(creds.reset_password(&token, "123").await, Err(AuthError::Validation(_))));

        creds.reset_password(&token, "nova-senha").await?;
        assert!(creds.verify(&login("gestor@follawup.com", "123456")).await.is_err());
        assert!(creds.verify(&login("gestor@follawup.com", "nova-senha")).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn unissued_token_leaves_password_alone() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        creds.reset_password("valid-token-forjado", "invasor").await?;
        assert!(creds.verify(&login("admin@follawup.com", "123456")).await.is_ok());
        assert!(creds.verify(&login("admin@follawup.com", "invasor")).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn new_request_replaces_previous_grant() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        let first = creds.request_password_reset("gestor@follawup.com").await?.token.unwrap();
        let second = creds.request_password_reset("gestor@follawup.com").await?.token.unwrap();
        assert_eq!(creds.reset_tokens.read().await.len(), 1);

        creds.reset_password(&first, "primeira").await?;
        assert!(creds.verify(&login("gestor@follawup.com", "123456")).await.is_ok());
        creds.reset_password(&second, "segunda").await?;
        assert!(creds.verify(&login("gestor@follawup.com", "segunda")).await.is_ok());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_logins_and_reset() -> Result<(), anyhow::Error> {
        let creds = std::sync::Arc::new(FixedCredentials::demo(TokenIssuer::mock())?);
        let token = creds.request_password_reset("gestor@follawup.com").await?.token.unwrap();
        let logins: Vec<_> = (0..4)
            .map(|_| {
                let creds = creds.clone();
                tokio::spawn(async move { creds.verify(&login("admin@follawup.com", "123456")).await })
            })
            .collect();
        creds.reset_password(&token, "nova-senha").await?;
        for handle in logins {
            assert_eq!(handle.await??.user.id, 1);
        }
        assert!(creds.verify(&login("gestor@follawup.com", "nova-senha")).await.is_ok());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn grants_expire() -> Result<(), anyhow::Error> {
        let creds = FixedCredentials::demo(TokenIssuer::mock())?;
        let token = creds.request_password_reset("gestor@follawup.com").await?.token.unwrap();
        tokio::time::advance(RESET_TOKEN_TTL + Duration::from_secs(1)).await;
        creds.reset_password(&token, "tarde-demais").await?;
        assert!(creds.verify(&login("gestor@follawup.com", "123456")).await.is_ok());

        creds.request_password_reset("gestor@follawup.com").await?;
        tokio::time::advance(RESET_TOKEN_TTL).await;
        creds.request_password_reset("admin@follawup.com").await?;
        assert_eq!(creds.reset_tokens.read().await.len(), 1);
        Ok(())
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::domain::AuthUser;
use super::errors::AuthError;

pub const MOCK_TOKEN_PREFIX: &str = "mock-jwt-token-";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: u64,
    pub papel: String,
    pub exp: usize,
}

/// Issues and checks session tokens: HS256 JWTs when a secret is configured,
/// otherwise opaque `mock-jwt-token-<millis>` strings.
#[derive(Clone, Debug, Default)]
pub struct TokenIssuer {
    secret: Option<String>,
}

impl TokenIssuer {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()) }
    }

    pub fn mock() -> Self { Self { secret: None } }

    pub fn is_jwt(&self) -> bool { self.secret.is_some() }

    pub fn issue(&self, user: &AuthUser) -> Result<String, AuthError> {
        match &self.secret {
            Some(secret) => {
                let exp = (Utc::now() + Duration::hours(12)).timestamp() as usize;
                let claims = Claims { sub: user.email.clone(), uid: user.id, papel: user.papel.clone(), exp };
                encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))
            }
            None => Ok(format!("{MOCK_TOKEN_PREFIX}{}", Utc::now().timestamp_millis())),
        }
    }

    /// Check a bearer token. Mock tokens carry no claims.
    pub fn verify(&self, token: &str) -> Result<Option<Claims>, AuthError> {
        match &self.secret {
            Some(secret) => {
                let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
                    .map_err(|e| AuthError::TokenError(e.to_string()))?;
                Ok(Some(data.claims))
            }
            None if token.starts_with(MOCK_TOKEN_PREFIX) && token.len() > MOCK_TOKEN_PREFIX.len() => Ok(None),
            None => Err(AuthError::TokenError("unrecognised token".into())),
        }
    }
}

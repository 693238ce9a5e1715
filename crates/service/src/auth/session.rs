//! Durable session entries: `auth_token` and `auth_user` (the user as JSON).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use super::domain::{AuthSession, AuthUser};
use super::errors::AuthError;
use crate::storage::json_map_store::JsonMapStore;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// Where the current session lives between runs. `save` and `clear` write both
/// entries at once.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn token(&self) -> Option<String>;

    async fn user(&self) -> Option<AuthUser>;

    async fn save(&self, session: &AuthSession) -> Result<(), AuthError>;

    async fn clear(&self) -> Result<(), AuthError>;
}

fn parse_user(raw: Option<String>) -> Option<AuthUser> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "stored auth_user unreadable");
            None
        }
    }
}

fn encode_user(user: &AuthUser) -> Result<String, AuthError> {
    serde_json::to_string(user).map_err(|e| AuthError::Session(e.to_string()))
}

/// Session kept in a JSON file.
#[derive(Clone)]
pub struct FileSessionStore {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileSessionStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let store = JsonMapStore::open(path).await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Option<String> {
        self.store.get(&TOKEN_KEY.to_string()).await.filter(|t| !t.is_empty())
    }

    async fn user(&self) -> Option<AuthUser> {
        parse_user(self.store.get(&USER_KEY.to_string()).await)
    }

    async fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        let user = encode_user(&session.user)?;
        let token = session.token.clone();
        self.store
            .update_map(|m| {
                m.insert(TOKEN_KEY.to_string(), token);
                m.insert(USER_KEY.to_string(), user);
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        self.store
            .update_map(|m| {
                m.remove(TOKEN_KEY);
                m.remove(USER_KEY);
                Ok(())
            })
            .await?;
        Ok(())
    }
}

/// In-process session, for tests and short-lived tools.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Option<String> {
        self.entries.lock().await.get(TOKEN_KEY).cloned().filter(|t| !t.is_empty())
    }

    async fn user(&self) -> Option<AuthUser> {
        let raw = self.entries.lock().await.get(USER_KEY).cloned();
        parse_user(raw)
    }

    async fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        let user = encode_user(&session.user)?;
        let mut entries = self.entries.lock().await;
        entries.insert(TOKEN_KEY.to_string(), session.token.clone());
        entries.insert(USER_KEY.to_string(), user);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().await;
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        Ok(())
    }
}

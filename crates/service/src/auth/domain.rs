use models::EntityId;
use serde::{Deserialize, Serialize};

/// Signed-in user as stored in the session and returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: EntityId,
    pub email: String,
    pub nome: String,
    pub papel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Answer of a reset request. The token goes out by e-mail; the mock verifier also
/// keeps it here for in-process callers, and it never crosses the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetTicket {
    pub message: String,
    #[serde(skip)]
    pub token: Option<String>,
}

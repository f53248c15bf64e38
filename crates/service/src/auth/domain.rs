use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    /// Both fields are required; the email is compared trimmed.
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

/// Stored admin account (remote backend)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Where a session comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Remote,
    Local,
}

/// An authenticated admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub kind: SessionKind,
    pub since: DateTime<Utc>,
}

/// Result of a successful login. The token goes into the auth cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedSession {
    pub session: AdminSession,
    pub token: Option<String>,
}

/// Record persisted by the local fallback under its fixed auth key. Only the
/// client holding `token` is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSessionRecord {
    #[serde(default)]
    pub token: String,
    pub user: LocalUser,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub email: String,
}

/// JWT claims issued for remote sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub iat: usize,
    pub exp: usize,
}

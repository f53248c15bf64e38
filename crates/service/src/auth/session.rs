//! Session providers behind the admin gate.
//!
//! The remote provider issues signed tokens for stored admin accounts; the
//! local provider checks one configured credential pair and persists a login
//! record in local storage.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::domain::{AdminSession, IssuedSession, LocalSessionRecord, LocalUser, LoginInput, SessionKind};
use super::errors::AuthError;
use super::repository::AdminRepository;
use super::service::AuthService;
use crate::storage::local_storage::{LocalStorage, AUTH_KEY};

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn login(&self, input: LoginInput) -> Result<IssuedSession, AuthError>;
    /// Active session for the presented token, if any. Never errors.
    async fn current(&self, token: Option<&str>) -> Option<AdminSession>;
    async fn logout(&self, token: Option<&str>) -> Result<(), AuthError>;
    fn kind(&self) -> SessionKind;
}

pub struct RemoteSessionProvider<R: AdminRepository> {
    auth: AuthService<R>,
}

impl<R: AdminRepository> RemoteSessionProvider<R> {
    pub fn new(auth: AuthService<R>) -> Self { Self { auth } }

    pub fn auth(&self) -> &AuthService<R> { &self.auth }
}

#[async_trait]
impl<R: AdminRepository + 'static> SessionProvider for RemoteSessionProvider<R> {
    async fn login(&self, input: LoginInput) -> Result<IssuedSession, AuthError> {
        if !input.is_complete() {
            return Err(AuthError::Validation("Informe e-mail e senha.".into()));
        }
        self.auth.login(input).await
    }

    async fn current(&self, token: Option<&str>) -> Option<AdminSession> {
        let token = token.filter(|t| !t.is_empty())?;
        match self.auth.verify_token(token) {
            Ok(claims) => Some(AdminSession {
                email: claims.sub,
                kind: SessionKind::Remote,
                since: Utc.timestamp_opt(claims.iat as i64, 0).single().unwrap_or_else(Utc::now),
            }),
            Err(e) => {
                warn!(error = %e, "session token rejected");
                None
            }
        }
    }

    /// Tokens are stateless; the caller drops the cookie.
    async fn logout(&self, _token: Option<&str>) -> Result<(), AuthError> {
        Ok(())
    }

    fn kind(&self) -> SessionKind { SessionKind::Remote }
}

/// Single-admin provider for the local fallback. One login record at a time;
/// it is bound to a random token handed to the client that logged in.
pub struct LocalSessionProvider {
    storage: LocalStorage,
    email: String,
    password: String,
}

impl LocalSessionProvider {
    pub fn new(storage: LocalStorage, email: &str, password: &str) -> Self {
        Self { storage, email: email.trim().to_string(), password: password.to_string() }
    }

    /// Stored record, only when `token` is the one it was issued with.
    async fn matching_record(&self, token: Option<&str>) -> Option<LocalSessionRecord> {
        let token = token.filter(|t| !t.is_empty())?;
        let record: LocalSessionRecord = self.storage.read_json(AUTH_KEY).await?;
        if record.token.is_empty() || record.token != token {
            debug!("local session token does not match");
            return None;
        }
        Some(record)
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn login(&self, input: LoginInput) -> Result<IssuedSession, AuthError> {
        if !input.is_complete() {
            return Err(AuthError::Validation("Informe e-mail e senha.".into()));
        }
        if input.email.trim() != self.email || input.password != self.password {
            return Err(AuthError::Unauthorized);
        }
        let record = LocalSessionRecord {
            token: Uuid::new_v4().to_string(),
            user: LocalUser { email: self.email.clone() },
            created_at: Utc::now(),
        };
        let raw = serde_json::to_string(&record).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .set_item(AUTH_KEY, raw)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        info!(email = %record.user.email, "local admin logged in");
        Ok(IssuedSession {
            session: AdminSession { email: record.user.email, kind: SessionKind::Local, since: record.created_at },
            token: Some(record.token),
        })
    }

    /// A missing or malformed record both mean "not logged in".
    async fn current(&self, token: Option<&str>) -> Option<AdminSession> {
        let record = self.matching_record(token).await?;
        Some(AdminSession { email: record.user.email, kind: SessionKind::Local, since: record.created_at })
    }

    /// Clears the record only for the client holding its token.
    async fn logout(&self, token: Option<&str>) -> Result<(), AuthError> {
        if self.matching_record(token).await.is_none() {
            return Ok(());
        }
        self.storage
            .remove_item(AUTH_KEY)
            .await
            .map(|_| ())
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    fn kind(&self) -> SessionKind { SessionKind::Local }
}

use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{AdminAccount, AdminSession, Claims, IssuedSession, LoginInput, SessionKind};
use super::errors::AuthError;
use super::repository::AdminRepository;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_hours: i64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AdminRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AdminRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create an admin account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAdminRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAdminRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), session_hours: 12 });
    /// let account = tokio_test::block_on(svc.register("admin@example.com", "Secret123")).unwrap();
    /// assert_eq!(account.email, "admin@example.com");
    /// ```
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AdminAccount, AuthError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if let Some(existing) = self.repo.find_by_email(email).await? {
            debug!("admin exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let account = self.repo.create(email, hash).await?;
        info!(admin_id = %account.id, email = %account.email, "admin_registered");
        Ok(account)
    }

    /// Create the account unless one already exists; returns whether it was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        match self.register(email, password).await {
            Ok(_) => Ok(true),
            Err(AuthError::Conflict) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Verify credentials and issue a signed session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAdminRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAdminRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), session_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register("u@e.com", "Passw0rd"));
    /// let issued = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(issued.session.email, "u@e.com");
    /// assert!(issued.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<IssuedSession, AuthError> {
        let account = self.repo
            .find_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&account.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.session_hours)).timestamp() as usize;
        let claims = Claims { sub: account.email.clone(), uid: account.id.to_string(), iat: now.timestamp() as usize, exp };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        let session = AdminSession { email: account.email, kind: SessionKind::Remote, since: now };
        Ok(IssuedSession { session, token: Some(token) })
    }

    /// Decode and validate a token (signature and expiry).
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAdminRepository;

    fn svc() -> AuthService<MockAdminRepository> {
        AuthService::new(
            Arc::new(MockAdminRepository::default()),
            AuthConfig { jwt_secret: "test-secret".into(), session_hours: 1 },
        )
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc();
        svc.register("a@b.c", "correct-horse").await.unwrap();
        let res = svc.login(LoginInput { email: "a@b.c".into(), password: "nope".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn issued_token_verifies() {
        let svc = svc();
        svc.register("a@b.c", "correct-horse").await.unwrap();
        let issued = svc.login(LoginInput { email: " a@b.c ".into(), password: "correct-horse".into() }).await.unwrap();
        let claims = svc.verify_token(issued.token.as_deref().unwrap()).unwrap();
        assert_eq!(claims.sub, "a@b.c");
        assert!(svc.verify_token("garbage").is_err());
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = svc();
        assert!(svc.ensure_admin("root@vipi.local", "123456").await.unwrap());
        assert!(!svc.ensure_admin("root@vipi.local", "123456").await.unwrap());
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let res = svc().register("a@b.c", "123").await;
        assert!(matches!(res, Err(AuthError::Validation(_))));
    }
}

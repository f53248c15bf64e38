//! Backend selection: remote (PostgreSQL via SeaORM) or the local JSON store.
//!
//! Chosen once at startup; everything downstream only sees trait objects.

use std::sync::Arc;

use configs::AppConfig;
use migration::MigratorTrait;
use tracing::{info, warn};

use crate::auth::repo::seaorm::SeaOrmAdminRepository;
use crate::auth::service::{AuthConfig, AuthService};
use crate::auth::{LocalSessionProvider, RemoteSessionProvider, SessionProvider};
use crate::catalog::repo::local::{LocalServiceRepository, LocalToolRepository};
use crate::catalog::repo::seaorm::{SeaOrmServiceRepository, SeaOrmToolRepository};
use crate::catalog::CatalogService;
use crate::changes::ChangeFeed;
use crate::images::{DataUrlImageSink, FileImageSink};
use crate::storage::LocalStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Local,
}

impl Backend {
    pub fn from_config(cfg: &AppConfig) -> Self {
        if cfg.has_remote_backend() { Backend::Remote } else { Backend::Local }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Remote => "remote",
            Backend::Local => "local",
        }
    }
}

/// Everything the HTTP layer needs, wired for one backend.
#[derive(Clone)]
pub struct AppServices {
    pub backend: Backend,
    pub catalog: Arc<CatalogService>,
    pub sessions: Arc<dyn SessionProvider>,
}

pub async fn build(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    match Backend::from_config(cfg) {
        Backend::Remote => build_remote(cfg).await,
        Backend::Local => build_local(cfg).await,
    }
}

async fn build_remote(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "migrations_applied", "remote schema up to date");

    let auth = AuthService::new(
        Arc::new(SeaOrmAdminRepository { db: db.clone() }),
        AuthConfig { jwt_secret: cfg.auth.jwt_secret.clone(), session_hours: cfg.auth.session_hours },
    );
    match (&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password) {
        (Some(email), Some(password)) => {
            if auth.ensure_admin(email, password).await? {
                info!(%email, "bootstrap admin created");
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("bootstrap admin needs both email and password; skipped");
        }
        (None, None) => {}
    }

    let catalog = CatalogService::new(
        Arc::new(SeaOrmServiceRepository { db: db.clone() }),
        Arc::new(SeaOrmToolRepository { db }),
        Arc::new(FileImageSink::new(&cfg.storage.uploads_dir, &cfg.storage.public_uploads_path)),
        ChangeFeed::default(),
    );
    info!(backend = "remote", "backend ready");
    Ok(AppServices {
        backend: Backend::Remote,
        catalog: Arc::new(catalog),
        sessions: Arc::new(RemoteSessionProvider::new(auth)),
    })
}

async fn build_local(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    let storage = LocalStorage::open(&cfg.storage.local_file).await?;
    let catalog = CatalogService::new(
        Arc::new(LocalServiceRepository::new(storage.clone())),
        Arc::new(LocalToolRepository::new(storage.clone())),
        Arc::new(DataUrlImageSink),
        ChangeFeed::default(),
    );
    let sessions = LocalSessionProvider::new(storage, &cfg.auth.local_admin_email, &cfg.auth.local_admin_password);
    info!(backend = "local", file = %cfg.storage.local_file, "backend ready");
    Ok(AppServices { backend: Backend::Local, catalog: Arc::new(catalog), sessions: Arc::new(sessions) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{LoginInput, SessionKind};
    use crate::domain::ToolInput;

    #[tokio::test]
    async fn empty_database_url_selects_local_backend() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut cfg = AppConfig::default();
        cfg.storage.local_file = dir.path().join("ls.json").to_string_lossy().into_owned();
        assert_eq!(Backend::from_config(&cfg), Backend::Local);

        let app = build(&cfg).await?;
        assert_eq!(app.backend, Backend::Local);
        assert_eq!(app.sessions.kind(), SessionKind::Local);

        app.catalog.create_tool(ToolInput { name: "Drill".into(), quantity: 2, min_quantity: 5, ..Default::default() }).await?;
        let session = app
            .sessions
            .login(LoginInput { email: "admin@vipi.local".into(), password: "123456".into() })
            .await?;
        assert_eq!(session.session.email, "admin@vipi.local");

        // a second build over the same file sees the persisted data
        let again = build(&cfg).await?;
        assert_eq!(again.catalog.all_tools().await?.len(), 1);
        let token = session.token.as_deref();
        assert!(token.is_some());
        assert!(again.sessions.current(token).await.is_some());
        assert!(again.sessions.current(None).await.is_none());
        Ok(())
    }
}

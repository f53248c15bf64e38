use std::sync::Arc;

use configs::AppConfig;
use service::auth::SessionProvider;
use service::backend::{AppServices, Backend};
use service::catalog::CatalogService;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub sessions: Arc<dyn SessionProvider>,
    pub backend: Backend,
    /// Directory served under `public_uploads_path` (remote image uploads).
    pub uploads_dir: String,
    pub public_uploads_path: String,
}

impl AppState {
    pub fn new(services: AppServices, cfg: &AppConfig) -> Self {
        Self {
            catalog: services.catalog,
            sessions: services.sessions,
            backend: services.backend,
            uploads_dir: cfg.storage.uploads_dir.clone(),
            public_uploads_path: cfg.storage.public_uploads_path.clone(),
        }
    }
}

//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binaries can call
//! `service::runtime::ensure_env` without depending directly on `common`.

use configs::StorageConfig;

/// Ensure the data and uploads directories exist before the backend opens.
pub async fn ensure_env(storage: &StorageConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&storage.data_dir, &storage.uploads_dir).await
}

//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the data and uploads directories exist, creating them when missing.
pub async fn ensure_env(data_dir: &str, uploads_dir: &str) -> anyhow::Result<()> {
    for dir in [data_dir, uploads_dir] {
        if tokio::fs::metadata(dir).await.is_err() {
            info!(%dir, "creating missing runtime directory");
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_nested_dirs() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("vipi_env_{}", std::process::id()));
        let data = root.join("data");
        let uploads = root.join("data/uploads");
        ensure_env(data.to_str().unwrap(), uploads.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&uploads).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}

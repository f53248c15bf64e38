//! Image upload sinks.
//!
//! The local backend embeds images as `data:` URLs inside the record; the
//! remote backend writes files under the uploads directory and stores their
//! public address. A failure on any image fails the whole batch.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{info, warn};

use crate::errors::ServiceError;

pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// One file taken from the form's file input.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !self.content_type.starts_with("image/") {
            return Err(ServiceError::Upload(format!("{} is not an image", self.file_name)));
        }
        if self.bytes.is_empty() {
            return Err(ServiceError::Upload(format!("{} is empty", self.file_name)));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ServiceError::Upload(format!("{} exceeds {} bytes", self.file_name, MAX_IMAGE_BYTES)));
        }
        Ok(())
    }

    /// File extension from the name, falling back to the MIME subtype.
    pub fn extension(&self) -> String {
        let from_name = std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));
        from_name.unwrap_or_else(|| match self.content_type.as_str() {
            "image/jpeg" => "jpg".into(),
            "image/svg+xml" => "svg".into(),
            other => other
                .strip_prefix("image/")
                .filter(|s| s.chars().all(|c| c.is_ascii_alphanumeric()))
                .unwrap_or("bin")
                .to_string(),
        })
    }
}

#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Store every image and return their addresses in input order.
    async fn store_all(&self, images: Vec<UploadedImage>) -> Result<Vec<String>, ServiceError>;

    /// Best-effort removal of addresses returned by `store_all`.
    async fn discard(&self, _urls: &[String]) {}
}

/// Embeds images as base64 `data:` URLs.
#[derive(Debug, Default, Clone)]
pub struct DataUrlImageSink;

#[async_trait]
impl ImageSink for DataUrlImageSink {
    async fn store_all(&self, images: Vec<UploadedImage>) -> Result<Vec<String>, ServiceError> {
        images
            .into_iter()
            .map(|img| {
                img.validate()?;
                Ok(format!("data:{};base64,{}", img.content_type, STANDARD.encode(&img.bytes)))
            })
            .collect()
    }
}

/// Writes images to a directory served under `public_prefix`.
#[derive(Debug, Clone)]
pub struct FileImageSink {
    dir: PathBuf,
    public_prefix: String,
}

impl FileImageSink {
    pub fn new<P: Into<PathBuf>>(dir: P, public_prefix: &str) -> Self {
        Self { dir: dir.into(), public_prefix: public_prefix.trim_end_matches('/').to_string() }
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.public_prefix)?.trim_start_matches('/');
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[async_trait]
impl ImageSink for FileImageSink {
    async fn store_all(&self, images: Vec<UploadedImage>) -> Result<Vec<String>, ServiceError> {
        for img in &images {
            img.validate()?;
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ServiceError::Upload(e.to_string()))?;

        let mut stored = Vec::with_capacity(images.len());
        for img in images {
            let name = format!("{}.{}", uuid::Uuid::new_v4(), img.extension());
            if let Err(e) = tokio::fs::write(self.dir.join(&name), &img.bytes).await {
                self.discard(&stored).await;
                return Err(ServiceError::Upload(format!("{}: {}", img.file_name, e)));
            }
            stored.push(format!("{}/{}", self.public_prefix, name));
        }
        info!(count = stored.len(), "images stored");
        Ok(stored)
    }

    async fn discard(&self, urls: &[String]) {
        for url in urls {
            if let Some(path) = self.path_for(url) {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %e, "failed to remove uploaded image");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedImage {
        UploadedImage { file_name: name.into(), content_type: "image/png".into(), bytes: vec![0x89, b'P', b'N', b'G'] }
    }

    #[tokio::test]
    async fn data_url_sink_encodes_base64() -> anyhow::Result<()> {
        let urls = DataUrlImageSink.store_all(vec![png("a.png")]).await?;
        assert_eq!(urls, vec!["data:image/png;base64,iVBORw==".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn non_image_rejects_whole_batch() {
        let text = UploadedImage { file_name: "x.txt".into(), content_type: "text/plain".into(), bytes: b"hi".to_vec() };
        let res = DataUrlImageSink.store_all(vec![png("a.png"), text]).await;
        assert!(matches!(res, Err(ServiceError::Upload(_))));
    }

    #[tokio::test]
    async fn file_sink_writes_and_discards() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let sink = FileImageSink::new(dir.path(), "/uploads/");
        let urls = sink.store_all(vec![png("foto.PNG"), png("b")]).await?;
        assert_eq!(urls.len(), 2);
        assert!(urls[0].starts_with("/uploads/") && urls[0].ends_with(".png"));
        let path = sink.path_for(&urls[0]).unwrap();
        assert!(tokio::fs::metadata(&path).await.is_ok());

        sink.discard(&urls).await;
        assert!(tokio::fs::metadata(&path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn file_sink_validates_before_writing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let sink = FileImageSink::new(dir.path(), "/uploads");
        let empty = UploadedImage { file_name: "e.png".into(), content_type: "image/png".into(), bytes: vec![] };
        assert!(sink.store_all(vec![png("a.png"), empty]).await.is_err());
        let mut entries = tokio::fs::read_dir(dir.path()).await?;
        assert!(entries.next_entry().await?.is_none());
        Ok(())
    }

    #[test]
    fn path_for_rejects_traversal() {
        let sink = FileImageSink::new("/tmp/x", "/uploads");
        assert!(sink.path_for("/uploads/../etc/passwd").is_none());
        assert!(sink.path_for("/elsewhere/a.png").is_none());
    }
}

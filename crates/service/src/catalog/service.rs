use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::repository::{ServiceRepository, ToolRepository};
use crate::changes::{ChangeFeed, ChangeKind, ChangeTable};
use crate::domain::{PublicService, Service, ServiceInput, ServicePatch, Tool, ToolInput};
use crate::errors::ServiceError;
use crate::images::{ImageSink, UploadedImage};
use crate::listing::{apply_tool_query, ToolQuery};
use crate::stats::StockSummary;

/// Application service for the admin catalog. Framework independent; the
/// HTTP layer only translates requests into these calls.
#[derive(Clone)]
pub struct CatalogService {
    services: Arc<dyn ServiceRepository>,
    tools: Arc<dyn ToolRepository>,
    images: Arc<dyn ImageSink>,
    changes: ChangeFeed,
}

impl CatalogService {
    pub fn new(
        services: Arc<dyn ServiceRepository>,
        tools: Arc<dyn ToolRepository>,
        images: Arc<dyn ImageSink>,
        changes: ChangeFeed,
    ) -> Self {
        Self { services, tools, images, changes }
    }

    pub fn changes(&self) -> &ChangeFeed { &self.changes }

    pub async fn list_services(&self) -> Result<Vec<Service>, ServiceError> {
        self.services.list_all().await
    }

    pub async fn list_public_services(&self) -> Result<Vec<PublicService>, ServiceError> {
        self.services.list_public().await
    }

    pub async fn get_service(&self, id: &str) -> Result<Service, ServiceError> {
        self.services.get(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }

    /// A private service is indistinguishable from a missing one here.
    pub async fn public_service(&self, id: &str) -> Result<PublicService, ServiceError> {
        match self.services.get(id).await? {
            Some(s) if s.is_public => Ok(PublicService::from(&s)),
            _ => Err(ServiceError::not_found("service")),
        }
    }

    /// Validate, upload images, then insert. Nothing is stored when the name
    /// is missing or any image fails; uploaded files are discarded when the
    /// insert itself fails.
    #[instrument(skip(self, input, uploads), fields(name = %input.name, uploads = uploads.len()))]
    pub async fn create_service(
        &self,
        mut input: ServiceInput,
        uploads: Vec<UploadedImage>,
    ) -> Result<Service, ServiceError> {
        input.validate()?;
        let stored = self.store_uploads(uploads).await?;
        if !stored.is_empty() {
            input.images = Some(stored.clone());
            input.image_url = None;
        }
        match self.services.create(input).await {
            Ok(service) => {
                info!(id = %service.id, "service created");
                self.changes.publish(ChangeTable::Service, ChangeKind::Insert, &service.id);
                Ok(service)
            }
            Err(e) => {
                self.images.discard(&stored).await;
                Err(e)
            }
        }
    }

    /// Merge a partial update. New uploads replace the image list; without
    /// uploads the patch's own `images` (if any) apply. Images the updated
    /// record no longer references are discarded.
    #[instrument(skip(self, patch, uploads), fields(uploads = uploads.len()))]
    pub async fn update_service(
        &self,
        id: &str,
        mut patch: ServicePatch,
        uploads: Vec<UploadedImage>,
    ) -> Result<Service, ServiceError> {
        if let Some(name) = &patch.name {
            crate::domain::require_name(name)?;
        }
        let replaces_images = !uploads.is_empty() || patch.images.is_some();
        let previous = if replaces_images { self.services.get(id).await? } else { None };
        let stored = self.store_uploads(uploads).await?;
        if !stored.is_empty() {
            patch.images = Some(stored.clone());
        }
        match self.services.update(id, patch).await {
            Ok(service) => {
                info!(id = %service.id, "service updated");
                if let Some(previous) = &previous {
                    self.images.discard(&unreferenced_images(previous, Some(&service))).await;
                }
                self.changes.publish(ChangeTable::Service, ChangeKind::Update, &service.id);
                Ok(service)
            }
            Err(e) => {
                self.images.discard(&stored).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn toggle_visibility(&self, id: &str, make_public: bool) -> Result<Service, ServiceError> {
        let service = self.services.toggle_visibility(id, make_public).await?;
        self.changes.publish(ChangeTable::Service, ChangeKind::Update, &service.id);
        Ok(service)
    }

    /// Idempotent: deleting a missing id succeeds. The record's images are
    /// discarded once the row is gone.
    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: &str) -> Result<(), ServiceError> {
        let previous = self.services.get(id).await?;
        if self.services.delete(id).await? {
            info!(%id, "service deleted");
            if let Some(previous) = &previous {
                self.images.discard(&unreferenced_images(previous, None)).await;
            }
            self.changes.publish(ChangeTable::Service, ChangeKind::Delete, id);
        }
        Ok(())
    }

    pub async fn all_tools(&self) -> Result<Vec<Tool>, ServiceError> {
        self.tools.list_all().await
    }

    /// Fetch the whole collection and apply search, status filter and sort.
    /// Returns the visible tools together with the unfiltered count.
    pub async fn list_tools(&self, query: &ToolQuery) -> Result<(Vec<Tool>, usize), ServiceError> {
        let all = self.tools.list_all().await?;
        let visible = apply_tool_query(&all, query);
        Ok((visible, all.len()))
    }

    pub async fn get_tool(&self, id: &str) -> Result<Tool, ServiceError> {
        self.tools.get(id).await?.ok_or_else(|| ServiceError::not_found("tool"))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_tool(&self, input: ToolInput) -> Result<Tool, ServiceError> {
        let input = input.normalized()?;
        let tool = self.tools.create(input).await?;
        if tool.is_low_stock() {
            warn!(id = %tool.id, quantity = tool.quantity, min = tool.min_quantity, "tool created below minimum");
        }
        self.changes.publish(ChangeTable::Tool, ChangeKind::Insert, &tool.id);
        Ok(tool)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update_tool(&self, id: &str, input: ToolInput) -> Result<Tool, ServiceError> {
        let input = input.normalized()?;
        let tool = self.tools.update(id, input).await?;
        self.changes.publish(ChangeTable::Tool, ChangeKind::Update, &tool.id);
        Ok(tool)
    }

    #[instrument(skip(self))]
    pub async fn delete_tool(&self, id: &str) -> Result<(), ServiceError> {
        if self.tools.delete(id).await? {
            self.changes.publish(ChangeTable::Tool, ChangeKind::Delete, id);
        }
        Ok(())
    }

    pub async fn stock_summary(&self) -> Result<StockSummary, ServiceError> {
        Ok(StockSummary::from_tools(&self.tools.list_all().await?))
    }

    async fn store_uploads(&self, uploads: Vec<UploadedImage>) -> Result<Vec<String>, ServiceError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        self.images.store_all(uploads).await
    }
}

/// Addresses held by `before` that `after` no longer uses, cover included.
fn unreferenced_images(before: &Service, after: Option<&Service>) -> Vec<String> {
    let kept = |url: &str| {
        after.is_some_and(|a| a.images.iter().any(|u| u == url) || a.image_url.as_deref() == Some(url))
    };
    let mut stale: Vec<String> = Vec::new();
    for url in before.images.iter().chain(before.image_url.iter()) {
        if !kept(url) && !stale.contains(url) {
            stale.push(url.clone());
        }
    }
    stale
}

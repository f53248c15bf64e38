//! Local fallback repositories backed by [`LocalStorage`].
//!
//! Each entity type lives as one serialized collection under a fixed key.
//! Reads never fail; missing or malformed data reads as an empty collection.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::catalog::repository::{ServiceRepository, ToolRepository};
use crate::domain::{PublicService, Service, ServiceInput, ServicePatch, Tool, ToolInput};
use crate::errors::ServiceError;
use crate::listing::locale_cmp;
use crate::storage::local_storage::{LocalStorage, SERVICES_KEY, TOOLS_KEY};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone)]
pub struct LocalServiceRepository {
    storage: LocalStorage,
}

impl LocalServiceRepository {
    pub fn new(storage: LocalStorage) -> Self { Self { storage } }
}

#[async_trait]
impl ServiceRepository for LocalServiceRepository {
    async fn list_all(&self) -> Result<Vec<Service>, ServiceError> {
        let mut items: Vec<Service> = self.storage.read_collection(SERVICES_KEY).await;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_public(&self) -> Result<Vec<PublicService>, ServiceError> {
        let items = self.list_all().await?;
        Ok(items.iter().filter(|s| s.is_public).map(PublicService::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Service>, ServiceError> {
        let items: Vec<Service> = self.storage.read_collection(SERVICES_KEY).await;
        Ok(items.into_iter().find(|s| s.id == id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: ServiceInput) -> Result<Service, ServiceError> {
        let service = input.into_service(new_id(), Utc::now())?;
        self.storage
            .update_collection(SERVICES_KEY, |items: &mut Vec<Service>| {
                items.insert(0, service.clone());
                Ok(())
            })
            .await?;
        debug!(id = %service.id, "local service created");
        Ok(service)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: ServicePatch) -> Result<Service, ServiceError> {
        self.storage
            .update_collection(SERVICES_KEY, |items: &mut Vec<Service>| {
                let item = items
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(ServiceError::record_not_found)?;
                item.apply_patch(patch)?;
                Ok(item.clone())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.storage
            .update_collection(SERVICES_KEY, |items: &mut Vec<Service>| {
                let before = items.len();
                items.retain(|s| s.id != id);
                Ok(items.len() != before)
            })
            .await
    }
}

#[derive(Clone)]
pub struct LocalToolRepository {
    storage: LocalStorage,
}

impl LocalToolRepository {
    pub fn new(storage: LocalStorage) -> Self { Self { storage } }
}

#[async_trait]
impl ToolRepository for LocalToolRepository {
    async fn list_all(&self) -> Result<Vec<Tool>, ServiceError> {
        let mut items: Vec<Tool> = self.storage.read_collection(TOOLS_KEY).await;
        items.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        Ok(items)
    }

    async fn get(&self, id: &str) -> Result<Option<Tool>, ServiceError> {
        let items: Vec<Tool> = self.storage.read_collection(TOOLS_KEY).await;
        Ok(items.into_iter().find(|t| t.id == id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create(&self, input: ToolInput) -> Result<Tool, ServiceError> {
        let tool = input.into_tool(new_id(), Utc::now())?;
        self.storage
            .update_collection(TOOLS_KEY, |items: &mut Vec<Tool>| {
                items.push(tool.clone());
                Ok(())
            })
            .await?;
        Ok(tool)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: &str, input: ToolInput) -> Result<Tool, ServiceError> {
        let replacement = input.into_tool(id.to_string(), Utc::now())?;
        self.storage
            .update_collection(TOOLS_KEY, |items: &mut Vec<Tool>| {
                let item = items
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(ServiceError::record_not_found)?;
                *item = replacement;
                Ok(item.clone())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.storage
            .update_collection(TOOLS_KEY, |items: &mut Vec<Tool>| {
                let before = items.len();
                items.retain(|t| t.id != id);
                Ok(items.len() != before)
            })
            .await
    }
}

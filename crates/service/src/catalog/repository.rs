use async_trait::async_trait;

use crate::domain::{PublicService, Service, ServiceInput, ServicePatch, Tool, ToolInput};
use crate::errors::ServiceError;

/// Persistence for catalog services.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// All services, newest first.
    async fn list_all(&self) -> Result<Vec<Service>, ServiceError>;
    /// Public services only, newest first, reduced field set.
    async fn list_public(&self) -> Result<Vec<PublicService>, ServiceError>;
    async fn get(&self, id: &str) -> Result<Option<Service>, ServiceError>;
    async fn create(&self, input: ServiceInput) -> Result<Service, ServiceError>;
    /// Merge `patch` into the stored record; `NotFound` when `id` is unknown.
    async fn update(&self, id: &str, patch: ServicePatch) -> Result<Service, ServiceError>;
    /// Returns whether a record existed. Deleting a missing id is not an error.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;

    async fn toggle_visibility(&self, id: &str, make_public: bool) -> Result<Service, ServiceError> {
        self.update(id, ServicePatch { is_public: Some(make_public), ..Default::default() }).await
    }
}

/// Persistence for stock tools.
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// All tools ordered by name.
    async fn list_all(&self) -> Result<Vec<Tool>, ServiceError>;
    async fn get(&self, id: &str) -> Result<Option<Tool>, ServiceError>;
    async fn create(&self, input: ToolInput) -> Result<Tool, ServiceError>;
    /// Replace the editable fields; `NotFound` when `id` is unknown.
    async fn update(&self, id: &str, input: ToolInput) -> Result<Tool, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repositories for tests. Every trait call is counted.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockServiceRepository {
        items: Mutex<Vec<Service>>,
        calls: AtomicUsize,
        next_id: AtomicUsize,
        fail: Mutex<Option<String>>,
    }

    impl MockServiceRepository {
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        /// Make every following call fail with a database error.
        pub fn fail_with(&self, msg: &str) { *self.fail.lock().unwrap() = Some(msg.to_string()); }

        fn enter(&self) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail.lock().unwrap().as_ref() {
                Some(msg) => Err(ServiceError::Db(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ServiceRepository for MockServiceRepository {
        async fn list_all(&self) -> Result<Vec<Service>, ServiceError> {
            self.enter()?;
            let mut items = self.items.lock().unwrap().clone();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(items)
        }

        async fn list_public(&self) -> Result<Vec<PublicService>, ServiceError> {
            Ok(self.list_all().await?.iter().filter(|s| s.is_public).map(PublicService::from).collect())
        }

        async fn get(&self, id: &str) -> Result<Option<Service>, ServiceError> {
            self.enter()?;
            Ok(self.items.lock().unwrap().iter().find(|s| s.id == id).cloned())
        }

        async fn create(&self, input: ServiceInput) -> Result<Service, ServiceError> {
            self.enter()?;
            let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
            let service = input.into_service(id, Utc::now())?;
            self.items.lock().unwrap().insert(0, service.clone());
            Ok(service)
        }

        async fn update(&self, id: &str, patch: ServicePatch) -> Result<Service, ServiceError> {
            self.enter()?;
            let mut items = self.items.lock().unwrap();
            let item = items.iter_mut().find(|s| s.id == id).ok_or_else(ServiceError::record_not_found)?;
            item.apply_patch(patch)?;
            Ok(item.clone())
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            self.enter()?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|s| s.id != id);
            Ok(items.len() != before)
        }
    }

    #[derive(Default)]
    pub struct MockToolRepository {
        items: Mutex<Vec<Tool>>,
        calls: AtomicUsize,
        next_id: AtomicUsize,
    }

    impl MockToolRepository {
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl ToolRepository for MockToolRepository {
        async fn list_all(&self) -> Result<Vec<Tool>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut items = self.items.lock().unwrap().clone();
            items.sort_by(|a, b| crate::listing::locale_cmp(&a.name, &b.name));
            Ok(items)
        }

        async fn get(&self, id: &str) -> Result<Option<Tool>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn create(&self, input: ToolInput) -> Result<Tool, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
            let tool = input.into_tool(id, Utc::now())?;
            self.items.lock().unwrap().push(tool.clone());
            Ok(tool)
        }

        async fn update(&self, id: &str, input: ToolInput) -> Result<Tool, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut items = self.items.lock().unwrap();
            let item = items.iter_mut().find(|t| t.id == id).ok_or_else(ServiceError::record_not_found)?;
            *item = input.into_tool(id.to_string(), Utc::now())?;
            Ok(item.clone())
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|t| t.id != id);
            Ok(items.len() != before)
        }
    }
}

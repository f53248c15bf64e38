use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

pub const SERVICES_KEY: &str = "vipi_services_v1";
pub const TOOLS_KEY: &str = "vipi_tools_v1";
pub const AUTH_KEY: &str = "vipi_auth_v1";

/// File-backed `key -> string` storage for the local fallback backend.
///
/// Every value is a serialized JSON document, one per fixed key.
#[derive(Clone)]
pub struct LocalStorage {
    store: Arc<JsonMapStore<String, String>>,
}

impl LocalStorage {
    /// Open (or create) the backing file.
    pub async fn open<P: Into<std::path::PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<String, String>::new(path).await?;
        Ok(Self { store })
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.store.get(&key.to_string()).await
    }

    pub async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<bool, ServiceError> {
        self.store.remove(&key.to_string()).await
    }

    /// Read a JSON value stored under `key`. Missing or malformed data yields `None`.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key).await?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(%key, error = %e, "malformed local record ignored");
                None
            }
        }
    }

    /// Read the collection under `key`; never fails.
    pub async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_json(key).await.unwrap_or_default()
    }

    /// Read-modify-write the collection under `key` as one step.
    pub async fn update_collection<T, R, F>(&self, key: &str, f: F) -> Result<R, ServiceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let key = key.to_string();
        self.store
            .update_map(|map| {
                let mut items: Vec<T> = map
                    .get(&key)
                    .and_then(|raw| serde_json::from_str(raw).ok())
                    .unwrap_or_default();
                let out = f(&mut items)?;
                let raw = serde_json::to_string(&items).map_err(|e| ServiceError::Storage(e.to_string()))?;
                map.insert(key.clone(), raw);
                Ok(out)
            })
            .await
    }
}

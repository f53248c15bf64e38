use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file. A missing file starts empty and
/// an unreadable one is treated as empty as well.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "corrupt store file; starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                Self::persist(&file_path, &empty).await?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn persist(path: &PathBuf, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.update_map(|m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        self.update_map(|m| Ok(m.remove(key).is_some())).await
    }

    /// Apply a mutation to a copy of the map, persist it, then publish it.
    ///
    /// The write lock is held for the whole cycle, so concurrent mutations are
    /// serialized. If `f` or the file write fails the in-memory map is untouched.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        Self::persist(&self.file_path, &next).await?;
        *map = next;
        Ok(out)
    }
}

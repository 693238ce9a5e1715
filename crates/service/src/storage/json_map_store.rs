use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// JSON file-backed key-value map.
///
/// The whole map is rewritten on every change through a temp file and a rename,
/// so readers of the file see either the old or the new content.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

fn storage_err(e: impl std::fmt::Display) -> ServiceError { ServiceError::Storage(e.to_string()) }

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`; a missing file starts empty, an unreadable one is
    /// logged and replaced on the next write.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "json_store_corrupt_starting_empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(storage_err(e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn persist(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(storage_err)?;
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, data).await.map_err(storage_err)?;
        fs::rename(&tmp, &self.file_path).await.map_err(storage_err)
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    /// Insert or replace a value and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        self.update_map(|m| {
            m.insert(key, value);
            Ok(())
        })
        .await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut existed = false;
        self.update_map(|m| {
            existed = m.remove(key).is_some();
            Ok(())
        })
        .await?;
        Ok(existed)
    }

    /// Apply a mutation and persist it as one write. The in-memory map only
    /// changes if the write succeeds.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<(), ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut draft = map.clone();
        f(&mut draft)?;
        self.persist(&draft).await?;
        *map = draft;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        assert!(store.get(&"auth_token".into()).await.is_none());

        store
            .update_map(|m| {
                m.insert("auth_token".into(), "mock-jwt-token-1".into());
                m.insert("auth_user".into(), "{}".into());
                Ok(())
            })
            .await?;
        assert!(store.remove(&"auth_user".into()).await?);
        assert!(!store.remove(&"auth_user".into()).await?);

        let reopened = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(reopened.get(&"auth_token".into()).await.as_deref(), Some("mock-jwt-token-1"));
        assert!(reopened.get(&"auth_user".into()).await.is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"not json").await?;
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        assert!(store.get(&"auth_token".into()).await.is_none());
        store.insert("auth_token".into(), "t".into()).await?;
        let reopened = JsonMapStore::<String, String>::open(&tmp).await?;
        assert_eq!(reopened.get(&"auth_token".into()).await.as_deref(), Some("t"));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_changes_nothing() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::open(&tmp).await?;
        let r = store
            .update_map(|m| {
                m.insert("auth_token".into(), "t".into());
                Err(ServiceError::Storage("boom".into()))
            })
            .await;
        assert!(r.is_err());
        assert!(store.get(&"auth_token".into()).await.is_none());
        Ok(())
    }
}

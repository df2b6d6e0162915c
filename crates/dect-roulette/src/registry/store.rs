//! JSON snapshot storage for the registry.

use super::{Registry, Snapshot};
use crate::error::RouletteError;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// File-backed store that overwrites the whole snapshot on every save.
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    /// Create a new file store.
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    /// Save the registry membership as a JSON snapshot.
    pub async fn save(&self, registry: &Registry) -> Result<(), RouletteError> {
        let data = serde_json::to_vec(&registry.snapshot())?;

        // Ensure parent directory exists
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.storage_path).await?;

        debug!(
            "Saved registry snapshot ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }

    /// Load the registry from the snapshot file.
    ///
    /// Returns an empty registry if the file doesn't exist.
    pub async fn load(&self) -> Result<Registry, RouletteError> {
        if !self.storage_path.exists() {
            info!(
                "Backup file not found at {:?}, starting with empty registry",
                self.storage_path
            );
            return Ok(Registry::new());
        }

        let data = fs::read(&self.storage_path).await?;

        if data.iter().all(u8::is_ascii_whitespace) {
            warn!("Backup file is empty, starting with empty registry");
            return Ok(Registry::new());
        }

        let snapshot: Snapshot = serde_json::from_slice(&data)?;
        let registry = Registry::from_snapshot(snapshot);

        info!(
            "Loaded {} registered and {} banned numbers from {:?}",
            registry.count(),
            registry.count_banned(),
            self.storage_path
        );
        Ok(registry)
    }

    /// Check if a snapshot file exists.
    pub fn exists(&self) -> bool {
        self.storage_path.exists()
    }
}

/// In-memory store for testing or when persistence is disabled.
pub struct MemoryStore;

impl MemoryStore {
    /// "Save" does nothing for memory store.
    pub async fn save(&self, _registry: &Registry) -> Result<(), RouletteError> {
        debug!("Memory store: save is a no-op");
        Ok(())
    }

    /// "Load" returns an empty registry.
    pub async fn load(&self) -> Result<Registry, RouletteError> {
        debug!("Memory store: returning empty registry");
        Ok(Registry::new())
    }
}

/// Storage backend with or without persistence.
pub enum Store {
    /// JSON snapshot on disk
    File(FileStore),
    /// In-memory only (no persistence)
    Memory(MemoryStore),
}

impl Store {
    /// Create a file-backed store.
    pub fn file(storage_path: PathBuf) -> Self {
        Store::File(FileStore::new(storage_path))
    }

    /// Create a memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore)
    }

    /// Save the registry.
    pub async fn save(&self, registry: &Registry) -> Result<(), RouletteError> {
        match self {
            Store::File(s) => s.save(registry).await,
            Store::Memory(s) => s.save(registry).await,
        }
    }

    /// Load the registry.
    pub async fn load(&self) -> Result<Registry, RouletteError> {
        match self {
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(1001).unwrap();
        registry.register(1002).unwrap();
        registry.ban(2000);
        registry
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data_file.json"));

        store.save(&sample_registry()).await.unwrap();
        assert!(store.exists());

        let restored = store.load().await.unwrap();
        assert_eq!(restored.registered_numbers(), vec![1001, 1002]);
        assert_eq!(restored.banned_numbers(), vec![2000]);
    }

    #[tokio::test]
    async fn test_file_store_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("missing.json"));

        let registry = store.load().await.unwrap();
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.count_banned(), 0);
    }

    #[tokio::test]
    async fn test_file_store_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data_file.json"));

        let mut registry = sample_registry();
        store.save(&registry).await.unwrap();

        registry.unregister(1001).unwrap();
        registry.unban(2000);
        store.save(&registry).await.unwrap();

        let restored = store.load().await.unwrap();
        assert_eq!(restored.registered_numbers(), vec![1002]);
        assert!(restored.banned_numbers().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state").join("data_file.json");
        let store = FileStore::new(path.clone());

        store.save(&sample_registry()).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_reads_unordered_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data_file.json");
        std::fs::write(
            &path,
            r#"{"registered_numbers": [3, 1, 2], "banned_numbers": [9]}"#,
        )
        .unwrap();

        let registry = FileStore::new(path).load().await.unwrap();
        assert_eq!(registry.registered_numbers(), vec![1, 2, 3]);
        assert!(registry.is_banned(9));
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data_file.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FileStore::new(path.clone()).load().await;
        assert!(matches!(result, Err(RouletteError::Storage(_))));

        // The unreadable snapshot is left as it was
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_memory_store_operations() {
        tokio_test::block_on(async {
            let store = MemoryStore;

            // Load returns empty registry
            let registry = store.load().await.unwrap();
            assert_eq!(registry.count(), 0);

            // Save is a no-op
            store.save(&sample_registry()).await.unwrap();

            // Load still returns empty (no persistence)
            let registry = store.load().await.unwrap();
            assert_eq!(registry.count(), 0);
        });
    }

    #[tokio::test]
    async fn test_store_file_variant() {
        let dir = TempDir::new().unwrap();
        let store = Store::file(dir.path().join("data_file.json"));

        store.save(&sample_registry()).await.unwrap();
        let restored = store.load().await.unwrap();
        assert_eq!(restored.count(), 2);
    }
}

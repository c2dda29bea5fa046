use crate::utils::error::{LauncherError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Asynchronous key-value storage for credential material
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up a secret; `None` when the entry is absent
    async fn get(&self, name: &str) -> Result<Option<String>>;

    async fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Remove a secret; returns whether it existed
    async fn remove(&self, name: &str) -> Result<bool>;
}

/// Secret store persisted as a TOML table, readable only by the owner
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                LauncherError::ConfigError(format!("Failed to parse secret store: {}", e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string_pretty(entries).map_err(|e| {
            LauncherError::ConfigError(format!("Failed to serialize secret store: {}", e))
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(name))
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut entries = self.load().await?;
        entries.insert(name.to_string(), value.to_string());
        self.store(&entries).await?;
        tracing::info!("Stored secret '{}' in {:?}", name, self.path);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let mut entries = self.load().await?;
        let existed = entries.remove(name).is_some();
        if existed {
            self.store(&entries).await?;
            tracing::info!("Removed secret '{}' from {:?}", name, self.path);
        }
        Ok(existed)
    }
}

/// Volatile secret store, for tests and one-off sessions
#[derive(Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(name.into(), value.into());
        Self { entries: RwLock::new(entries) }
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(name).is_some())
    }
}

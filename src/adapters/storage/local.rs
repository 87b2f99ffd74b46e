//! Local filesystem storage backend
//!
//! Stores attachment data as plain files under a configured root
//! directory. Writes go through a staging file in the temp subdirectory
//! and are renamed into place only after the copy succeeds, so a failed
//! copy never leaves a partial file under its key.

use crate::config::StorageConfig;
use crate::core::relay::{ByteSink, ByteSource, StreamService};
use crate::domain::errors::{SpoolError, StorageError};
use crate::domain::keys::{ModuleId, StorageKey};
use crate::domain::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;

use super::StorageService;

/// Storage backend writing to the local filesystem
pub struct LocalStorageService {
    base_dir: PathBuf,
    temp_dir: PathBuf,
    temp_subdir: String,
    stream: Arc<StreamService>,
}

impl LocalStorageService {
    /// Creates a local storage service rooted at the configured directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the storage configuration is
    /// invalid.
    pub fn new(config: &StorageConfig, stream: Arc<StreamService>) -> Result<Self> {
        config
            .validate()
            .map_err(SpoolError::Configuration)?;

        let base_dir = PathBuf::from(&config.base_dir);
        let temp_dir = base_dir.join(&config.temp_subdir);
        Ok(Self {
            base_dir,
            temp_dir,
            temp_subdir: config.temp_subdir.clone(),
            stream,
        })
    }

    /// Runs a producer through the relay and stores the resulting stream
    ///
    /// The producer is handled exactly as in
    /// [`StreamService::relay`]: small known lengths are buffered in
    /// memory, everything else streams through the bounded channel while
    /// this method copies it to disk. A producer failure surfaces here as
    /// a copy error and the target file is not created.
    pub async fn save_from<F, Fut>(
        &self,
        producer: F,
        known_length: Option<u64>,
        module_id: Option<&ModuleId>,
        key_suffix: Option<&str>,
    ) -> Result<String>
    where
        F: FnOnce(ByteSink) -> Fut + Send + 'static,
        Fut: Future<Output = io::Result<()>> + Send + 'static,
    {
        let source = self.stream.relay(producer, known_length).await?;
        self.save_data(source, module_id, key_suffix).await
    }

    /// Validates a key and resolves it under the storage root
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let key = StorageKey::new(key).map_err(SpoolError::Validation)?;
        Ok(self.base_dir.join(key.as_str()))
    }

    /// Validates a key and resolves it under the temp directory
    fn resolve_temp(&self, key: &str) -> Result<PathBuf> {
        let key = StorageKey::new(key).map_err(SpoolError::Validation)?;
        Ok(self.temp_dir.join(key.as_str()))
    }

    /// Builds the full key for a save, generating a suffix when absent
    fn build_key(&self, module_id: Option<&ModuleId>, key_suffix: Option<&str>) -> Result<String> {
        let suffix = match key_suffix {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => format!("{}/{}", Utc::now().format("%Y/%m"), Uuid::new_v4()),
        };
        let key = match module_id {
            Some(module) => format!("{}/{}", module, suffix),
            None => suffix,
        };
        // Reject traversal before any path is formed
        StorageKey::new(&key).map_err(SpoolError::Validation)?;
        Ok(key)
    }

    /// Copies a source into a freshly created target file
    ///
    /// The target is reserved with a create-new open so concurrent saves
    /// under the same key cannot both win. Data lands in a staging file
    /// first and is renamed over the reservation on success; on failure
    /// both the staging file and the reservation are removed.
    async fn copy_to_new_file(&self, source: &mut ByteSource, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::create_dir_all(&self.temp_dir).await?;

        let reservation = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(target)
            .await;
        match reservation {
            Ok(file) => drop(file),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::KeyAlreadyExists(target.display().to_string()).into());
            }
            Err(err) => return Err(err.into()),
        }

        let staging = self.temp_dir.join(format!("{}.part", Uuid::new_v4()));
        let result = self.copy_to_staging(source, &staging).await;
        match result {
            Ok(bytes) => {
                fs::rename(&staging, target).await?;
                tracing::debug!(bytes, path = %target.display(), "stored data");
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_file(&staging).await;
                let _ = fs::remove_file(target).await;
                Err(StorageError::CopyFailed(err.to_string()).into())
            }
        }
    }

    async fn copy_to_staging(&self, source: &mut ByteSource, staging: &Path) -> io::Result<u64> {
        let mut file = fs::File::create(staging).await?;
        let bytes = tokio::io::copy(source, &mut file).await?;
        file.sync_all().await?;
        Ok(bytes)
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn save_data(
        &self,
        mut source: ByteSource,
        module_id: Option<&ModuleId>,
        key_suffix: Option<&str>,
    ) -> Result<String> {
        let key = self.build_key(module_id, key_suffix)?;
        let target = self.resolve(&key)?;

        self.copy_to_new_file(&mut source, &target)
            .await
            .map_err(|err| match err {
                // Report the key, not the resolved path
                SpoolError::Storage(StorageError::KeyAlreadyExists(_)) => {
                    StorageError::KeyAlreadyExists(key.clone()).into()
                }
                other => other,
            })?;
        Ok(key)
    }

    async fn save_temp_data(&self, mut source: ByteSource) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        let target = self.temp_dir.join(&key);
        self.copy_to_new_file(&mut source, &target).await?;
        Ok(key)
    }

    async fn get_data(&self, key: &str) -> Result<ByteSource> {
        let path = self.resolve(key)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(ByteSource::from_file(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::KeyNotFound(key.to_string()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_temp_data(&self, key: &str) -> Result<ByteSource> {
        let path = self.resolve_temp(key)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(ByteSource::from_file(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::KeyNotFound(key.to_string()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_keys(&self, module_id: Option<&ModuleId>, prefix: &str) -> Result<Vec<String>> {
        // The prefix names a directory (everything up to the last '/') and
        // a name prefix within it
        let (dir_part, name_prefix) = match prefix.rfind('/') {
            Some(i) => (&prefix[..i], &prefix[i + 1..]),
            None => ("", prefix),
        };

        let mut rel_dir = String::new();
        if let Some(module) = module_id {
            rel_dir.push_str(module.as_str());
        }
        if !dir_part.is_empty() {
            if !rel_dir.is_empty() {
                rel_dir.push('/');
            }
            rel_dir.push_str(dir_part);
        }

        let dir_path = if rel_dir.is_empty() {
            self.base_dir.clone()
        } else {
            self.resolve(&rel_dir)?
        };

        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&dir_path).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(keys),
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(name_prefix) {
                continue;
            }
            let is_dir = entry.file_type().await?.is_dir();
            // The staging area is not part of the keyspace
            if is_dir && rel_dir.is_empty() && module_id.is_none() && name == self.temp_subdir {
                continue;
            }

            let mut key = String::new();
            if !rel_dir.is_empty() {
                key.push_str(&rel_dir);
                key.push('/');
            }
            key.push_str(&name);
            if is_dir {
                key.push('/');
            }
            keys.push(key);
        }

        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key)?;
        if fs::try_exists(&path).await? {
            return Ok(true);
        }
        let temp_path = self.resolve_temp(key)?;
        Ok(fs::try_exists(&temp_path).await?)
    }

    async fn purge_data(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "purged data");
                return Ok(true);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let temp_path = self.resolve_temp(key)?;
        match fs::remove_file(&temp_path).await {
            Ok(()) => {
                tracing::debug!(key, "purged temp data");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> LocalStorageService {
        let config = StorageConfig {
            base_dir: dir.path().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        let stream = Arc::new(StreamService::new(RelayConfig::default()));
        LocalStorageService::new(&config, stream).unwrap()
    }

    #[tokio::test]
    async fn test_build_key_with_module_and_suffix() {
        let dir = TempDir::new().unwrap();
        let storage = service(&dir);
        let module = ModuleId::new("lab").unwrap();

        let key = storage.build_key(Some(&module), Some("x/y")).unwrap();
        assert_eq!(key, "lab/x/y");
    }

    #[tokio::test]
    async fn test_build_key_generates_dated_suffix() {
        let dir = TempDir::new().unwrap();
        let storage = service(&dir);

        let key = storage.build_key(None, None).unwrap();
        let expected_prefix = Utc::now().format("%Y/%m/").to_string();
        assert!(key.starts_with(&expected_prefix));

        // Generated keys are unique
        let other = storage.build_key(None, None).unwrap();
        assert_ne!(key, other);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let storage = service(&dir);

        assert!(storage.resolve("../outside").is_err());
        assert!(storage.resolve("/absolute").is_err());
    }
}

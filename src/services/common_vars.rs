//! Upload and download of an environment's `common_vars.yaml`
//!
//! The blob lives at `<env-dir-name>/common_vars.yaml`, so every environment
//! directory owns exactly one remote copy.

use super::{download_if_exists, ensure_bucket, upload_blob};
use crate::config::{Config, StorageConfig};
use crate::error::Result;
use crate::models::{BlobKey, COMMON_VARS_FILENAME, ConfigDocument};
use crate::storage::BucketStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct CommonVarsSync {
    store: Arc<dyn BucketStore>,
    storage: StorageConfig,
    key: BlobKey,
    /// File read by uploads (`COMMON_VARS` override)
    source_path: PathBuf,
    /// File written by downloads, always inside the env dir
    download_path: PathBuf,
}

impl CommonVarsSync {
    pub fn new(store: Arc<dyn BucketStore>, config: &Config) -> Result<Self> {
        let env_dir = config.paths.env_dir()?;
        let key = BlobKey::workspace_file(&config.paths.env_dir_name()?, COMMON_VARS_FILENAME)?;

        Ok(Self {
            store,
            storage: config.storage.clone(),
            key,
            source_path: config.paths.common_vars_path()?,
            download_path: env_dir.join(COMMON_VARS_FILENAME),
        })
    }

    pub fn key(&self) -> &BlobKey {
        &self.key
    }

    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Reads the local file, creates the bucket if needed and overwrites the
    /// remote copy.
    pub async fn upload(&self) -> Result<()> {
        tracing::info!(source = ?self.source_path, "Reading common vars");
        let document = ConfigDocument::load(&self.source_path).await?;

        ensure_bucket(self.store.as_ref(), &self.storage).await?;
        upload_blob(
            self.store.as_ref(),
            &self.key,
            document.to_yaml()?,
            self.storage.storage_class,
        )
        .await?;

        tracing::info!(key = %self.key, "Common vars uploaded");
        Ok(())
    }

    /// Replaces the local file with the remote copy. Does nothing when the
    /// remote copy does not exist.
    pub async fn download(&self) -> Result<bool> {
        download_if_exists(self.store.as_ref(), &self.key, &self.download_path).await
    }
}

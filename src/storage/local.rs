use super::BucketStore;
use crate::error::{Error, Result};
use crate::models::{BlobKey, StorageClass};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Marker written into a bucket directory when it is created
const BUCKET_MARKER: &str = ".bucket.yaml";

#[derive(Debug, Serialize, Deserialize)]
struct BucketMarker {
    location: String,
    storage_class: StorageClass,
}

/// Bucket store that keeps each bucket as a directory under `base_path`.
pub struct LocalBucketStore {
    base_path: PathBuf,
    bucket: String,
}

impl LocalBucketStore {
    pub fn new(base_path: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            bucket: bucket.to_string(),
        }
    }

    // --- Path Helpers ---

    fn bucket_root(&self) -> PathBuf {
        self.base_path.join(&self.bucket)
    }

    fn blob_path(&self, key: &BlobKey) -> Result<PathBuf> {
        // Keys must not escape the bucket directory
        if key.as_str().split('/').any(|segment| segment == ".." || segment == ".") {
            return Err(Error::Validation(format!(
                "Blob key '{}' cannot contain relative segments",
                key
            )));
        }
        Ok(self.bucket_root().join(key.as_str()))
    }

    fn missing_blob(&self, key: &BlobKey) -> Error {
        Error::NotFound(format!(
            "Blob '{}' does not exist in bucket '{}'",
            key, self.bucket
        ))
    }

    /// Reads the location and storage class recorded at bucket creation.
    pub async fn bucket_settings(&self) -> Result<Option<(String, StorageClass)>> {
        let marker_path = self.bucket_root().join(BUCKET_MARKER);
        if !marker_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&marker_path)
            .await
            .map_err(|e| Error::local_file(&marker_path, e))?;
        let marker: BucketMarker = serde_yaml::from_str(&content)?;
        Ok(Some((marker.location, marker.storage_class)))
    }
}

#[async_trait]
impl BucketStore for LocalBucketStore {
    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        Ok(self.bucket_root().is_dir())
    }

    async fn create_bucket(&self, location: &str, storage_class: StorageClass) -> Result<()> {
        let root = self.bucket_root();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| Error::local_file(&root, e))?;

        let marker = BucketMarker {
            location: location.to_string(),
            storage_class,
        };
        let marker_path = root.join(BUCKET_MARKER);
        fs::write(&marker_path, serde_yaml::to_string(&marker)?)
            .await
            .map_err(|e| Error::local_file(&marker_path, e))?;

        Ok(())
    }

    async fn blob_exists(&self, key: &BlobKey) -> Result<bool> {
        Ok(self.blob_path(key)?.is_file())
    }

    async fn download(&self, key: &BlobKey) -> Result<Bytes> {
        let path = self.blob_path(key)?;
        if !path.is_file() {
            return Err(self.missing_blob(key));
        }

        let data = fs::read(&path).await.map_err(|e| Error::local_file(&path, e))?;
        Ok(Bytes::from(data))
    }

    async fn upload(&self, key: &BlobKey, data: Bytes) -> Result<()> {
        if !self.bucket_root().is_dir() {
            return Err(Error::Storage(format!("Bucket '{}' does not exist", self.bucket)));
        }

        let path = self.blob_path(key)?;

        // Ensure parent directories exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::local_file(parent, e))?;
        }

        fs::write(&path, &data).await.map_err(|e| Error::local_file(&path, e))
    }

    async fn set_storage_class(&self, key: &BlobKey, storage_class: StorageClass) -> Result<()> {
        if !self.blob_path(key)?.is_file() {
            return Err(self.missing_blob(key));
        }

        // Directories have no per-object tiers; the bucket marker keeps the default
        tracing::debug!(key = %key, %storage_class, "Storage class accepted for local blob");
        Ok(())
    }
}

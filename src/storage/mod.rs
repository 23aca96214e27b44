//! Object store capability used by every synchronization utility
//!
//! The utilities only need a handful of bucket operations, so they talk to a
//! [`BucketStore`] trait object. Production uses Google Cloud Storage; the
//! local backend keeps buckets as directories for offline runs.

pub mod gcs;
pub mod local;

pub use gcs::GcsBucketStore;
pub use local::LocalBucketStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Error, Result};
use crate::models::{BlobKey, StorageClass};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Operations on a single bucket.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Name of the bucket this store is bound to
    fn bucket_name(&self) -> &str;

    async fn bucket_exists(&self) -> Result<bool>;

    /// Creates the bucket in `location` with a default storage class.
    async fn create_bucket(&self, location: &str, storage_class: StorageClass) -> Result<()>;

    async fn blob_exists(&self, key: &BlobKey) -> Result<bool>;

    /// Downloads a blob. A missing blob is [`Error::NotFound`].
    async fn download(&self, key: &BlobKey) -> Result<Bytes>;

    /// Uploads a blob, overwriting any existing content.
    async fn upload(&self, key: &BlobKey, data: Bytes) -> Result<()>;

    /// Sets the storage class of an existing blob.
    async fn set_storage_class(&self, key: &BlobKey, storage_class: StorageClass) -> Result<()>;
}

/// Builds the store selected by the configuration.
pub fn connect(config: &StorageConfig) -> Result<Arc<dyn BucketStore>> {
    match config.backend {
        StorageBackend::Gcs => {
            tracing::debug!(
                endpoint = %config.gcs_endpoint,
                bucket = %config.bucket_name,
                "Using GCS bucket store"
            );
            let store = GcsBucketStore::new(config)?;
            if !store.has_credentials() {
                tracing::warn!(
                    bucket = %config.bucket_name,
                    "GCS_ACCESS_TOKEN is not set, GCS requests are sent without credentials"
                );
            }
            Ok(Arc::new(store))
        }
        StorageBackend::Local => {
            let root = config.local_root.as_ref().ok_or_else(|| {
                Error::Validation("LOCAL_BUCKET_ROOT must be set for the local backend".to_string())
            })?;
            tracing::debug!(root = ?root, bucket = %config.bucket_name, "Using local bucket store");
            Ok(Arc::new(LocalBucketStore::new(root, &config.bucket_name)))
        }
    }
}

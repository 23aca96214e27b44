//! The four utilities and the bucket steps they share

pub mod artifacts;
pub mod common_vars;
pub mod env_vars;
pub mod metadata;

pub use artifacts::{ArtifactQuery, ArtifactResolver};
pub use common_vars::CommonVarsSync;
pub use env_vars::EnvVarExporter;
pub use metadata::{MetadataDownload, MetadataSync};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::models::{BlobKey, StorageClass};
use crate::storage::BucketStore;
use bytes::Bytes;
use std::path::Path;

/// Creates the bucket with the configured location and class when it is
/// missing. Returns whether a bucket was created.
pub async fn ensure_bucket(store: &dyn BucketStore, config: &StorageConfig) -> Result<bool> {
    if store.bucket_exists().await? {
        tracing::debug!(bucket = store.bucket_name(), "Bucket exists");
        return Ok(false);
    }

    tracing::info!(
        bucket = store.bucket_name(),
        project = %config.project_id,
        region = %config.region,
        zone = %config.zone,
        storage_class = %config.storage_class,
        "Creating bucket"
    );
    store.create_bucket(&config.region, config.storage_class).await?;
    Ok(true)
}

/// Uploads serialized content, then sets the blob's storage class explicitly.
pub async fn upload_blob(
    store: &dyn BucketStore,
    key: &BlobKey,
    content: String,
    storage_class: StorageClass,
) -> Result<()> {
    tracing::info!(bucket = store.bucket_name(), key = %key, "Uploading blob");
    store.upload(key, Bytes::from(content)).await?;
    store.set_storage_class(key, storage_class).await
}

/// Downloads `key` over `destination` when the blob exists. An absent blob
/// leaves the local file untouched.
pub async fn download_if_exists(
    store: &dyn BucketStore,
    key: &BlobKey,
    destination: &Path,
) -> Result<bool> {
    if !store.blob_exists(key).await? {
        tracing::warn!(bucket = store.bucket_name(), key = %key, "Blob not in bucket, skipping download");
        return Ok(false);
    }

    let data = store.download(key).await?;
    tokio::fs::write(destination, &data)
        .await
        .map_err(|e| Error::local_file(destination, e))?;

    tracing::info!(key = %key, destination = ?destination, "Downloaded blob");
    Ok(true)
}

/// Downloads a blob that has to exist. `label` names the blob in the error.
pub async fn fetch_required(store: &dyn BucketStore, key: &BlobKey, label: &str) -> Result<Bytes> {
    if !store.blob_exists(key).await? {
        return Err(Error::NotFound(format!(
            "{} does not exist on the bucket '{}' (key '{}')",
            label,
            store.bucket_name(),
            key
        )));
    }

    store.download(key).await
}

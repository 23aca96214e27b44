//! Google Cloud Storage backend over the JSON API

use super::BucketStore;
use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::models::{BlobKey, StorageClass};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default timeout for storage requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = "workspace-vars/0.1";

const YAML_CONTENT_TYPE: &str = "application/x-yaml";

/// Bucket store backed by the GCS JSON API.
pub struct GcsBucketStore {
    client: reqwest::Client,
    endpoint: Url,
    bucket: String,
    project_id: String,
    access_token: Option<SecretString>,
}

impl fmt::Debug for GcsBucketStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsBucketStore")
            .field("endpoint", &self.endpoint.as_str())
            .field("bucket", &self.bucket)
            .field("project_id", &self.project_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteResponse {
    done: bool,
    rewrite_token: Option<String>,
}

impl GcsBucketStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.gcs_endpoint).map_err(|e| {
            Error::Validation(format!("Invalid GCS endpoint '{}': {}", config.gcs_endpoint, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Storage(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            bucket: config.bucket_name.clone(),
            project_id: config.project_id.clone(),
            access_token: config.gcs_access_token.clone(),
        })
    }

    /// Whether requests carry a bearer token.
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some()
    }

    /// Appends percent-encoded path segments to the endpoint. Each segment is
    /// encoded on its own, so `/` inside an object name becomes `%2F`.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Validation(format!("GCS endpoint '{}' cannot be a base URL", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn bucket_url(&self) -> Result<Url> {
        self.url(&["storage", "v1", "b", self.bucket.as_str()])
    }

    fn object_url(&self, key: &BlobKey) -> Result<Url> {
        self.url(&["storage", "v1", "b", self.bucket.as_str(), "o", key.as_str()])
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// GET that treats 404 as "absent".
    async fn probe(&self, url: Url, what: &str) -> Result<bool> {
        let response = self.authorize(self.client.get(url)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(failure(response, what).await),
        }
    }

    async fn ensure_success(response: Response, what: &str) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(failure(response, what).await)
        }
    }
}

/// Turns a non-success response into a storage error carrying the body.
async fn failure(response: Response, what: &str) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::Storage(format!("{} failed with status {}: {}", what, status, body.trim()))
}

#[async_trait]
impl BucketStore for GcsBucketStore {
    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        self.probe(self.bucket_url()?, &format!("Bucket lookup for '{}'", self.bucket))
            .await
    }

    async fn create_bucket(&self, location: &str, storage_class: StorageClass) -> Result<()> {
        let mut url = self.url(&["storage", "v1", "b"])?;
        url.query_pairs_mut().append_pair("project", &self.project_id);

        let body = serde_json::json!({
            "name": self.bucket,
            "location": location,
            "storageClass": storage_class,
        });

        let response = self.authorize(self.client.post(url)).json(&body).send().await?;
        Self::ensure_success(response, &format!("Bucket creation for '{}'", self.bucket)).await?;
        Ok(())
    }

    async fn blob_exists(&self, key: &BlobKey) -> Result<bool> {
        self.probe(self.object_url(key)?, &format!("Object lookup for '{}'", key))
            .await
    }

    async fn download(&self, key: &BlobKey) -> Result<Bytes> {
        let mut url = self.object_url(key)?;
        url.query_pairs_mut().append_pair("alt", "media");

        let response = self.authorize(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "Blob '{}' does not exist in bucket '{}'",
                key, self.bucket
            )));
        }

        let response = Self::ensure_success(response, &format!("Download of '{}'", key)).await?;
        Ok(response.bytes().await?)
    }

    async fn upload(&self, key: &BlobKey, data: Bytes) -> Result<()> {
        let mut url = self.url(&["upload", "storage", "v1", "b", self.bucket.as_str(), "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", key.as_str());

        let response = self
            .authorize(self.client.post(url))
            .header(reqwest::header::CONTENT_TYPE, YAML_CONTENT_TYPE)
            .body(data)
            .send()
            .await?;
        Self::ensure_success(response, &format!("Upload of '{}'", key)).await?;
        Ok(())
    }

    async fn set_storage_class(&self, key: &BlobKey, storage_class: StorageClass) -> Result<()> {
        // Storage class changes are an in-place rewrite; large objects may need
        // several calls, each continuing from the previous rewrite token.
        let base = self.url(&[
            "storage", "v1", "b", self.bucket.as_str(), "o", key.as_str(),
            "rewriteTo", "b", self.bucket.as_str(), "o", key.as_str(),
        ])?;
        let body = serde_json::json!({ "storageClass": storage_class });
        let mut rewrite_token: Option<String> = None;

        loop {
            let mut url = base.clone();
            if let Some(token) = &rewrite_token {
                url.query_pairs_mut().append_pair("rewriteToken", token);
            }

            let response = self.authorize(self.client.post(url)).json(&body).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "Blob '{}' does not exist in bucket '{}'",
                    key, self.bucket
                )));
            }

            let response =
                Self::ensure_success(response, &format!("Storage class update of '{}'", key)).await?;
            let rewrite: RewriteResponse = response.json().await?;
            if rewrite.done {
                return Ok(());
            }

            rewrite_token = match rewrite.rewrite_token {
                Some(token) => Some(token),
                None => {
                    return Err(Error::Storage(format!(
                        "Storage class update of '{}' is incomplete but returned no rewrite token",
                        key
                    )));
                }
            };
        }
    }
}

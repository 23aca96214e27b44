//! In-memory stand-ins for the bucket, the vendor page and terragrunt

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use workspace_vars::error::{Error, Result};
use workspace_vars::models::{BlobKey, StorageClass};
use workspace_vars::providers::{InfraOutputs, PageFetcher};
use workspace_vars::storage::BucketStore;

#[derive(Debug, Default)]
struct BucketState {
    exists: bool,
    created: Vec<(String, StorageClass)>,
    blobs: BTreeMap<String, Bytes>,
    classes: HashMap<String, StorageClass>,
    uploads: usize,
}

/// Bucket kept in memory, recording every mutating call.
#[derive(Debug)]
pub struct MemoryBucket {
    name: String,
    state: Mutex<BucketState>,
}

impl MemoryBucket {
    /// A bucket that has not been created yet.
    pub fn missing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            state: Mutex::new(BucketState::default()),
        })
    }

    /// A bucket that already exists.
    pub fn existing(name: &str) -> Arc<Self> {
        let bucket = Self::missing(name);
        bucket.state.lock().unwrap().exists = true;
        bucket
    }

    pub fn put(&self, key: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        state.exists = true;
        state.blobs.insert(key.to_string(), Bytes::from(content.to_string()));
    }

    pub fn blob(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .blobs
            .get(key)
            .map(|b| String::from_utf8(b.to_vec()).unwrap())
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().unwrap().blobs.keys().cloned().collect()
    }

    pub fn create_calls(&self) -> Vec<(String, StorageClass)> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn storage_class(&self, key: &str) -> Option<StorageClass> {
        self.state.lock().unwrap().classes.get(key).copied()
    }

    pub fn upload_count(&self) -> usize {
        self.state.lock().unwrap().uploads
    }
}

#[async_trait]
impl BucketStore for MemoryBucket {
    fn bucket_name(&self) -> &str {
        &self.name
    }

    async fn bucket_exists(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().exists)
    }

    async fn create_bucket(&self, location: &str, storage_class: StorageClass) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.exists {
            return Err(Error::Storage(format!("Bucket '{}' already exists", self.name)));
        }
        state.exists = true;
        state.created.push((location.to_string(), storage_class));
        Ok(())
    }

    async fn blob_exists(&self, key: &BlobKey) -> Result<bool> {
        Ok(self.state.lock().unwrap().blobs.contains_key(key.as_str()))
    }

    async fn download(&self, key: &BlobKey) -> Result<Bytes> {
        self.state
            .lock()
            .unwrap()
            .blobs
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }

    async fn upload(&self, key: &BlobKey, data: Bytes) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.exists {
            return Err(Error::Storage(format!("Bucket '{}' does not exist", self.name)));
        }
        state.uploads += 1;
        state.blobs.insert(key.to_string(), data);
        Ok(())
    }

    async fn set_storage_class(&self, key: &BlobKey, storage_class: StorageClass) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.blobs.contains_key(key.as_str()) {
            return Err(Error::NotFound(key.to_string()));
        }
        state.classes.insert(key.to_string(), storage_class);
        Ok(())
    }
}

/// Serves canned pages; any other URL answers like a 404.
#[derive(Debug, Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn with_page(url: &str, body: &str) -> Arc<Self> {
        let mut pages = HashMap::new();
        pages.insert(url.to_string(), body.to_string());
        Arc::new(Self {
            pages,
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Http(format!("Failed to fetch {}: status 404 Not Found", url)))
    }
}

/// Canned terragrunt outputs keyed by output name.
#[derive(Debug, Default)]
pub struct StubInfra {
    outputs: HashMap<String, String>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl StubInfra {
    pub fn new(outputs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            outputs: outputs
                .iter()
                .map(|(name, raw)| (name.to_string(), raw.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InfraOutputs for StubInfra {
    async fn output_json(&self, module_dir: &Path, name: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((module_dir.to_path_buf(), name.to_string()));
        self.outputs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Process(format!("terragrunt output {} exited with 1", name)))
    }
}

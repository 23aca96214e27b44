//! Tests for syncing an environment's common_vars.yaml with the bucket

mod common;

use common::helpers::COMMON_VARS_YAML;
use common::{MemoryBucket, TestEnv};
use std::sync::Arc;
use workspace_vars::error::Error;
use workspace_vars::models::{ConfigDocument, StorageClass};
use workspace_vars::services::CommonVarsSync;
use workspace_vars::storage::BucketStore;

fn sync(env: &TestEnv, bucket: &Arc<MemoryBucket>) -> CommonVarsSync {
    let store: Arc<dyn BucketStore> = bucket.clone();
    CommonVarsSync::new(store, &env.config).unwrap()
}

#[tokio::test]
async fn test_upload_creates_bucket_and_stores_under_env_dir_name() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", COMMON_VARS_YAML);
    let bucket = MemoryBucket::missing("ecosys-workspace-vars");

    let sync = sync(&env, &bucket);
    assert_eq!(sync.key().as_str(), "stage/common_vars.yaml");
    sync.upload().await.unwrap();

    assert_eq!(
        bucket.create_calls(),
        vec![("me-west1".to_string(), StorageClass::Standard)]
    );
    assert_eq!(
        bucket.storage_class("stage/common_vars.yaml"),
        Some(StorageClass::Standard)
    );

    let stored = ConfigDocument::parse(&bucket.blob("stage/common_vars.yaml").unwrap()).unwrap();
    let local = ConfigDocument::parse(COMMON_VARS_YAML).unwrap();
    assert_eq!(stored.root(), local.root());
}

#[tokio::test]
async fn test_upload_twice_is_idempotent() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", COMMON_VARS_YAML);
    let bucket = MemoryBucket::missing("ecosys-workspace-vars");
    let sync = sync(&env, &bucket);

    sync.upload().await.unwrap();
    let first = bucket.blob("stage/common_vars.yaml").unwrap();
    sync.upload().await.unwrap();
    let second = bucket.blob("stage/common_vars.yaml").unwrap();

    assert_eq!(first, second);
    assert_eq!(bucket.create_calls().len(), 1, "bucket must only be created once");
    assert_eq!(bucket.upload_count(), 2);
    assert_eq!(bucket.keys(), vec!["stage/common_vars.yaml".to_string()]);
}

#[tokio::test]
async fn test_upload_uses_configured_storage_class_and_region() {
    let mut env = TestEnv::new();
    env.config.storage.region = "europe-west1".to_string();
    env.config.storage.storage_class = StorageClass::Coldline;
    env.write("common_vars.yaml", COMMON_VARS_YAML);
    let bucket = MemoryBucket::missing("vars");

    sync(&env, &bucket).upload().await.unwrap();

    assert_eq!(
        bucket.create_calls(),
        vec![("europe-west1".to_string(), StorageClass::Coldline)]
    );
    assert_eq!(
        bucket.storage_class("stage/common_vars.yaml"),
        Some(StorageClass::Coldline)
    );
}

#[tokio::test]
async fn test_upload_reads_common_vars_override() {
    let mut env = TestEnv::new();
    let elsewhere = env.write("other_vars.yaml", "workspace: other\n");
    env.config.paths.common_vars = Some(elsewhere);
    let bucket = MemoryBucket::existing("vars");

    sync(&env, &bucket).upload().await.unwrap();

    // The key still follows the env dir, only the source file moves
    let stored = bucket.blob("stage/common_vars.yaml").unwrap();
    assert!(stored.contains("workspace: other"));
    assert!(bucket.create_calls().is_empty());
}

#[tokio::test]
async fn test_upload_missing_local_file_fails_before_touching_bucket() {
    let env = TestEnv::new();
    let bucket = MemoryBucket::missing("vars");

    let err = sync(&env, &bucket).upload().await.unwrap_err();

    assert!(matches!(err, Error::LocalFile { .. }), "got {:?}", err);
    assert!(bucket.create_calls().is_empty());
    assert!(bucket.keys().is_empty());
}

#[tokio::test]
async fn test_upload_invalid_yaml_is_rejected() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", "workspace: [unclosed\n");
    let bucket = MemoryBucket::existing("vars");

    let err = sync(&env, &bucket).upload().await.unwrap_err();

    assert!(matches!(err, Error::Yaml(_)), "got {:?}", err);
    assert!(bucket.keys().is_empty());
}

#[tokio::test]
async fn test_download_round_trips_uploaded_content() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", COMMON_VARS_YAML);
    let bucket = MemoryBucket::missing("vars");
    let sync = sync(&env, &bucket);
    sync.upload().await.unwrap();

    std::fs::remove_file(env.path("common_vars.yaml")).unwrap();
    assert!(sync.download().await.unwrap());

    let downloaded = ConfigDocument::parse(&env.read("common_vars.yaml")).unwrap();
    let original = ConfigDocument::parse(COMMON_VARS_YAML).unwrap();
    assert_eq!(downloaded.root(), original.root());
}

#[tokio::test]
async fn test_download_overwrites_local_file() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", "workspace: stale\n");
    let bucket = MemoryBucket::existing("vars");
    bucket.put("stage/common_vars.yaml", "workspace: fresh\n");

    assert!(sync(&env, &bucket).download().await.unwrap());
    assert_eq!(env.read("common_vars.yaml"), "workspace: fresh\n");
}

#[tokio::test]
async fn test_download_absent_blob_is_noop() {
    let env = TestEnv::new();
    env.write("common_vars.yaml", "workspace: local\n");
    let bucket = MemoryBucket::existing("vars");

    assert!(!sync(&env, &bucket).download().await.unwrap());
    assert_eq!(env.read("common_vars.yaml"), "workspace: local\n");
}

#[tokio::test]
async fn test_download_ignores_common_vars_override() {
    let mut env = TestEnv::new();
    let elsewhere = env.write("other_vars.yaml", "workspace: other\n");
    env.config.paths.common_vars = Some(elsewhere);
    let bucket = MemoryBucket::existing("vars");
    bucket.put("stage/common_vars.yaml", "workspace: remote\n");

    let sync = sync(&env, &bucket);
    assert_eq!(sync.download_path(), env.path("common_vars.yaml").as_path());
    sync.download().await.unwrap();

    assert_eq!(env.read("common_vars.yaml"), "workspace: remote\n");
    assert_eq!(env.read("other_vars.yaml"), "workspace: other\n");
}

//! Shared test fixtures

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use workspace_vars::Config;

pub const COMMON_VARS_YAML: &str = r#"workspace: stage
storage:
  provider: gcp
k8s:
  abs:
    version: 0.3.0
    image-tag: v3
    storage-provider: pmem
asdb:
  version: "6.1"
"#;

/// A scratch environment directory named `stage`, laid out like a deployed
/// environment.
pub struct TestEnv {
    _root: TempDir,
    pub env_dir: PathBuf,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::named("stage")
    }

    pub fn named(name: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        let env_dir = root.path().join(name);
        std::fs::create_dir_all(env_dir.join("scripts")).unwrap();

        let mut config = Config::default();
        config.paths.env_dir = Some(env_dir.clone());

        Self {
            _root: root,
            env_dir,
            config,
        }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.env_dir.join(file)
    }

    pub fn write(&self, file: &str, content: &str) -> PathBuf {
        let path = self.path(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, file: &str) -> String {
        std::fs::read_to_string(self.path(file)).unwrap()
    }

    pub fn exists(&self, file: &str) -> bool {
        Path::new(&self.path(file)).exists()
    }
}

/// Workspace name that no other test uses.
pub fn unique_workspace() -> String {
    format!("ws-{}", nanoid::nanoid!(8))
}

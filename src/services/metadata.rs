//! Workspace metadata: common vars plus live infrastructure addresses
//!
//! `upload` publishes `<workspace>/common_vars.yaml` and
//! `<workspace>/metadata.yaml`, where the workspace is the `workspace` field
//! of the local common vars. `download` and `set_env` read them back for a
//! workspace named on the command line.

use super::{download_if_exists, ensure_bucket, fetch_required, upload_blob};
use crate::config::{Config, StorageConfig};
use crate::error::Result;
use crate::models::{
    BlobKey, COMMON_VARS_FILENAME, ConfigDocument, ENV_PROPERTIES_FILENAME, METADATA_FILENAME,
    Metadata, Properties, render_list,
};
use crate::providers::InfraOutputs;
use crate::providers::terragrunt::{parse_gateway, parse_node_ips};
use crate::storage::BucketStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const ASDB_NODE_IPS_OUTPUT: &str = "asdb_node_ips";
const GATEWAY_IP_OUTPUT: &str = "gateway_ip";

/// Which blobs a download found and wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetadataDownload {
    pub common_vars: bool,
    pub metadata: bool,
}

pub struct MetadataSync {
    store: Arc<dyn BucketStore>,
    infra: Arc<dyn InfraOutputs>,
    storage: StorageConfig,
    env_dir: PathBuf,
    common_vars_path: PathBuf,
}

impl MetadataSync {
    pub fn new(
        store: Arc<dyn BucketStore>,
        infra: Arc<dyn InfraOutputs>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            store,
            infra,
            storage: config.storage.clone(),
            env_dir: config.paths.env_dir()?,
            common_vars_path: config.paths.common_vars_path()?,
        })
    }

    /// Module directory holding the database nodes.
    pub fn asdb_module_dir(&self) -> PathBuf {
        self.env_dir.join("live").join("asdb")
    }

    /// Module directory holding the gateway.
    pub fn gateway_module_dir(&self) -> PathBuf {
        self.env_dir.join("live").join("k8s").join("gateway")
    }

    /// Properties are written next to the common vars, not in the cwd.
    pub fn properties_path(&self) -> PathBuf {
        self.env_dir.join(ENV_PROPERTIES_FILENAME)
    }

    pub fn env_dir(&self) -> &Path {
        &self.env_dir
    }

    /// Queries live addresses, then publishes common vars and metadata under
    /// the workspace named in the common vars. Returns that workspace.
    pub async fn upload(&self) -> Result<String> {
        tracing::info!(source = ?self.common_vars_path, "Reading common vars");
        let common_vars = ConfigDocument::load(&self.common_vars_path).await?;
        let workspace = common_vars.property_value("workspace")?;

        let metadata = self.collect_metadata().await?;
        tracing::info!(
            workspace = %workspace,
            nodes = metadata.asdb_ips.len(),
            gateway = %metadata.gw_ip,
            "Collected metadata"
        );

        let store = self.store.as_ref();
        ensure_bucket(store, &self.storage).await?;

        let common_vars_key = BlobKey::workspace_file(&workspace, COMMON_VARS_FILENAME)?;
        upload_blob(store, &common_vars_key, common_vars.to_yaml()?, self.storage.storage_class)
            .await?;

        let metadata_key = BlobKey::workspace_file(&workspace, METADATA_FILENAME)?;
        upload_blob(store, &metadata_key, metadata.to_yaml()?, self.storage.storage_class).await?;

        Ok(workspace)
    }

    async fn collect_metadata(&self) -> Result<Metadata> {
        let ips_raw = self
            .infra
            .output_json(&self.asdb_module_dir(), ASDB_NODE_IPS_OUTPUT)
            .await?;
        let asdb_ips = parse_node_ips(&ips_raw)?;

        let gateway_raw = self
            .infra
            .output_json(&self.gateway_module_dir(), GATEWAY_IP_OUTPUT)
            .await?;

        Ok(Metadata {
            asdb_ips,
            gw_ip: parse_gateway(&gateway_raw),
        })
    }

    /// Downloads both documents into the env dir. Each blob is optional.
    pub async fn download(&self, workspace: &str) -> Result<MetadataDownload> {
        let store = self.store.as_ref();

        let common_vars_key = BlobKey::workspace_file(workspace, COMMON_VARS_FILENAME)?;
        let common_vars = download_if_exists(
            store,
            &common_vars_key,
            &self.env_dir.join(COMMON_VARS_FILENAME),
        )
        .await?;

        let metadata_key = BlobKey::workspace_file(workspace, METADATA_FILENAME)?;
        let metadata =
            download_if_exists(store, &metadata_key, &self.env_dir.join(METADATA_FILENAME)).await?;

        Ok(MetadataDownload {
            common_vars,
            metadata,
        })
    }

    /// Writes `ASDB_IPS`, `GW_IP`, `STORAGE_PROVIDER`, `ABS_VERSION` and
    /// `ASDB_VERSION` for the workspace. Both blobs must exist.
    pub async fn set_env(&self, workspace: &str) -> Result<Properties> {
        let store = self.store.as_ref();

        let common_vars_key = BlobKey::workspace_file(workspace, COMMON_VARS_FILENAME)?;
        let common_vars =
            ConfigDocument::from_slice(&fetch_required(store, &common_vars_key, COMMON_VARS_FILENAME).await?)?;

        let metadata_key = BlobKey::workspace_file(workspace, METADATA_FILENAME)?;
        let metadata = Metadata::from_slice(&fetch_required(store, &metadata_key, METADATA_FILENAME).await?)?;

        let mut properties = Properties::new();
        properties.insert("ASDB_IPS", render_list(&metadata.asdb_ips));
        properties.insert("GW_IP", metadata.gw_ip);
        properties.insert("STORAGE_PROVIDER", common_vars.property_value("storage.provider")?);
        properties.insert("ABS_VERSION", common_vars.property_value("k8s.abs.version")?);
        properties.insert("ASDB_VERSION", common_vars.property_value("asdb.version")?);
        tracing::debug!(?properties, "Resolved env vars");

        let path = self.properties_path();
        tracing::info!(path = ?path, "Writing env vars");
        properties.write_to(&path).await?;
        Ok(properties)
    }
}

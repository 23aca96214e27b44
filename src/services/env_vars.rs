use super::fetch_required;
use crate::error::Result;
use crate::models::{BlobKey, COMMON_VARS_FILENAME, ConfigDocument, Properties};
use crate::storage::BucketStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ASDB_COMPONENT: &str = "asdb";
pub const ABS_COMPONENT: &str = "abs";

/// Writes component settings of a workspace to a properties file.
pub struct EnvVarExporter {
    store: Arc<dyn BucketStore>,
    properties_path: PathBuf,
}

impl EnvVarExporter {
    pub fn new(store: Arc<dyn BucketStore>, properties_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            properties_path: properties_path.into(),
        }
    }

    pub fn properties_path(&self) -> &Path {
        &self.properties_path
    }

    /// Reads `<workspace>/asdb/common_vars.yaml` and
    /// `<workspace>/abs/common_vars.yaml`, both of which must exist, and
    /// writes `ABS_STORAGE_PROVIDER`, `ABS_IMAGE_TAG` and `ASDB_VERSION`.
    pub async fn export(&self, workspace: &str) -> Result<Properties> {
        let asdb_vars = self.component_vars(workspace, ASDB_COMPONENT).await?;
        let abs_vars = self.component_vars(workspace, ABS_COMPONENT).await?;

        let mut properties = Properties::new();
        properties.insert(
            "ABS_STORAGE_PROVIDER",
            abs_vars.property_value("k8s.abs.storage-provider")?,
        );
        properties.insert("ABS_IMAGE_TAG", abs_vars.property_value("k8s.abs.image-tag")?);
        properties.insert("ASDB_VERSION", asdb_vars.property_value("asdb.version")?);

        tracing::info!(path = ?self.properties_path, "Writing env vars");
        properties.write_to(&self.properties_path).await?;
        Ok(properties)
    }

    async fn component_vars(&self, workspace: &str, component: &str) -> Result<ConfigDocument> {
        let key = BlobKey::component_file(workspace, component, COMMON_VARS_FILENAME)?;
        let label = format!("{} {}", component, COMMON_VARS_FILENAME);
        let data = fetch_required(self.store.as_ref(), &key, &label).await?;
        ConfigDocument::from_slice(&data)
    }
}

use crate::error::{Error, Result};
use crate::models::documents::COMMON_VARS_FILENAME;
use crate::models::storage_class::StorageClass;
use config::builder::{ConfigBuilder, DefaultState};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BUCKET_NAME: &str = "ecosys-workspace-vars";
pub const DEFAULT_PROJECT_ID: &str = "ecosystem-connectors-data";
pub const DEFAULT_REGION: &str = "me-west1";
pub const DEFAULT_ZONE: &str = "me-west1-a";
pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_ARTIFACT_BASE_URL: &str =
    "https://download.aerospike.com/artifacts/aerospike-server-enterprise";
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".tgz";
pub const DEFAULT_TERRAGRUNT_BIN: &str = "terragrunt";

/// Unprefixed variable names the deployment shell scripts already export,
/// mapped onto their configuration keys. These win over every other source.
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("STORAGE_BACKEND", "storage.backend"),
    ("BUCKET_NAME", "storage.bucket_name"),
    ("PROJECT_ID", "storage.project_id"),
    ("REGION", "storage.region"),
    ("ZONE", "storage.zone"),
    ("STORAGE_CLASS", "storage.storage_class"),
    ("GCS_ENDPOINT", "storage.gcs_endpoint"),
    ("GCS_ACCESS_TOKEN", "storage.gcs_access_token"),
    ("LOCAL_BUCKET_ROOT", "storage.local_root"),
    ("ARTIFACT_BASE_URL", "artifacts.base_url"),
    ("ARTIFACT_SUFFIX", "artifacts.suffix"),
    ("DISTRO", "artifacts.distro"),
    ("ARCH", "artifacts.arch"),
    ("ASDB_VERSION", "artifacts.version"),
    ("ENV_DIR", "paths.env_dir"),
    ("COMMON_VARS", "paths.common_vars"),
    ("TERRAGRUNT_BIN", "provisioning.terragrunt_bin"),
];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub storage: StorageConfig,
    pub artifacts: ArtifactConfig,
    pub paths: PathsConfig,
    pub provisioning: ProvisioningConfig,
}

/// Which object store implementation backs the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    #[default]
    Gcs,
    Local,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket_name: String,
    pub project_id: String,
    /// Location used when the bucket has to be created
    pub region: String,
    pub zone: String,
    pub storage_class: StorageClass,
    pub gcs_endpoint: String,
    #[serde(default, skip_serializing)]
    pub gcs_access_token: Option<SecretString>,
    /// Directory holding buckets when `backend` is `local`
    pub local_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactConfig {
    pub base_url: String,
    pub suffix: String,
    pub distro: Option<String>,
    pub arch: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PathsConfig {
    /// Environment directory; defaults to the parent of the executable's directory
    pub env_dir: Option<PathBuf>,
    /// Local common vars file; defaults to `<env_dir>/common_vars.yaml`
    pub common_vars: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvisioningConfig {
    pub terragrunt_bin: String,
}

impl Config {
    /// Load configuration from `.env`, `WORKSPACE_VARS__*` variables and the
    /// legacy unprefixed variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let builder = Self::defaults_builder()?.add_source(
            // e.g., WORKSPACE_VARS__STORAGE__BUCKET_NAME="my-bucket"
            config::Environment::with_prefix("WORKSPACE_VARS")
                .prefix_separator("__")
                .separator("__"),
        );

        Self::finish(builder, |name| std::env::var(name).ok())
    }

    /// Builds a configuration from defaults and a lookup of legacy variable
    /// names, without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::finish(Self::defaults_builder()?, lookup)
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder().add_source(config::Config::try_from(&Self::default())?))
    }

    fn finish<F>(mut builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in LEGACY_ENV_VARS {
            let value = lookup(var).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

impl PathsConfig {
    /// Resolves the environment directory.
    ///
    /// Tools are deployed as `<env_dir>/scripts/<tool>`, so without an explicit
    /// setting the grandparent of the executable is used.
    pub fn env_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.env_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        let exe = std::fs::canonicalize(&exe).unwrap_or(exe);
        exe.parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                Error::Validation(format!("Cannot derive environment directory from {:?}", exe))
            })
    }

    /// Name of the environment directory, used as a blob key prefix.
    pub fn env_dir_name(&self) -> Result<String> {
        let dir = self.env_dir()?;
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Validation(format!("Environment directory {:?} has no usable name", dir))
            })
    }

    /// Local common vars file read by uploads.
    pub fn common_vars_path(&self) -> Result<PathBuf> {
        match &self.common_vars {
            Some(path) => Ok(path.clone()),
            None => Ok(self.env_dir()?.join(COMMON_VARS_FILENAME)),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Gcs,
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            zone: DEFAULT_ZONE.to_string(),
            storage_class: StorageClass::Standard,
            gcs_endpoint: DEFAULT_GCS_ENDPOINT.to_string(),
            gcs_access_token: None,
            local_root: None,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARTIFACT_BASE_URL.to_string(),
            suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            distro: None,
            arch: None,
            version: None,
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            terragrunt_bin: DEFAULT_TERRAGRUNT_BIN.to_string(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Access token is skipped by serde
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}

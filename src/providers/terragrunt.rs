//! Provisioning tool outputs

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Reads outputs of provisioned infrastructure modules.
#[async_trait]
pub trait InfraOutputs: Send + Sync {
    /// Raw JSON printed for output `name` of the module in `module_dir`.
    async fn output_json(&self, module_dir: &Path, name: &str) -> Result<String>;
}

/// Runs `terragrunt output -json <name>` in a module directory.
#[derive(Debug, Clone)]
pub struct Terragrunt {
    binary: String,
}

impl Terragrunt {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl InfraOutputs for Terragrunt {
    async fn output_json(&self, module_dir: &Path, name: &str) -> Result<String> {
        tracing::info!(module = ?module_dir, output = name, "Reading terragrunt output");

        let output = Command::new(&self.binary)
            .arg("--working-dir")
            .arg(module_dir)
            .args(["output", "-terragrunt-log-level", "stderr", "-json", name])
            .output()
            .await
            .map_err(|e| Error::Process(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Process(format!(
                "{} output {} in {:?} exited with {}: {}",
                self.binary,
                name,
                module_dir,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::Process(format!("{} output {} is not UTF-8: {}", self.binary, name, e)))
    }
}

/// Parses a JSON array of node addresses.
pub fn parse_node_ips(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw.trim())?)
}

/// Unquotes a JSON string output such as `"10.0.0.5"\n`.
pub fn parse_gateway(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

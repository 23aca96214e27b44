//! Command-line surfaces of the four tools
//!
//! Every tool treats "no flag given" as a successful no-op, and the flags of
//! one tool are mutually exclusive.

use crate::error::{Error, Result};
use clap::{ArgGroup, Parser};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "common-vars", about = "Sync the environment's common_vars.yaml with the bucket")]
#[command(group(ArgGroup::new("action").args(["upload", "download"])))]
pub struct CommonVarsArgs {
    /// Upload common-vars
    #[arg(long)]
    pub upload: bool,

    /// Download common-vars
    #[arg(long)]
    pub download: bool,
}

#[derive(Debug, Parser)]
#[command(name = "set-env-vars", about = "Export component settings of a workspace to env.properties")]
pub struct SetEnvVarsArgs {
    /// Workspace whose asdb and abs common vars are read
    #[arg(long, value_name = "NAME")]
    pub workspace: Option<String>,
}

#[derive(Debug, Parser)]
#[command(name = "asdb-download-url", about = "Print the server archive URL for a distro and architecture")]
pub struct AsdbDownloadUrlArgs {
    /// Distro substring, overrides DISTRO
    #[arg(long)]
    pub distro: Option<String>,

    /// Architecture substring, overrides ARCH
    #[arg(long)]
    pub arch: Option<String>,

    /// Server version, overrides ASDB_VERSION
    #[arg(long = "asdb-version", value_name = "VERSION")]
    pub asdb_version: Option<String>,
}

#[derive(Debug, Parser)]
#[command(name = "metadata", about = "Publish, download or export workspace metadata")]
#[command(group(ArgGroup::new("action").args(["upload", "download", "set_env"])))]
pub struct MetadataArgs {
    /// Upload metadata
    #[arg(long)]
    pub upload: bool,

    /// Download common vars and metadata of a workspace
    #[arg(long, value_name = "WORKSPACE")]
    pub download: Option<String>,

    /// Write env.properties for a workspace
    #[arg(long = "set-env", value_name = "WORKSPACE")]
    pub set_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataAction {
    Upload,
    Download(String),
    SetEnv(String),
}

impl MetadataArgs {
    /// Picks the requested action. An explicitly empty workspace is an error,
    /// so a shell passing an unset variable fails instead of doing nothing.
    pub fn action(&self) -> Result<Option<MetadataAction>> {
        if self.upload {
            return Ok(Some(MetadataAction::Upload));
        }

        match (self.download.as_deref(), self.set_env.as_deref()) {
            (Some(""), None) | (None, Some("")) => {
                Err(Error::Validation("Workspace is not set".to_string()))
            }
            (Some(workspace), _) if !workspace.is_empty() => {
                Ok(Some(MetadataAction::Download(workspace.to_string())))
            }
            (_, Some(workspace)) if !workspace.is_empty() => {
                Ok(Some(MetadataAction::SetEnv(workspace.to_string())))
            }
            _ => Ok(None),
        }
    }
}

impl SetEnvVarsArgs {
    /// The workspace to export, if one was given.
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref().filter(|w| !w.is_empty())
    }
}

/// Reports the outcome of a tool run and turns it into the exit status.
pub fn finish(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::from(&e)
        }
    }
}

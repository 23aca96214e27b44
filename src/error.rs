use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// The custom error type for the utilities.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed invocation or a missing required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required remote blob does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No listed artifact matched the requested distro and architecture.
    #[error("No matching artifact for distro '{distro}' and arch '{arch}' in version {version}")]
    NoMatchingArtifact {
        distro: String,
        arch: String,
        version: String,
    },

    /// A document lacks a field the utility needs.
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// An error originating from the YAML (de)serializer.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error originating from the JSON (de)serializer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An HTTP transport failure or a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An object store request failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The provisioning tool could not be run or exited unsuccessfully.
    #[error("Process error: {0}")]
    Process(String),

    /// A local file could not be read or written.
    #[error("Failed to access {path:?}: {source}")]
    LocalFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub fn local_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LocalFile {
            path: path.into(),
            source,
        }
    }

    /// Maps each error kind onto a process exit status (sysexits numbering).
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Validation(_) => 64,
            Error::NoMatchingArtifact { .. } => 65,
            Error::MissingField(_) => 65,
            Error::Yaml(_) => 65,
            Error::Json(_) => 65,
            Error::NotFound(_) => 66,
            Error::Http(_) => 69,
            Error::Storage(_) => 69,
            Error::Process(_) => 70,
            Error::LocalFile { .. } => 74,
            Error::Io(_) => 74,
            Error::Config(_) => 78,
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(e: &Error) -> Self {
        ExitCode::from(e.exit_code())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}

//! Synchronization of deployment configuration with an object storage bucket.
//!
//! Four tools share this library:
//! - `common-vars` uploads or downloads an environment's `common_vars.yaml`
//! - `set-env-vars` exports component settings of a workspace to `env.properties`
//! - `metadata` publishes live infrastructure addresses next to the common vars
//! - `asdb-download-url` resolves a server archive URL from the vendor listing

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};

/// Load configuration from `.env` and environment variables
pub fn load_config() -> Result<Config> {
    Config::load()
}

//! Blob key layout inside the bucket

use crate::error::{Error, Result};
use std::fmt;

/// A `/`-separated blob key such as `<workspace>/abs/common_vars.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Joins segments with `/`. Empty segments are rejected so a blank
    /// workspace can never collapse onto the bucket root.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts = Vec::new();
        for segment in segments {
            let segment = segment.as_ref().trim_matches('/');
            if segment.trim().is_empty() {
                return Err(Error::Validation("Blob key segment cannot be empty".to_string()));
            }
            parts.push(segment.to_string());
        }

        if parts.is_empty() {
            return Err(Error::Validation("Blob key cannot be empty".to_string()));
        }

        Ok(Self(parts.join("/")))
    }

    /// `<workspace>/<filename>`
    pub fn workspace_file(workspace: &str, filename: &str) -> Result<Self> {
        Self::new([workspace, filename])
    }

    /// `<workspace>/<component>/<filename>`
    pub fn component_file(workspace: &str, component: &str, filename: &str) -> Result<Self> {
        Self::new([workspace, component, filename])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

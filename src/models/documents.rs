//! YAML documents synchronized with the bucket

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

pub const COMMON_VARS_FILENAME: &str = "common_vars.yaml";
pub const METADATA_FILENAME: &str = "metadata.yaml";

/// A free-form YAML document such as `common_vars.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Reads and parses a local YAML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::local_file(path, e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::new(serde_yaml::from_str(content)?))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(serde_yaml::from_slice(bytes)?))
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Looks up a nested field by dotted path, e.g. `k8s.abs.image-tag`.
    ///
    /// Keys are matched literally per segment, so dashes and underscores are
    /// significant.
    pub fn lookup(&self, path: &str) -> Result<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current
                .as_mapping()
                .and_then(|m| m.get(segment))
                .ok_or_else(|| Error::MissingField(path.to_string()))?;
        }
        Ok(current)
    }

    /// Looks up a field and renders it the way properties files expect.
    pub fn property_value(&self, path: &str) -> Result<String> {
        render_value(self.lookup(path)?)
            .ok_or_else(|| Error::MissingField(format!("{} (a mapping, not a value)", path)))
    }
}

/// Runtime facts discovered from the provisioned infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "asdb-ips")]
    pub asdb_ips: Vec<String>,
    #[serde(rename = "gw-ip")]
    pub gw_ip: String,
}

impl Metadata {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

/// Renders a value for a `KEY=VALUE` line in the literal form the deployment
/// scripts already read: strings verbatim, `True`/`False`, `None`, and
/// sequences as `['a', 'b']`. A mapping has no line form.
pub fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Mapping(_) => None,
        Value::Tagged(tagged) => render_value(&tagged.value),
        other => Some(literal(other)),
    }
}

/// Bracketed list of quoted strings, e.g. `['10.0.0.1', '10.0.0.2']`.
pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<String> = items.iter().map(|item| quote(item.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", literal(k), literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => literal(&tagged.value),
    }
}

/// Single-quoted unless the text holds a `'` and no `"`.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

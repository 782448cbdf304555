//! ARM deployment parameter-file extraction.
//!
//! Reads the standard `{ "parameters": { "name": { "value": ... } } }` file
//! and exposes a key → value lookup used to default missing CLI identifiers
//! (firewall policy name, IP-group resource group).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read parameter file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse parameter file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ParameterFile {
    #[serde(default)]
    parameters: BTreeMap<String, ParameterEntry>,
}

#[derive(Debug, Deserialize)]
struct ParameterEntry {
    #[serde(default)]
    value: Option<Value>,
}

/// Key → value mapping extracted from a parameter file. Lookups are
/// case-insensitive, matching ARM's handling of parameter names.
#[derive(Debug, Clone, Default)]
pub struct TemplateParameters {
    values: BTreeMap<String, Value>,
}

impl TemplateParameters {
    pub fn load(path: &Path) -> Result<Self, ParamsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: ParameterFile =
            serde_json::from_str(&raw).map_err(|source| ParamsError::Json {
                path: path.display().to_string(),
                source,
            })?;

        let values = file
            .parameters
            .into_iter()
            .filter_map(|(key, entry)| entry.value.map(|value| (key, value)))
            .collect();
        Ok(Self { values })
    }

    /// Return the string value under `key`, if present.
    pub fn string_value(&self, key: &str) -> Option<String> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_str())
            .map(ToString::to_string)
    }
}

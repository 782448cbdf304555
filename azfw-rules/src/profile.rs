use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Tunable validation bounds: priority range and protocol sets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationProfile {
    #[serde(default = "default_priority_min")]
    pub priority_min: i64,
    #[serde(default = "default_priority_max")]
    pub priority_max: i64,
    #[serde(default = "default_application_protocol_types")]
    pub application_protocol_types: Vec<String>,
    #[serde(default = "default_network_protocols")]
    pub network_protocols: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a validation profile and report where it came from
/// (`embedded` or `file:<path>`).
pub fn load_profile(path: Option<&Path>) -> Result<(ValidationProfile, String), ProfileError> {
    let Some(path) = path else {
        return Ok((embedded_profile(), "embedded".to_string()));
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let profile = toml::from_str(&raw).map_err(|source| ProfileError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok((profile, format!("file:{}", path.display())))
}

fn embedded_profile() -> ValidationProfile {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/default.toml"));
    toml::from_str(raw).unwrap_or_else(|_| ValidationProfile {
        priority_min: default_priority_min(),
        priority_max: default_priority_max(),
        application_protocol_types: default_application_protocol_types(),
        network_protocols: default_network_protocols(),
    })
}

fn default_priority_min() -> i64 {
    100
}

fn default_priority_max() -> i64 {
    65000
}

fn default_application_protocol_types() -> Vec<String> {
    vec!["Http".to_string(), "Https".to_string(), "Mssql".to_string()]
}

fn default_network_protocols() -> Vec<String> {
    vec![
        "Any".to_string(),
        "TCP".to_string(),
        "UDP".to_string(),
        "ICMP".to_string(),
    ]
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// A pre-filled form value from the profile table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Integer(value) => write!(f, "{}", value),
            ProfileValue::Text(value) => f.write_str(value),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Prediction endpoint the form is POSTed to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds; none means the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Field values used to pre-fill the form
    #[serde(default)]
    pub profile: BTreeMap<String, ProfileValue>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/predict".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
            profile: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::shared::constants::REQUIRED_ATTRIBUTES;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required attributes in Video Replay Configuration: {}", .0.join(", "))]
    MissingAttributes(Vec<String>),
    #[error("invalid Video Replay Configuration: {0}")]
    InvalidAttributes(#[source] serde_json::Error),
}

/// A component entry from the host's robot configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            model: None,
            attributes,
        }
    }
}

/// Attributes understood by the replay camera. Other keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayConfig {
    pub video_path: PathBuf,
}

impl ReplayConfig {
    /// Checks that every required attribute is present.
    ///
    /// Returns the implicit dependencies of the component, of which the
    /// replay camera has none.
    pub fn validate(attributes: &Map<String, Value>) -> Result<Vec<String>, ConfigError> {
        let missing: Vec<String> = REQUIRED_ATTRIBUTES
            .iter()
            .filter(|attr| !attributes.contains_key(**attr))
            .map(|attr| attr.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingAttributes(missing));
        }
        Ok(Vec::new())
    }

    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, ConfigError> {
        Self::validate(attributes)?;
        serde_json::from_value(Value::Object(attributes.clone()))
            .map_err(ConfigError::InvalidAttributes)
    }
}

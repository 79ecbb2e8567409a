//! Container configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options applied by a [`crate::FieldContainer`] when models are defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerConfig {
    /// Derive snake_case storage names from attribute names that have none.
    pub underscored: bool,

    /// Reject associations whose target model is not defined when they are
    /// wired, instead of failing later at resolve time.
    pub strict_associations: bool,
}

impl ContainerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set snake_case storage naming.
    pub fn underscored(mut self, on: bool) -> Self {
        self.underscored = on;
        self
    }

    /// Set strict association checking.
    pub fn strict_associations(mut self, on: bool) -> Self {
        self.strict_associations = on;
        self
    }

    /// Parse a JSON configuration. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

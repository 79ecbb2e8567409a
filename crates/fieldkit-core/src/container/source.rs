//! Sources of model definitions for [`crate::FieldContainer::import`].

use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{Association, FieldDescriptor};
use crate::error::Result;
use crate::json;
use crate::registry::NamedFieldRegistry;

/// A model as declared by a source, before it is registered.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    /// Model name.
    pub name: String,
    /// Attribute descriptors keyed by attribute name.
    pub attributes: BTreeMap<String, FieldDescriptor>,
    /// Associations, wired once every model of the batch is registered.
    pub associations: Vec<Association>,
}

impl ModelDefinition {
    /// Create an empty definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            associations: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.attributes.insert(name.into(), field);
        self
    }

    /// Add an association.
    pub fn with_association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }
}

/// Anything that can produce a batch of model definitions.
pub trait ModelSource {
    /// Produce the definitions.
    fn into_definitions(self) -> Result<Vec<ModelDefinition>>;
}

impl ModelSource for Vec<ModelDefinition> {
    fn into_definitions(self) -> Result<Vec<ModelDefinition>> {
        Ok(self)
    }
}

/// Model document in JSON, with `$template` names looked up in a registry.
pub struct JsonModelSource<'r> {
    document: serde_json::Value,
    registry: &'r NamedFieldRegistry,
}

impl<'r> JsonModelSource<'r> {
    /// Wrap an already parsed document.
    pub fn new(document: serde_json::Value, registry: &'r NamedFieldRegistry) -> Self {
        Self { document, registry }
    }

    /// Parse a document from a string.
    pub fn from_json_str(content: &str, registry: &'r NamedFieldRegistry) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(content)?, registry))
    }

    /// Read a document from a file.
    pub fn from_path(path: impl AsRef<Path>, registry: &'r NamedFieldRegistry) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, registry)
    }
}

impl ModelSource for JsonModelSource<'_> {
    fn into_definitions(self) -> Result<Vec<ModelDefinition>> {
        json::parse_models(&self.document, self.registry)
    }
}

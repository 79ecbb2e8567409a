//! Model definitions: attribute maps plus outgoing associations.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::association::Association;
use super::descriptor::{FieldDescriptor, FieldProperties};
use crate::error::{Error, Result};

/// A model as seen by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    /// Model name (unique within a container).
    pub name: String,
    /// Attribute descriptors keyed by attribute name.
    pub attributes: BTreeMap<String, Arc<FieldDescriptor>>,
    /// Associations keyed by association name.
    pub associations: BTreeMap<String, Association>,
}

impl ModelDef {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            associations: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.attributes.insert(name.into(), Arc::new(field));
        self
    }

    /// Add several attributes.
    pub fn with_attributes<I, K>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldDescriptor)>,
        K: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, f)| (k.into(), Arc::new(f))));
        self
    }

    /// Add an association.
    pub fn with_association(mut self, association: Association) -> Self {
        self.associations
            .insert(association.name.clone(), association);
        self
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.attributes.get(name)
    }

    /// Get an association by name.
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// Copy an attribute with `overrides` applied. Fails with `UnknownField`
    /// when the attribute does not exist.
    pub fn derive_field(&self, attribute: &str, overrides: &FieldProperties) -> Result<FieldDescriptor> {
        self.attribute(attribute)
            .map(|field| field.with_overrides(overrides))
            .ok_or_else(|| Error::UnknownField {
                model: self.name.clone(),
                field: attribute.to_string(),
            })
    }
}

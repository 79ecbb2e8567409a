//! Registry of models and the entry points for spec resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use convert_case::{Case, Casing};
use tracing::{debug, warn};

use super::config::ContainerConfig;
use super::source::{ModelDefinition, ModelSource};
use crate::catalog::{Association, FieldDescriptor, FieldProperties, ModelDef};
use crate::error::{Error, Result};
use crate::resolve::{FieldNode, ModelGraph, ResolvedNode, Resolver};

/// Owns model definitions and resolves specs against them.
///
/// Models are only ever added. Once setup is done the container is shared
/// read-only; it is `Send + Sync` and needs no locking.
#[derive(Debug, Clone, Default)]
pub struct FieldContainer {
    config: ContainerConfig,
    models: BTreeMap<String, ModelDef>,
}

impl FieldContainer {
    /// Create an empty container with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container with `config`.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            models: BTreeMap::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Define a model from its attributes.
    pub fn define<I, K>(&mut self, name: impl Into<String>, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, FieldDescriptor)>,
        K: Into<String>,
    {
        self.define_model(ModelDef::new(name).with_attributes(attributes))
    }

    /// Define a model, including any associations it already carries.
    ///
    /// Association targets are not checked here; use [`Self::associate`] or
    /// [`Self::import`] when strict checking matters.
    pub fn define_model(&mut self, mut model: ModelDef) -> Result<()> {
        if self.models.contains_key(&model.name) {
            return Err(Error::DuplicateModel(model.name));
        }

        for (key, field) in model.attributes.iter_mut() {
            if field.field_name.is_none() {
                let storage = self.storage_name(key);
                Arc::make_mut(field).field_name = Some(storage);
            }
        }

        debug!(
            model = %model.name,
            attributes = model.attributes.len(),
            associations = model.associations.len(),
            "defined model"
        );
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    /// Wire an association onto an already defined model.
    pub fn associate(&mut self, model: &str, association: Association) -> Result<()> {
        if self.config.strict_associations && !self.models.contains_key(&association.target) {
            warn!(
                model,
                association = %association.name,
                target = %association.target,
                "association target is not defined"
            );
            return Err(Error::UnknownAssociation {
                model: model.to_string(),
                association: association.name,
                target: association.target,
            });
        }

        let source = self
            .models
            .get_mut(model)
            .ok_or_else(|| Error::UnknownModel(model.to_string()))?;
        debug!(
            model,
            association = %association.name,
            target = %association.target,
            kind = ?association.kind,
            "wired association"
        );
        source
            .associations
            .insert(association.name.clone(), association);
        Ok(())
    }

    /// Import a batch of models.
    ///
    /// Nothing is registered if any model is already defined, appears twice
    /// in the batch, or (in strict mode) associates with an unknown model.
    /// Associations are wired after every model of the batch is registered,
    /// so models may reference each other in any order.
    pub fn import(&mut self, source: impl ModelSource) -> Result<Vec<String>> {
        let definitions = source.into_definitions()?;
        self.check_batch(&definitions)?;

        let mut names = Vec::with_capacity(definitions.len());
        let mut pending = Vec::new();
        for definition in definitions {
            let ModelDefinition {
                name,
                attributes,
                associations,
            } = definition;
            self.define(name.clone(), attributes)?;
            pending.push((name.clone(), associations));
            names.push(name);
        }

        for (model, associations) in pending {
            for association in associations {
                self.associate(&model, association)?;
            }
        }

        debug!(count = names.len(), "imported models");
        Ok(names)
    }

    fn check_batch(&self, definitions: &[ModelDefinition]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for definition in definitions {
            if self.models.contains_key(&definition.name) || !seen.insert(definition.name.as_str()) {
                return Err(Error::DuplicateModel(definition.name.clone()));
            }
        }

        if self.config.strict_associations {
            for definition in definitions {
                for association in &definition.associations {
                    let known = self.models.contains_key(&association.target)
                        || seen.contains(association.target.as_str());
                    if !known {
                        warn!(
                            model = %definition.name,
                            association = %association.name,
                            target = %association.target,
                            "association target is not defined"
                        );
                        return Err(Error::UnknownAssociation {
                            model: definition.name.clone(),
                            association: association.name.clone(),
                            target: association.target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy one attribute of `model` with `overrides` applied.
    pub fn field(&self, model: &str, attribute: &str, overrides: FieldProperties) -> Result<FieldDescriptor> {
        self.models
            .get(model)
            .ok_or_else(|| Error::UnknownModel(model.to_string()))?
            .derive_field(attribute, &overrides)
    }

    /// Resolve `spec` with `model` as the root scope.
    pub fn group(&self, model: &str, spec: &FieldNode) -> Result<ResolvedNode> {
        if !self.models.contains_key(model) {
            return Err(Error::UnknownModel(model.to_string()));
        }
        Resolver::new(self).resolve(model, spec)
    }

    /// Get a model by name.
    pub fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }

    /// Defined model names, sorted.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of defined models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if no model is defined.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn storage_name(&self, attribute: &str) -> String {
        if self.config.underscored {
            attribute.to_case(Case::Snake)
        } else {
            attribute.to_string()
        }
    }
}

impl ModelGraph for FieldContainer {
    fn model(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }
}

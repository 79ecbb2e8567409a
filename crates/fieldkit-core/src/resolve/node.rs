//! Spec trees and their resolved form.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{FieldDescriptor, FieldProperties};

/// Placeholder for "the attribute already defined on the model, with these
/// overrides". Only lives inside unresolved specs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelfReference {
    /// Model to read from instead of the one in scope.
    pub model: Option<String>,
    /// Attribute to read instead of the spec key.
    pub attribute: Option<String>,
    /// Properties applied to the copied attribute.
    pub overrides: FieldProperties,
}

impl SelfReference {
    /// Read from an explicit model.
    pub fn in_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Read a differently named attribute.
    pub fn from_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Reference the attribute of the same name on the model in scope.
pub fn this() -> FieldNode {
    FieldNode::This(SelfReference::default())
}

/// Like [`this`], with overrides.
pub fn this_with(overrides: FieldProperties) -> FieldNode {
    FieldNode::This(SelfReference {
        overrides,
        ..SelfReference::default()
    })
}

/// Reference the attribute of the same name on an explicitly named model.
pub fn this_in(model: impl Into<String>, overrides: FieldProperties) -> FieldNode {
    FieldNode::This(SelfReference {
        model: Some(model.into()),
        attribute: None,
        overrides,
    })
}

/// One node of an unresolved spec.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    /// A finished descriptor, passed through untouched.
    Field(Arc<FieldDescriptor>),
    /// A self-reference to resolve against a model.
    This(SelfReference),
    /// One shape repeated for every element of a collection.
    Repeat(Box<FieldNode>),
    /// Named children.
    Group(BTreeMap<String, FieldNode>),
}

impl FieldNode {
    /// Build a group from `(key, node)` pairs.
    pub fn group<I, K, N>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, N)>,
        K: Into<String>,
        N: Into<FieldNode>,
    {
        FieldNode::Group(
            children
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        )
    }

    /// Wrap a shape as a repeated element template.
    pub fn repeat(node: impl Into<FieldNode>) -> Self {
        FieldNode::Repeat(Box::new(node.into()))
    }

    /// Check if this node is a finished descriptor.
    pub fn is_descriptor(&self) -> bool {
        matches!(self, FieldNode::Field(_))
    }

    /// Check if this node is a self-reference.
    pub fn is_self_reference(&self) -> bool {
        matches!(self, FieldNode::This(_))
    }
}

impl From<FieldDescriptor> for FieldNode {
    fn from(field: FieldDescriptor) -> Self {
        FieldNode::Field(Arc::new(field))
    }
}

impl From<Arc<FieldDescriptor>> for FieldNode {
    fn from(field: Arc<FieldDescriptor>) -> Self {
        FieldNode::Field(field)
    }
}

impl From<SelfReference> for FieldNode {
    fn from(reference: SelfReference) -> Self {
        FieldNode::This(reference)
    }
}

/// A resolved spec: only descriptors, repeats and groups remain.
///
/// Serialises as the descriptor, a one-element array or an object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedNode {
    /// A descriptor.
    Field(Arc<FieldDescriptor>),
    /// Repeated element template.
    Repeat([Box<ResolvedNode>; 1]),
    /// Named children.
    Group(BTreeMap<String, ResolvedNode>),
}

impl ResolvedNode {
    /// The descriptor, if this is a leaf.
    pub fn as_field(&self) -> Option<&Arc<FieldDescriptor>> {
        match self {
            ResolvedNode::Field(field) => Some(field),
            _ => None,
        }
    }

    /// The children, if this is a group.
    pub fn as_group(&self) -> Option<&BTreeMap<String, ResolvedNode>> {
        match self {
            ResolvedNode::Group(children) => Some(children),
            _ => None,
        }
    }

    /// The element template, if this is a repeat.
    pub fn as_repeat(&self) -> Option<&ResolvedNode> {
        match self {
            ResolvedNode::Repeat([inner]) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Child by key, if this is a group.
    pub fn get(&self, key: &str) -> Option<&ResolvedNode> {
        self.as_group().and_then(|children| children.get(key))
    }

    /// Descriptor of a direct child field.
    pub fn field(&self, key: &str) -> Option<&Arc<FieldDescriptor>> {
        self.get(key).and_then(ResolvedNode::as_field)
    }
}

//! Fieldkit Core - Typed field descriptors for ORM model definitions.
//!
//! This crate provides:
//! - a descriptor factory ([`Field`]) that attaches default validation rules
//!   to every kind of attribute;
//! - a registry of named templates ([`NamedFieldRegistry`]);
//! - self-references ([`this`]) that copy attributes already defined on a
//!   model, resolved across associations by a [`FieldContainer`].
//!
//! ```
//! use fieldkit_core::{this, Field, FieldContainer, FieldNode, FieldProperties};
//!
//! let mut container = FieldContainer::new();
//! container
//!     .define("libro", [
//!         ("titulo", Field::string_of_length(10, FieldProperties::new()).unwrap()),
//!         ("precio", Field::float(FieldProperties::new())),
//!     ])
//!     .unwrap();
//!
//! let body = FieldNode::group([
//!     ("titulo", this()),
//!     ("precio", fieldkit_core::this_with(FieldProperties::new().allow_null(true))),
//! ]);
//! let resolved = container.group("libro", &body).unwrap();
//! assert_eq!(resolved.field("precio").unwrap().allow_null, Some(true));
//! ```

pub mod catalog;
pub mod container;
pub mod error;
pub mod json;
pub mod registry;
pub mod resolve;
pub mod validation;
pub mod value;

pub use catalog::{
    Association, AssociationKind, Field, FieldDescriptor, FieldKind, FieldProperties, ModelDef,
};
pub use container::{ContainerConfig, FieldContainer, JsonModelSource, ModelDefinition, ModelSource};
pub use error::{ElementValidationError, Error, Result};
pub use registry::NamedFieldRegistry;
pub use resolve::{this, this_in, this_with, FieldNode, ModelGraph, ResolvedNode, Resolver, SelfReference};
pub use validation::{ElementValidator, Rule, ValidationRules, ValidationSpec};
pub use value::Value;

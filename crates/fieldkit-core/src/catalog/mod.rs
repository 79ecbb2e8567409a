//! Field descriptors, kinds and model definitions.
//!
//! Descriptors are built through [`Field`] and collected into [`ModelDef`]s,
//! which the resolver reads through the [`crate::resolve::ModelGraph`] trait.

mod association;
mod descriptor;
mod factory;
mod model;
mod types;

pub use association::{Association, AssociationKind};
pub use descriptor::{FieldDescriptor, FieldProperties};
pub use factory::{Field, DEFAULT_PRIMARY_KEY_COLUMN};
pub use model::ModelDef;
pub use types::{FieldKind, DEFAULT_STRING_LENGTH, FLOAT_MAX, INT32_MAX, INT32_MIN};

//! Model containers.
//!
//! A [`FieldContainer`] owns a set of model definitions and resolves group
//! specs against them. Models arrive through [`FieldContainer::define`] or in
//! bulk through a [`ModelSource`].

mod config;
mod field_container;
mod source;

pub use config::ContainerConfig;
pub use field_container::FieldContainer;
pub use source::{JsonModelSource, ModelDefinition, ModelSource};

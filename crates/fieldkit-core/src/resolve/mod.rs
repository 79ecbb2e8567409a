//! Self-reference resolution.
//!
//! A spec is a tree of [`FieldNode`]s mixing finished descriptors with
//! self-references ([`this`]). The [`Resolver`] walks it against a
//! [`ModelGraph`], following associations to decide which model each nested
//! level refers to, and produces a [`ResolvedNode`] tree of descriptors.

mod node;
mod resolver;

pub use node::{this, this_in, this_with, FieldNode, ResolvedNode, SelfReference};
pub use resolver::{ModelGraph, Resolver};

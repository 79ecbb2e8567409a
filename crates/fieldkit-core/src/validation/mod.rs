//! Validation rules attached to field descriptors.
//!
//! Every kind has a closed table of default rules. Callers can layer their own
//! rules on top or switch validation off entirely.

mod element;
mod rules;
mod synthesize;

pub use element::ElementValidator;
pub(crate) use rules::deserialize_validation_spec;
pub use rules::{Rule, ValidationRules, ValidationSpec};
pub use synthesize::{default_rules, synthesize};

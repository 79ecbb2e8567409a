//! Default rule synthesis.

use super::rules::{Rule, ValidationRules, ValidationSpec};
use crate::catalog::{FieldKind, FLOAT_MAX, INT32_MAX};
use crate::value::Value;

/// Default rules for a kind.
pub fn default_rules(kind: &FieldKind) -> ValidationRules {
    match kind {
        FieldKind::Integer => ValidationRules::new()
            .with("isInt", Rule::flag(true))
            .with("min", Rule::arg(0))
            .with("max", Rule::arg(INT32_MAX)),
        FieldKind::Float => ValidationRules::new()
            .with("isFloat", Rule::flag(true))
            .with("min", Rule::arg(0.0))
            .with("max", Rule::arg(FLOAT_MAX)),
        FieldKind::String { length } => {
            ValidationRules::new().with("len", Rule::args([0, i64::from(*length)]))
        }
        FieldKind::Enum { values } => ValidationRules::new().with(
            "isIn",
            Rule::arg(Value::List(values.iter().map(|v| Value::from(v.as_str())).collect())),
        ),
        FieldKind::Array { element } => {
            ValidationRules::new().with("isArray", Rule::each((**element).clone()))
        }
        FieldKind::Boolean => ValidationRules::new().with("isBoolean", Rule::flag(true)),
        FieldKind::Date => ValidationRules::new().with("isDate", Rule::flag(true)),
        FieldKind::Uuid => ValidationRules::new().with("isUUID", Rule::arg(4)),
        FieldKind::Text | FieldKind::Custom { .. } => ValidationRules::new(),
    }
}

/// Build the final rule map for a field.
///
/// Precedence, lowest first: the kind's defaults, `base` (rules a constructor
/// forces, such as `min = 1` for primary keys), then the caller's `custom`
/// rules. Returns `None` when the caller disabled validation.
pub fn synthesize(
    kind: &FieldKind,
    base: Option<&ValidationRules>,
    custom: &ValidationSpec,
) -> Option<ValidationRules> {
    if custom.is_disabled() {
        return None;
    }

    let mut rules = default_rules(kind);
    if let Some(base) = base {
        rules.merge(base);
    }
    if let ValidationSpec::Custom(custom) = custom {
        rules.merge(custom);
    }
    Some(rules)
}

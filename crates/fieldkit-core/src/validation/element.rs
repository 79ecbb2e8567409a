//! Per-element validation for array fields.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::{FieldKind, INT32_MAX, INT32_MIN};
use crate::error::ElementValidationError;
use crate::value::Value;

/// Checks every element of an array value against one element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementValidator {
    element: FieldKind,
}

impl ElementValidator {
    /// Create a validator for arrays of `element`.
    pub fn new(element: FieldKind) -> Self {
        Self { element }
    }

    /// The element kind being enforced.
    pub fn element(&self) -> &FieldKind {
        &self.element
    }

    /// Validate a slice of elements, reporting the first one that fails.
    pub fn check(&self, values: &[Value]) -> Result<(), ElementValidationError> {
        for (index, value) in values.iter().enumerate() {
            if let Err(reason) = check_element(&self.element, value) {
                return Err(ElementValidationError::new(
                    index,
                    value.clone(),
                    self.element.to_string(),
                    reason,
                ));
            }
        }
        Ok(())
    }

    /// Validate a whole value, which must be a list.
    pub fn check_value(&self, value: &Value) -> Result<(), ElementValidationError> {
        match value.as_list() {
            Some(items) => self.check(items),
            None => Err(ElementValidationError::new(
                0,
                value.clone(),
                format!("ARRAY({})", self.element),
                format!("expected a list, got {}", value.type_name()),
            )),
        }
    }
}

fn check_element(kind: &FieldKind, value: &Value) -> Result<(), String> {
    match (kind, value) {
        (FieldKind::Integer, Value::Int(i)) => {
            if (INT32_MIN..=INT32_MAX).contains(i) {
                Ok(())
            } else {
                Err(format!("must be between {INT32_MIN} and {INT32_MAX}"))
            }
        }
        (FieldKind::Float, Value::Int(_) | Value::Float(_)) => Ok(()),
        (FieldKind::String { length }, Value::String(s)) => {
            let chars = s.chars().count();
            if chars <= *length as usize {
                Ok(())
            } else {
                Err(format!("must be at most {length} characters, got {chars}"))
            }
        }
        (FieldKind::Text, Value::String(_)) => Ok(()),
        (FieldKind::Boolean, Value::Bool(_)) => Ok(()),
        (FieldKind::Date, Value::String(s)) => {
            if DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
            {
                Ok(())
            } else {
                Err("must be an RFC 3339 timestamp or a YYYY-MM-DD date".to_string())
            }
        }
        (FieldKind::Uuid, Value::String(s)) => uuid::Uuid::parse_str(s)
            .map(|_| ())
            .map_err(|e| format!("must be a UUID ({e})")),
        (FieldKind::Enum { values }, Value::String(s)) => {
            if values.iter().any(|v| v == s) {
                Ok(())
            } else {
                Err(format!("must be one of {}", values.join(", ")))
            }
        }
        (FieldKind::Array { element }, Value::List(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_element(element, item).map_err(|reason| format!("element {i}: {reason}"))?;
            }
            Ok(())
        }
        (FieldKind::Custom { .. }, _) => Ok(()),
        (kind, value) => Err(format!(
            "expected a {} value, got {}",
            kind.key().to_lowercase(),
            value.type_name()
        )),
    }
}

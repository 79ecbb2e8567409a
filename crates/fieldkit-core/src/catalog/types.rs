//! Field kinds understood by the descriptor factory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length used by string fields when none is given.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Upper bound of 32-bit integer columns, independent of platform width.
pub const INT32_MAX: i64 = i32::MAX as i64;

/// Lower bound of 32-bit integer columns.
pub const INT32_MIN: i64 = i32::MIN as i64;

/// Upper bound applied to float columns by default.
pub const FLOAT_MAX: f64 = 1.0e308;

fn default_length() -> u32 {
    DEFAULT_STRING_LENGTH
}

/// Storage kind of a field.
///
/// Serialised internally tagged on `type`, e.g. `{"type": "STRING", "length": 10}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum FieldKind {
    /// 32-bit signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Bounded string.
    String {
        /// Maximum number of characters.
        #[serde(default = "default_length")]
        length: u32,
    },
    /// Unbounded text.
    Text,
    /// Boolean.
    Boolean,
    /// Date or timestamp.
    Date,
    /// UUID.
    Uuid,
    /// Closed set of string values.
    Enum {
        /// Allowed values.
        values: Vec<String>,
    },
    /// Homogeneous array.
    Array {
        /// Kind of every element.
        element: Box<FieldKind>,
    },
    /// Application-defined kind the factory knows nothing about.
    Custom {
        /// Type name handed to the ORM.
        name: String,
    },
}

impl FieldKind {
    /// Create a string kind, rejecting negative or oversized lengths.
    pub fn string(length: i64) -> Result<Self> {
        let length = u32::try_from(length).map_err(|_| {
            Error::InvalidArgument(format!("string length must be between 0 and {}, got {length}", u32::MAX))
        })?;
        Ok(FieldKind::String { length })
    }

    /// Create an enum kind. The value list must not be empty.
    pub fn enumeration<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = FieldKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        };
        kind.check()?;
        Ok(kind)
    }

    /// Create an array kind over a valid element kind.
    pub fn array(element: FieldKind) -> Result<Self> {
        element.check()?;
        Ok(FieldKind::Array {
            element: Box::new(element),
        })
    }

    /// Create a custom kind.
    pub fn custom(name: impl Into<String>) -> Self {
        FieldKind::Custom { name: name.into() }
    }

    /// Check invariants that the type system cannot express, which matters for
    /// kinds that arrive through deserialisation.
    pub fn check(&self) -> Result<()> {
        match self {
            FieldKind::Enum { values } if values.is_empty() => Err(Error::InvalidArgument(
                "enum fields need at least one value".to_string(),
            )),
            FieldKind::Array { element } => element.check(),
            FieldKind::Custom { name } if name.trim().is_empty() => Err(Error::InvalidArgument(
                "custom kinds need a type name".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// ORM type key (`INTEGER`, `STRING`, ...), without parameters.
    pub fn key(&self) -> &str {
        match self {
            FieldKind::Integer => "INTEGER",
            FieldKind::Float => "FLOAT",
            FieldKind::String { .. } => "STRING",
            FieldKind::Text => "TEXT",
            FieldKind::Boolean => "BOOLEAN",
            FieldKind::Date => "DATE",
            FieldKind::Uuid => "UUID",
            FieldKind::Enum { .. } => "ENUM",
            FieldKind::Array { .. } => "ARRAY",
            FieldKind::Custom { name } => name,
        }
    }

    /// String length, if this is a bounded string.
    pub fn length(&self) -> Option<u32> {
        match self {
            FieldKind::String { length } => Some(*length),
            _ => None,
        }
    }

    /// Element kind, if this is an array.
    pub fn element(&self) -> Option<&FieldKind> {
        match self {
            FieldKind::Array { element } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String { length } => write!(f, "STRING({length})"),
            FieldKind::Enum { values } => {
                write!(f, "ENUM(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{value}'")?;
                }
                write!(f, ")")
            }
            FieldKind::Array { element } => write!(f, "ARRAY({element})"),
            other => f.write_str(other.key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_checks() {
        assert_eq!(FieldKind::Integer.key(), "INTEGER");
        assert_eq!(FieldKind::custom("JSONB").key(), "JSONB");
        assert_eq!(FieldKind::string(10).unwrap().length(), Some(10));
    }

    #[test]
    fn test_negative_length_rejected() {
        let err = FieldKind::string(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_enum_rejected() {
        let err = FieldKind::enumeration(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let status = FieldKind::enumeration(["A", "B"]).unwrap();
        assert_eq!(status.to_string(), "ENUM('A', 'B')");
    }

    #[test]
    fn test_array_kind() {
        let tags = FieldKind::array(FieldKind::string(5).unwrap()).unwrap();
        assert_eq!(tags.to_string(), "ARRAY(STRING(5))");
        assert_eq!(tags.element(), Some(&FieldKind::String { length: 5 }));

        let bad = FieldKind::Enum { values: vec![] };
        assert!(FieldKind::array(bad).is_err());
    }

    #[test]
    fn test_serde_shape() {
        let kind: FieldKind = serde_json::from_str(r#"{"type": "STRING"}"#).unwrap();
        assert_eq!(kind, FieldKind::String { length: 255 });

        let kind: FieldKind =
            serde_json::from_str(r#"{"type": "ARRAY", "element": {"type": "INTEGER"}}"#).unwrap();
        assert_eq!(kind.to_string(), "ARRAY(INTEGER)");

        let json = serde_json::to_value(FieldKind::custom("GEOMETRY")).unwrap();
        assert_eq!(json["type"], "CUSTOM");
        assert_eq!(json["name"], "GEOMETRY");
    }
}

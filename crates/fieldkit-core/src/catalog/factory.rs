//! Descriptor constructors, one per kind.

use tracing::trace;

use super::descriptor::{FieldDescriptor, FieldProperties};
use super::types::{FieldKind, DEFAULT_STRING_LENGTH};
use crate::error::Result;
use crate::validation::{synthesize, Rule, ValidationRules};

/// Storage column used by primary keys that do not name one.
pub const DEFAULT_PRIMARY_KEY_COLUMN: &str = "id";

/// Descriptor factory.
///
/// Every constructor synthesises the kind's default validation, layers the
/// caller's rules over it and copies the remaining properties across.
pub struct Field;

impl Field {
    /// Build a descriptor of any kind.
    pub fn of_kind(kind: FieldKind, props: FieldProperties) -> Result<FieldDescriptor> {
        kind.check()?;
        Ok(build(kind, None, &props))
    }

    /// Auto-incrementing integer primary key.
    ///
    /// `primaryKey`, `autoIncrement` and `allowNull` are forced to
    /// `true`/`true`/`false` whatever `props` says; the result can still be
    /// changed afterwards with [`Field::clone_of`].
    pub fn primary_key(props: FieldProperties) -> FieldDescriptor {
        let base = ValidationRules::new().with("min", Rule::arg(1));
        let mut field = build(FieldKind::Integer, Some(&base), &props);
        field.primary_key = true;
        field.auto_increment = true;
        field.allow_null = Some(false);
        if field.field_name.is_none() {
            field.field_name = Some(DEFAULT_PRIMARY_KEY_COLUMN.to_string());
        }
        field
    }

    /// 32-bit integer.
    pub fn integer(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Integer, None, &props)
    }

    /// Floating point number.
    pub fn float(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Float, None, &props)
    }

    /// String with the default length of 255.
    pub fn string(props: FieldProperties) -> FieldDescriptor {
        build(
            FieldKind::String {
                length: DEFAULT_STRING_LENGTH,
            },
            None,
            &props,
        )
    }

    /// String with an explicit length. Negative lengths are rejected.
    pub fn string_of_length(length: i64, props: FieldProperties) -> Result<FieldDescriptor> {
        Ok(build(FieldKind::string(length)?, None, &props))
    }

    /// Unbounded text.
    pub fn text(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Text, None, &props)
    }

    /// Boolean.
    pub fn boolean(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Boolean, None, &props)
    }

    /// Date or timestamp.
    pub fn date(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Date, None, &props)
    }

    /// UUID.
    pub fn uuid(props: FieldProperties) -> FieldDescriptor {
        build(FieldKind::Uuid, None, &props)
    }

    /// Enumerated set of values. An empty set is rejected.
    pub fn enumeration<I, S>(values: I, props: FieldProperties) -> Result<FieldDescriptor>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(build(FieldKind::enumeration(values)?, None, &props))
    }

    /// Array of `element`.
    pub fn array(element: FieldKind, props: FieldProperties) -> Result<FieldDescriptor> {
        Ok(build(FieldKind::array(element)?, None, &props))
    }

    /// Application-defined kind without default rules.
    pub fn custom(name: impl Into<String>, props: FieldProperties) -> Result<FieldDescriptor> {
        Self::of_kind(FieldKind::custom(name), props)
    }

    /// Deep copy of `existing` with `overrides` applied. `existing` is untouched.
    pub fn clone_of(existing: &FieldDescriptor, overrides: FieldProperties) -> FieldDescriptor {
        existing.with_overrides(&overrides)
    }
}

fn build(kind: FieldKind, base: Option<&ValidationRules>, props: &FieldProperties) -> FieldDescriptor {
    let validation = synthesize(&kind, base, &props.validation);
    trace!(kind = %kind, validated = validation.is_some(), "building field descriptor");

    let mut field = FieldDescriptor::bare(kind);
    props.apply_structural(&mut field);
    field.validation = validation;
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Value;

    #[test]
    fn test_primary_key_defaults() {
        let field = Field::primary_key(FieldProperties::new());

        assert_eq!(field.kind, FieldKind::Integer);
        assert!(field.primary_key);
        assert!(field.auto_increment);
        assert_eq!(field.allow_null, Some(false));
        assert_eq!(field.storage_name(), Some("id"));

        let rules = field.validation.unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.get("isInt"), Some(&Rule::Flag(true)));
        assert_eq!(rules.get("min"), Some(&Rule::arg(1)));
        assert_eq!(rules.get("max"), Some(&Rule::arg(2_147_483_647i64)));
    }

    #[test]
    fn test_primary_key_flags_not_overridable_by_props() {
        let props = FieldProperties::new()
            .allow_null(true)
            .primary_key(false)
            .comment("ID field")
            .no_validation();
        let field = Field::primary_key(props);

        assert!(field.primary_key);
        assert_eq!(field.allow_null, Some(false));
        assert_eq!(field.comment.as_deref(), Some("ID field"));
        assert!(field.validation.is_none());

        let relaxed = Field::clone_of(&field, FieldProperties::new().allow_null(true));
        assert_eq!(relaxed.allow_null, Some(true));
    }

    #[test]
    fn test_string_lengths() {
        let field = Field::string_of_length(10, FieldProperties::new()).unwrap();
        assert_eq!(field.kind.length(), Some(10));
        assert_eq!(
            field.rule("len").unwrap().arguments(),
            Some(&[Value::Int(0), Value::Int(10)][..])
        );

        let field = Field::string(FieldProperties::new().comment("x"));
        assert_eq!(field.kind.length(), Some(255));
        assert_eq!(field.comment.as_deref(), Some("x"));

        let field = Field::string_of_length(10, FieldProperties::new().no_validation()).unwrap();
        assert!(field.validation.is_none());

        let err = Field::string_of_length(-5, FieldProperties::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_disabled_validation_for_every_kind() {
        let off = || FieldProperties::new().no_validation();
        let fields = vec![
            Field::primary_key(off()),
            Field::integer(off()),
            Field::float(off()),
            Field::string(off()),
            Field::text(off()),
            Field::boolean(off()),
            Field::date(off()),
            Field::uuid(off()),
            Field::enumeration(["A"], off()).unwrap(),
            Field::array(FieldKind::Integer, off()).unwrap(),
            Field::custom("GEOMETRY", off()).unwrap(),
        ];
        for field in fields {
            assert!(field.validation.is_none(), "{} kept validation", field.kind);
        }
    }

    #[test]
    fn test_enum_rules_and_errors() {
        let field = Field::enumeration(
            ["ACTIVE", "INACTIVE"],
            FieldProperties::new().default_value("ACTIVE"),
        )
        .unwrap();
        assert_eq!(
            field.rule("isIn"),
            Some(&Rule::arg(Value::from(vec!["ACTIVE", "INACTIVE"])))
        );
        assert_eq!(field.default_value, Some(Value::from("ACTIVE")));

        let err = Field::enumeration(Vec::<&str>::new(), FieldProperties::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_custom_rules_override_defaults() {
        let field = Field::integer(
            FieldProperties::new().validate(ValidationRules::new().with("min", Rule::arg(1))),
        );
        assert_eq!(field.rule("min"), Some(&Rule::arg(1)));
        assert_eq!(field.rule("isInt"), Some(&Rule::Flag(true)));
    }

    #[test]
    fn test_array_element_check() {
        let field = Field::array(FieldKind::string(5).unwrap(), FieldProperties::new()).unwrap();

        assert!(field.check_elements(&[Value::from("ok"), Value::from("no")]).is_ok());
        let err = field
            .check_elements(&[Value::from("ok"), Value::from("toolongstring")])
            .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.expected, "STRING(5)");

        let err = Field::array(FieldKind::Enum { values: vec![] }, FieldProperties::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_clone_of_is_deep() {
        let original = Field::float(FieldProperties::new());
        let mut copy = Field::clone_of(&original, FieldProperties::new().allow_null(false));
        if let Some(rules) = copy.validation.as_mut() {
            rules.insert("max", Rule::arg(10.0));
        }

        assert_eq!(original.allow_null, None);
        assert_eq!(original.rule("max"), Some(&Rule::arg(1.0e308)));
        assert_eq!(copy.allow_null, Some(false));
        assert_eq!(copy.rule("max"), Some(&Rule::arg(10.0)));
    }
}

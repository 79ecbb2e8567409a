//! Field descriptors and the property bags used to build and override them.

use serde::{Deserialize, Serialize};

use super::types::FieldKind;
use crate::error::ElementValidationError;
use crate::validation::{deserialize_validation_spec, ValidationRules, ValidationSpec};
use crate::value::Value;

/// A fully specified model attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Storage kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Part of the primary key.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    /// Value generated by the database.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub auto_increment: bool,
    /// Nullability. `None` leaves the ORM default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_null: Option<bool>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Column comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Sample value for generated documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Storage column name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Validation rules; `None` means validation is disabled.
    #[serde(rename = "validate")]
    pub validation: Option<ValidationRules>,
}

impl FieldDescriptor {
    /// A descriptor of `kind` with no properties and no validation.
    pub(crate) fn bare(kind: FieldKind) -> Self {
        Self {
            kind,
            primary_key: false,
            auto_increment: false,
            allow_null: None,
            default_value: None,
            comment: None,
            example: None,
            field_name: None,
            validation: None,
        }
    }

    /// Copy this descriptor and apply `overrides` to the copy.
    pub fn with_overrides(&self, overrides: &FieldProperties) -> Self {
        let mut copy = self.clone();
        copy.apply(overrides);
        copy
    }

    /// Apply `overrides` in place.
    ///
    /// Present properties replace the current ones. Custom validation rules
    /// merge key-wise into the existing map; disabled validation drops it.
    pub fn apply(&mut self, overrides: &FieldProperties) {
        overrides.apply_structural(self);
        match &overrides.validation {
            ValidationSpec::Defaults => {}
            ValidationSpec::Disabled => self.validation = None,
            ValidationSpec::Custom(rules) => match &mut self.validation {
                Some(existing) => existing.merge(rules),
                None => self.validation = Some(rules.clone()),
            },
        }
    }

    /// Check whether any validation applies.
    pub fn is_validated(&self) -> bool {
        self.validation.is_some()
    }

    /// Look up a validation rule.
    pub fn rule(&self, name: &str) -> Option<&crate::validation::Rule> {
        self.validation.as_ref().and_then(|rules| rules.get(name))
    }

    /// Storage column name, if one is set.
    pub fn storage_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// Run the array element check, if this descriptor carries one.
    ///
    /// Descriptors without an element rule accept any value.
    pub fn check_elements(&self, values: &[Value]) -> Result<(), ElementValidationError> {
        let validator = self
            .validation
            .as_ref()
            .and_then(|rules| rules.iter().find_map(|(_, rule)| rule.element_validator()));
        match validator {
            Some(validator) => validator.check(values),
            None => Ok(()),
        }
    }
}

/// Optional properties supplied when constructing, invoking or overriding a
/// descriptor. JSON keys are camelCase; `"validate": null` disables validation.
/// Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FieldProperties {
    /// Part of the primary key.
    pub primary_key: Option<bool>,
    /// Value generated by the database.
    pub auto_increment: Option<bool>,
    /// Nullability.
    pub allow_null: Option<bool>,
    /// Default value.
    pub default_value: Option<Value>,
    /// Column comment.
    pub comment: Option<String>,
    /// Sample value for generated documentation.
    pub example: Option<String>,
    /// Storage column name.
    pub field_name: Option<String>,
    /// Validation handling.
    #[serde(rename = "validate", deserialize_with = "deserialize_validation_spec")]
    pub validation: ValidationSpec,
}

impl FieldProperties {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary key flag.
    pub fn primary_key(mut self, on: bool) -> Self {
        self.primary_key = Some(on);
        self
    }

    /// Set the auto increment flag.
    pub fn auto_increment(mut self, on: bool) -> Self {
        self.auto_increment = Some(on);
        self
    }

    /// Set nullability.
    pub fn allow_null(mut self, on: bool) -> Self {
        self.allow_null = Some(on);
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the documentation example.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Set the storage column name.
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// Layer custom rules over the defaults.
    pub fn validate(mut self, rules: ValidationRules) -> Self {
        self.validation = ValidationSpec::Custom(rules);
        self
    }

    /// Disable validation.
    pub fn no_validation(mut self) -> Self {
        self.validation = ValidationSpec::Disabled;
        self
    }

    /// Check whether nothing would be overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply everything except validation.
    pub(crate) fn apply_structural(&self, target: &mut FieldDescriptor) {
        if let Some(on) = self.primary_key {
            target.primary_key = on;
        }
        if let Some(on) = self.auto_increment {
            target.auto_increment = on;
        }
        if let Some(on) = self.allow_null {
            target.allow_null = Some(on);
        }
        if let Some(value) = &self.default_value {
            target.default_value = Some(value.clone());
        }
        if let Some(comment) = &self.comment {
            target.comment = Some(comment.clone());
        }
        if let Some(example) = &self.example {
            target.example = Some(example.clone());
        }
        if let Some(name) = &self.field_name {
            target.field_name = Some(name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;

    fn sample() -> FieldDescriptor {
        let mut field = FieldDescriptor::bare(FieldKind::String { length: 10 });
        field.validation = Some(ValidationRules::new().with("len", Rule::args([0, 10])));
        field
    }

    #[test]
    fn test_with_overrides_leaves_source_alone() {
        let field = sample();
        let copy = field.with_overrides(&FieldProperties::new().allow_null(false).comment("Title"));

        assert_eq!(field.allow_null, None);
        assert_eq!(field.comment, None);
        assert_eq!(copy.allow_null, Some(false));
        assert_eq!(copy.comment.as_deref(), Some("Title"));
        assert_eq!(copy.validation, field.validation);
    }

    #[test]
    fn test_override_validation_merges() {
        let field = sample();
        let copy = field.with_overrides(
            &FieldProperties::new().validate(ValidationRules::new().with("notEmpty", Rule::flag(true))),
        );
        let rules = copy.validation.unwrap();
        assert!(rules.contains("len"));
        assert!(rules.contains("notEmpty"));
    }

    #[test]
    fn test_override_disables_validation() {
        let copy = sample().with_overrides(&FieldProperties::new().no_validation());
        assert!(!copy.is_validated());
    }

    #[test]
    fn test_properties_from_json() {
        let props: FieldProperties =
            serde_json::from_str(r#"{"allowNull": true, "fieldName": "book_title"}"#).unwrap();
        assert_eq!(props.allow_null, Some(true));
        assert_eq!(props.field_name.as_deref(), Some("book_title"));
        assert_eq!(props.validation, ValidationSpec::Defaults);

        let props: FieldProperties = serde_json::from_str(r#"{"validate": null}"#).unwrap();
        assert_eq!(props.validation, ValidationSpec::Disabled);

        let props: FieldProperties =
            serde_json::from_str(r#"{"validate": {"isEmail": true}}"#).unwrap();
        assert!(matches!(props.validation, ValidationSpec::Custom(ref r) if r.contains("isEmail")));

        assert!(serde_json::from_str::<FieldProperties>(r#"{"alowNull": true}"#).is_err());
    }

    #[test]
    fn test_descriptor_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "STRING");
        assert_eq!(json["length"], 10);
        assert_eq!(json["validate"]["len"]["args"], serde_json::json!([0, 10]));
        assert!(json.get("allowNull").is_none());
        assert!(json.get("primaryKey").is_none());
    }
}

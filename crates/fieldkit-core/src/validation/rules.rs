//! Validation rule maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::element::ElementValidator;
use crate::catalog::FieldKind;
use crate::value::Value;

/// A single rule invocation.
///
/// Bounds and other parameterised rules always carry an argument list, so
/// `min` is `{"args": [1]}` and never a bare `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    /// Switch a parameterless rule on or off (`isInt: true`).
    Flag(bool),
    /// Rule with arguments and an optional custom message.
    Args {
        /// Rule arguments.
        args: Vec<Value>,
        /// Message reported by the ORM when the rule fails.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        msg: Option<String>,
    },
    /// Per-element check applied to array values.
    Each {
        /// The element validator.
        each: ElementValidator,
    },
}

impl Rule {
    /// Create a flag rule.
    pub fn flag(on: bool) -> Self {
        Rule::Flag(on)
    }

    /// Create a rule with a single argument.
    pub fn arg(value: impl Into<Value>) -> Self {
        Rule::Args {
            args: vec![value.into()],
            msg: None,
        }
    }

    /// Create a rule with several arguments.
    pub fn args<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Rule::Args {
            args: values.into_iter().map(Into::into).collect(),
            msg: None,
        }
    }

    /// Create an element-checking rule over `element`.
    pub fn each(element: FieldKind) -> Self {
        Rule::Each {
            each: ElementValidator::new(element),
        }
    }

    /// Attach a failure message. Only argument rules carry one.
    pub fn with_msg(self, msg: impl Into<String>) -> Self {
        match self {
            Rule::Args { args, .. } => Rule::Args {
                args,
                msg: Some(msg.into()),
            },
            other => other,
        }
    }

    /// Arguments of an argument rule.
    pub fn arguments(&self) -> Option<&[Value]> {
        match self {
            Rule::Args { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Element validator of an element-checking rule.
    pub fn element_validator(&self) -> Option<&ElementValidator> {
        match self {
            Rule::Each { each } => Some(each),
            _ => None,
        }
    }
}

/// Rule name to rule mapping, ordered by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationRules(BTreeMap<String, Rule>);

impl ValidationRules {
    /// Create an empty rule map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing any rule of the same name.
    pub fn with(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Insert a rule, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.0.insert(name.into(), rule)
    }

    /// Remove a rule.
    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        self.0.remove(name)
    }

    /// Get a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.0.get(name)
    }

    /// Check whether a rule is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Key-wise merge: every rule in `other` replaces the same-named rule here.
    pub fn merge(&mut self, other: &ValidationRules) {
        for (name, rule) in &other.0 {
            self.0.insert(name.clone(), rule.clone());
        }
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.0.iter().map(|(name, rule)| (name.as_str(), rule))
    }
}

impl<K: Into<String>> FromIterator<(K, Rule)> for ValidationRules {
    fn from_iter<T: IntoIterator<Item = (K, Rule)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, rule)| (k.into(), rule)).collect())
    }
}

/// How the caller wants validation handled.
///
/// `Disabled` is distinct from an empty `Custom` map: the former drops every
/// default rule, the latter keeps them all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValidationSpec {
    /// Nothing given; use the kind's defaults.
    #[default]
    Defaults,
    /// Explicitly no validation at all.
    Disabled,
    /// Rules layered over the defaults.
    Custom(ValidationRules),
}

impl ValidationSpec {
    /// Check if validation is explicitly disabled.
    pub fn is_disabled(&self) -> bool {
        matches!(self, ValidationSpec::Disabled)
    }
}

impl From<ValidationRules> for ValidationSpec {
    fn from(rules: ValidationRules) -> Self {
        ValidationSpec::Custom(rules)
    }
}

/// Deserialise a present `validate` key: `null` disables, a map customises.
/// A missing key never reaches this function and stays `Defaults`.
pub(crate) fn deserialize_validation_spec<'de, D>(deserializer: D) -> Result<ValidationSpec, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ValidationRules>::deserialize(deserializer)? {
        Some(rules) => ValidationSpec::Custom(rules),
        None => ValidationSpec::Disabled,
    })
}

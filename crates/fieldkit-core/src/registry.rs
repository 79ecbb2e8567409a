//! Named descriptor templates.
//!
//! A [`NamedFieldRegistry`] maps short uppercase names to template descriptors.
//! Invoking a name returns a fresh copy of the template with overrides applied.
//! Callers normally own a registry; [`global`] offers a shared one pre-loaded
//! with the built-in templates.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::{Field, FieldDescriptor, FieldProperties};
use crate::error::{Error, Result};
use crate::validation::{Rule, ValidationRules};

static GLOBAL: OnceLock<RwLock<NamedFieldRegistry>> = OnceLock::new();

/// Process-wide registry, created with the built-in templates on first use.
///
/// Register custom templates before handing work to other threads; after
/// that only read locks are taken.
pub fn global() -> &'static RwLock<NamedFieldRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(NamedFieldRegistry::with_builtins()))
}

/// Registry of named descriptor templates.
#[derive(Debug, Clone, Default)]
pub struct NamedFieldRegistry {
    templates: BTreeMap<String, FieldDescriptor>,
}

impl NamedFieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in templates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, template) in builtin_templates() {
            registry.templates.insert(name.to_string(), template);
        }
        registry
    }

    /// Register a template.
    ///
    /// Names are never overwritten: registering a taken name fails with
    /// `DuplicateName` and the first template stays in place.
    pub fn register(&mut self, name: impl Into<String>, template: FieldDescriptor) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("template name must not be empty".to_string()));
        }
        if self.templates.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        debug!(name = %name, kind = %template.kind, "registered field template");
        self.templates.insert(name, template);
        Ok(())
    }

    /// Produce a copy of the named template with `overrides` applied.
    pub fn invoke(&self, name: &str, overrides: FieldProperties) -> Result<FieldDescriptor> {
        self.templates
            .get(name)
            .map(|template| Field::clone_of(template, overrides))
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// Get a template without copying it.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.templates.get(name)
    }

    /// Check whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn len_rule(min: i64, max: i64, msg: &str) -> ValidationRules {
    ValidationRules::new().with("len", Rule::args([min, max]).with_msg(msg))
}

fn min_rule(min: i64) -> ValidationRules {
    ValidationRules::new().with("min", Rule::arg(min))
}

fn builtin_templates() -> Vec<(&'static str, FieldDescriptor)> {
    let p = FieldProperties::new;
    let mut templates = vec![
        // Keys
        ("ID", Field::primary_key(p())),
        (
            "PK_INTEGER",
            Field::integer(p().primary_key(true).allow_null(false).validate(min_rule(1))),
        ),
        ("PK_UUID", Field::uuid(p().primary_key(true).allow_null(false))),
        // Audit columns
        ("_CREATED_AT", Field::date(p().comment("Creation time of the record."))),
        ("_UPDATED_AT", Field::date(p().comment("Last modification time of the record."))),
        ("_DELETED_AT", Field::date(p().comment("Deletion time of the record."))),
        ("_CREATED_USER", Field::integer(p().comment("ID of the user who created the record."))),
        ("_UPDATED_USER", Field::integer(p().comment("ID of the user who last modified the record."))),
        ("_DELETED_USER", Field::integer(p().comment("ID of the user who deleted the record."))),
        // Listing parameters
        (
            "FIELDS",
            Field::string(
                p().comment("Fields to return.")
                    .example("id,username,person(id,first_name)"),
            ),
        ),
        (
            "ORDER",
            Field::string(p().comment("Sort order of the result.").example("last_name,-first_name")),
        ),
        (
            "LIMIT",
            Field::integer(
                p().comment("Maximum number of records per page.")
                    .default_value(50)
                    .validate(min_rule(1)),
            ),
        ),
        (
            "PAGE",
            Field::integer(
                p().comment("Page number of a record listing.")
                    .default_value(1)
                    .validate(min_rule(1)),
            ),
        ),
        // Authentication
        (
            "BASIC_AUTHORIZATION",
            Field::text(
                p().comment("Access credentials. <code>Basic [username:password] base64</code>")
                    .example("Basic FDS234SF=="),
            ),
        ),
        (
            "BEARER_AUTHORIZATION",
            Field::text(
                p().comment("Access credentials. <code>Bearer [accessToken]</code>")
                    .example("Bearer s83hs7.sdf423.f23f"),
            ),
        ),
        ("ACCESS_TOKEN", Field::text(p().comment("Access token.").example("s83hs7.sdf423.f23f"))),
        ("REFRESH_TOKEN", Field::text(p().comment("Refresh token.").example("s83hs7.sdf423.f23f"))),
        ("TOKEN_EXPIRATION_DATE", Field::date(p().comment("Expiration date of the token."))),
        (
            "TOKEN_EXPIRE_IN",
            Field::date(p().comment("Token lifetime in seconds.").example("86400")),
        ),
        ("TOKEN_TYPE", Field::date(p().comment("Token type.").example("Bearer"))),
        // Misc
        (
            "EMAIL",
            Field::string(
                p().comment("Email address.")
                    .example("someone@example.com")
                    .validate(ValidationRules::new().with("isEmail", Rule::flag(true))),
            ),
        ),
    ];

    // These cannot fail: the value list and lengths are fixed.
    if let Ok(status) = Field::enumeration(
        ["ACTIVE", "INACTIVE", "DELETED"],
        p().comment("Lifecycle state of the record.").default_value("ACTIVE"),
    ) {
        templates.push(("_STATUS", status));
    }
    if let Ok(access_type) = Field::enumeration(
        ["offline", "online"],
        p().comment("Access type. <code>offline</code> also returns a refresh token.")
            .default_value("online"),
    ) {
        templates.push(("ACCESS_TYPE", access_type));
    }
    if let Ok(username) = Field::string_of_length(
        100,
        p().comment("User name.")
            .example("admin")
            .validate(len_rule(3, 100, "User names must be between 3 and 100 characters long.")),
    ) {
        templates.push(("USERNAME", username));
    }
    if let Ok(password) = Field::string_of_length(
        50,
        p().comment("User password.")
            .example("123")
            .validate(len_rule(3, 50, "Passwords must be between 3 and 50 characters long.")),
    ) {
        templates.push(("PASSWORD", password));
    }

    templates
}

//! JSON forms of field specs, group specs and model documents.
//!
//! Field spec: `{"$template": "EMAIL", "allowNull": false}` or
//! `{"type": "STRING", "length": 10, "comment": "..."}`.
//!
//! Group spec: objects are groups, a one-element array is a repeated shape,
//! `{"$this": {...}}` is a self-reference (optional `model` and `attribute`
//! keys, everything else is an override) and `{"$field": <field spec>}` is a
//! literal descriptor.
//!
//! Model document: `{"models": [{"name": ..., "attributes": {...},
//! "associations": [...]}]}`.

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::catalog::{
    Association, Field, FieldDescriptor, FieldKind, FieldProperties, DEFAULT_STRING_LENGTH,
};
use crate::container::ModelDefinition;
use crate::error::{Error, Result};
use crate::registry::NamedFieldRegistry;
use crate::resolve::{FieldNode, SelfReference};

/// Key selecting a registry template.
pub const TEMPLATE_KEY: &str = "$template";
/// Key marking a self-reference.
pub const THIS_KEY: &str = "$this";
/// Key marking a literal descriptor inside a group spec.
pub const FIELD_KEY: &str = "$field";

#[derive(Deserialize)]
struct ModelDocument {
    models: Vec<RawModel>,
}

#[derive(Deserialize)]
struct RawModel {
    name: String,
    #[serde(default)]
    attributes: Map<String, Json>,
    #[serde(default)]
    associations: Vec<Association>,
}

fn expect_object<'j>(json: &'j Json, what: &str) -> Result<&'j Map<String, Json>> {
    json.as_object()
        .ok_or_else(|| Error::InvalidArgument(format!("{what} must be a JSON object, got {json}")))
}

fn properties_from(map: Map<String, Json>) -> Result<FieldProperties> {
    Ok(serde_json::from_value(Json::Object(map))?)
}

/// Parse a field spec into a descriptor.
pub fn parse_field(json: &Json, registry: &NamedFieldRegistry) -> Result<FieldDescriptor> {
    let object = expect_object(json, "a field spec")?;

    if let Some(name) = object.get(TEMPLATE_KEY) {
        let name = name
            .as_str()
            .ok_or_else(|| Error::InvalidArgument(format!("{TEMPLATE_KEY} must be a string")))?;
        let mut rest = object.clone();
        rest.remove(TEMPLATE_KEY);
        return registry.invoke(name, properties_from(rest)?);
    }

    let kind = parse_kind(object)?;
    let mut rest = object.clone();
    rest.remove("type");
    if let Some(key) = parameter_key(&kind) {
        rest.remove(key);
    }
    Field::of_kind(kind, properties_from(rest)?)
}

fn parameter_key(kind: &FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::String { .. } => Some("length"),
        FieldKind::Enum { .. } => Some("values"),
        FieldKind::Array { .. } => Some("element"),
        FieldKind::Custom { .. } => Some("name"),
        _ => None,
    }
}

/// Read the kind part of a field spec. Malformed parameters (negative
/// lengths, non-list enum values, bad element kinds) are `InvalidArgument`.
fn parse_kind(object: &Map<String, Json>) -> Result<FieldKind> {
    let key = object
        .get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| Error::InvalidArgument("a field spec needs a string `type`".to_string()))?;

    match key {
        "INTEGER" => Ok(FieldKind::Integer),
        "FLOAT" => Ok(FieldKind::Float),
        "TEXT" => Ok(FieldKind::Text),
        "BOOLEAN" => Ok(FieldKind::Boolean),
        "DATE" => Ok(FieldKind::Date),
        "UUID" => Ok(FieldKind::Uuid),
        "STRING" => match object.get("length") {
            None | Some(Json::Null) => Ok(FieldKind::String {
                length: DEFAULT_STRING_LENGTH,
            }),
            Some(length) => {
                let length = length.as_i64().ok_or_else(|| {
                    Error::InvalidArgument(format!("string length must be an integer, got {length}"))
                })?;
                FieldKind::string(length)
            }
        },
        "ENUM" => {
            let values = object
                .get("values")
                .and_then(Json::as_array)
                .ok_or_else(|| Error::InvalidArgument("enum `values` must be a list".to_string()))?;
            let values = values
                .iter()
                .map(|value| {
                    value.as_str().map(str::to_string).ok_or_else(|| {
                        Error::InvalidArgument(format!("enum values must be strings, got {value}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            FieldKind::enumeration(values)
        }
        "ARRAY" => {
            let element = object
                .get("element")
                .ok_or_else(|| Error::InvalidArgument("array fields need an `element` kind".to_string()))?;
            FieldKind::array(parse_kind(expect_object(element, "an array element kind")?)?)
        }
        "CUSTOM" => {
            let name = object
                .get("name")
                .and_then(Json::as_str)
                .ok_or_else(|| Error::InvalidArgument("custom fields need a string `name`".to_string()))?;
            let kind = FieldKind::custom(name);
            kind.check()?;
            Ok(kind)
        }
        other => Err(Error::InvalidArgument(format!("unknown field type: {other}"))),
    }
}

/// Parse a group spec.
pub fn parse_node(json: &Json, registry: &NamedFieldRegistry) -> Result<FieldNode> {
    match json {
        Json::Array(items) => match items.as_slice() {
            [item] => Ok(FieldNode::repeat(parse_node(item, registry)?)),
            _ => Err(Error::InvalidArgument(format!(
                "repeated shapes take exactly one element, got {}",
                items.len()
            ))),
        },
        Json::Object(object) => {
            if let Some(reference) = object.get(THIS_KEY) {
                return parse_reference(reference).map(FieldNode::This);
            }
            if let Some(field) = object.get(FIELD_KEY) {
                return parse_field(field, registry).map(FieldNode::from);
            }
            if object.contains_key(TEMPLATE_KEY) {
                return parse_field(json, registry).map(FieldNode::from);
            }
            let children = object
                .iter()
                .map(|(key, child)| Ok((key.clone(), parse_node(child, registry)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(FieldNode::group(children))
        }
        other => Err(Error::InvalidArgument(format!(
            "unexpected value in group spec: {other}"
        ))),
    }
}

fn parse_reference(json: &Json) -> Result<SelfReference> {
    let mut rest = match json {
        Json::Null => Map::new(),
        other => expect_object(other, THIS_KEY)?.clone(),
    };

    let mut take_name = |key: &str| -> Result<Option<String>> {
        match rest.remove(key) {
            None | Some(Json::Null) => Ok(None),
            Some(Json::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::InvalidArgument(format!(
                "{THIS_KEY}.{key} must be a string, got {other}"
            ))),
        }
    };
    let model = take_name("model")?;
    let attribute = take_name("attribute")?;

    Ok(SelfReference {
        model,
        attribute,
        overrides: properties_from(rest)?,
    })
}

/// Parse a model document into definitions.
pub fn parse_models(json: &Json, registry: &NamedFieldRegistry) -> Result<Vec<ModelDefinition>> {
    let document: ModelDocument = serde_json::from_value(json.clone())?;
    document
        .models
        .into_iter()
        .map(|raw| {
            let mut definition = ModelDefinition::new(raw.name);
            for (key, spec) in &raw.attributes {
                definition = definition.with_attribute(key.clone(), parse_field(spec, registry)?);
            }
            for association in raw.associations {
                definition = definition.with_association(association);
            }
            Ok(definition)
        })
        .collect()
}

//! Integration tests for the JSON model source and group specs.

use std::io::Write;

use fieldkit_core::json::parse_node;
use fieldkit_core::{
    this, this_with, ContainerConfig, Error, FieldContainer, FieldNode, FieldProperties,
    JsonModelSource, NamedFieldRegistry, Value,
};
use serde_json::json;

const MODELS: &str = r#"{
    "models": [
        {
            "name": "libro",
            "attributes": {
                "id": {"$template": "ID"},
                "titulo": {"type": "STRING", "length": 10, "comment": "Book title."},
                "precio": {"type": "FLOAT", "validate": {"min": {"args": [1]}}},
                "tags": {"type": "ARRAY", "element": {"type": "STRING", "length": 5}}
            },
            "associations": [{"name": "autor", "target": "autor", "kind": "belongsTo"}]
        },
        {
            "name": "autor",
            "attributes": {
                "id": {"$template": "ID"},
                "nombreCompleto": {"type": "STRING"}
            },
            "associations": [{"name": "libros", "target": "libro", "kind": "hasMany"}]
        }
    ]
}"#;

fn write_models(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_import_from_file() {
    let file = write_models(MODELS);
    let registry = NamedFieldRegistry::with_builtins();
    let mut container = FieldContainer::with_config(ContainerConfig::new().underscored(true));

    let source = JsonModelSource::from_path(file.path(), &registry).unwrap();
    let names = container.import(source).unwrap();
    assert_eq!(names, vec!["libro", "autor"]);

    let precio = container.field("libro", "precio", FieldProperties::new()).unwrap();
    assert!(precio.rule("isFloat").is_some());
    assert_eq!(
        precio.rule("min").and_then(|rule| rule.arguments()),
        Some(&[Value::Int(1)][..])
    );

    let nombre = container
        .field("autor", "nombreCompleto", FieldProperties::new())
        .unwrap();
    assert_eq!(nombre.storage_name(), Some("nombre_completo"));
}

#[test]
fn test_json_spec_matches_built_spec() {
    let registry = NamedFieldRegistry::with_builtins();
    let mut container = FieldContainer::new();
    container
        .import(JsonModelSource::from_json_str(MODELS, &registry).unwrap())
        .unwrap();

    let from_json = parse_node(
        &json!({
            "titulo": {"$this": {}},
            "precio": {"$this": {"allowNull": true}},
            "autor": {
                "libros": [{"titulo": {"$this": {}}}]
            }
        }),
        &registry,
    )
    .unwrap();

    let built = FieldNode::group([
        ("titulo", this()),
        ("precio", this_with(FieldProperties::new().allow_null(true))),
        (
            "autor",
            FieldNode::group([(
                "libros",
                FieldNode::repeat(FieldNode::group([("titulo", this())])),
            )]),
        ),
    ]);

    assert_eq!(from_json, built);
    assert_eq!(
        container.group("libro", &from_json).unwrap(),
        container.group("libro", &built).unwrap()
    );
}

#[test]
fn test_resolved_json_output() {
    let registry = NamedFieldRegistry::with_builtins();
    let mut container = FieldContainer::new();
    container
        .import(JsonModelSource::from_json_str(MODELS, &registry).unwrap())
        .unwrap();

    let spec = parse_node(
        &json!({"tags": {"$this": {}}, "page": {"$template": "PAGE"}}),
        &registry,
    )
    .unwrap();
    let output = serde_json::to_value(container.group("libro", &spec).unwrap()).unwrap();

    assert_eq!(output["tags"]["type"], "ARRAY");
    assert_eq!(output["tags"]["element"]["length"], 5);
    assert_eq!(output["page"]["defaultValue"], 1);
    assert_eq!(output["page"]["validate"]["min"]["args"], json!([1]));
}

#[test]
fn test_broken_documents() {
    let registry = NamedFieldRegistry::with_builtins();

    let file = write_models("{\"models\": [");
    assert!(matches!(
        JsonModelSource::from_path(file.path(), &registry),
        Err(Error::Json(_))
    ));

    let mut container = FieldContainer::new();
    let source = JsonModelSource::from_json_str(
        r#"{"models": [{"name": "x", "attributes": {"a": {"$template": "NOPE"}}}]}"#,
        &registry,
    )
    .unwrap();
    assert!(matches!(container.import(source), Err(Error::UnknownName(_))));
    assert!(container.is_empty());
}

//! Recursive resolver over a model graph.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, trace};

use super::node::{FieldNode, ResolvedNode, SelfReference};
use crate::catalog::{FieldDescriptor, ModelDef};
use crate::error::{Error, Result};

/// Read-only view of models and their associations.
pub trait ModelGraph {
    /// Look up a model by name.
    fn model(&self, name: &str) -> Option<&ModelDef>;
}

impl ModelGraph for BTreeMap<String, ModelDef> {
    fn model(&self, name: &str) -> Option<&ModelDef> {
        self.get(name)
    }
}

impl ModelGraph for HashMap<String, ModelDef> {
    fn model(&self, name: &str) -> Option<&ModelDef> {
        self.get(name)
    }
}

/// Resolves specs against a model graph.
///
/// Scoping rules:
/// - a key holding a leaf (self-reference or descriptor, optionally inside a
///   repeat) names an attribute of the model in scope;
/// - a key holding a group descends into the association's target model when
///   the key is an association of the model in scope, and into no model
///   otherwise.
pub struct Resolver<'a, G: ModelGraph + ?Sized> {
    graph: &'a G,
}

impl<'a, G: ModelGraph + ?Sized> Resolver<'a, G> {
    /// Create a resolver over `graph`.
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Resolve `spec` with `root` as the model in scope at the top level.
    pub fn resolve(&self, root: &str, spec: &FieldNode) -> Result<ResolvedNode> {
        let model = self
            .graph
            .model(root)
            .ok_or_else(|| Error::UnknownModel(root.to_string()))?;
        debug!(model = root, "resolving spec");
        self.resolve_node(Some(model), None, spec)
    }

    fn resolve_node(
        &self,
        scope: Option<&'a ModelDef>,
        key: Option<&str>,
        node: &FieldNode,
    ) -> Result<ResolvedNode> {
        match node {
            FieldNode::This(reference) => {
                let field = self.resolve_reference(scope, key, reference)?;
                Ok(ResolvedNode::Field(Arc::new(field)))
            }
            FieldNode::Field(field) => Ok(ResolvedNode::Field(Arc::clone(field))),
            FieldNode::Repeat(inner) => {
                let resolved = self.resolve_node(scope, key, inner)?;
                Ok(ResolvedNode::Repeat([Box::new(resolved)]))
            }
            FieldNode::Group(children) => {
                let mut resolved = BTreeMap::new();
                for (child_key, child) in children {
                    let child_scope = if is_leaf(child) {
                        scope
                    } else {
                        self.association_scope(scope, child_key, child)?
                    };
                    let node = self.resolve_node(child_scope, Some(child_key), child)?;
                    resolved.insert(child_key.clone(), node);
                }
                Ok(ResolvedNode::Group(resolved))
            }
        }
    }

    fn resolve_reference(
        &self,
        scope: Option<&'a ModelDef>,
        key: Option<&str>,
        reference: &SelfReference,
    ) -> Result<FieldDescriptor> {
        let attribute = reference.attribute.as_deref().or(key).ok_or_else(|| {
            Error::InvalidArgument(
                "a self-reference outside a group needs an explicit attribute name".to_string(),
            )
        })?;

        let model = match &reference.model {
            Some(name) => self
                .graph
                .model(name)
                .ok_or_else(|| Error::UnknownModel(name.clone()))?,
            None => scope.ok_or_else(|| Error::MissingModelScope {
                attribute: attribute.to_string(),
            })?,
        };

        trace!(model = %model.name, attribute, "resolving self-reference");
        model.derive_field(attribute, &reference.overrides)
    }

    fn association_scope(
        &self,
        scope: Option<&'a ModelDef>,
        key: &str,
        node: &FieldNode,
    ) -> Result<Option<&'a ModelDef>> {
        let Some(model) = scope else {
            return Ok(None);
        };
        let Some(association) = model.association(key) else {
            return Ok(None);
        };

        let target = self
            .graph
            .model(&association.target)
            .ok_or_else(|| Error::UnknownAssociation {
                model: model.name.clone(),
                association: association.name.clone(),
                target: association.target.clone(),
            })?;
        let repeated = matches!(node, FieldNode::Repeat(_));
        if association.is_collection() != repeated {
            debug!(
                model = %model.name,
                association = key,
                kind = ?association.kind,
                repeated,
                "shape does not match association cardinality"
            );
        }
        trace!(from = %model.name, association = key, to = %target.name, "descending into association");
        Ok(Some(target))
    }
}

fn is_leaf(node: &FieldNode) -> bool {
    match node {
        FieldNode::Field(_) | FieldNode::This(_) => true,
        FieldNode::Repeat(inner) => is_leaf(inner),
        FieldNode::Group(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Association, Field, FieldProperties};
    use crate::resolve::{this, this_in, this_with};

    fn graph() -> BTreeMap<String, ModelDef> {
        let libro = ModelDef::new("libro")
            .with_attribute("id", Field::primary_key(FieldProperties::new()))
            .with_attribute(
                "titulo",
                Field::string_of_length(10, FieldProperties::new().field_name("title")).unwrap(),
            )
            .with_attribute("precio", Field::float(FieldProperties::new()))
            .with_association(Association::belongs_to("autor", "autor"));
        let autor = ModelDef::new("autor")
            .with_attribute("id", Field::primary_key(FieldProperties::new()))
            .with_attribute("nombre", Field::string(FieldProperties::new()))
            .with_association(Association::has_many("libros", "libro"));

        BTreeMap::from([("libro".to_string(), libro), ("autor".to_string(), autor)])
    }

    #[test]
    fn test_resolve_flat_spec() {
        let graph = graph();
        let spec = FieldNode::group([
            ("titulo", this()),
            ("precio", this_with(FieldProperties::new().allow_null(true))),
        ]);

        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        let titulo = resolved.field("titulo").unwrap();
        let precio = resolved.field("precio").unwrap();

        assert_eq!(titulo.allow_null, None);
        assert_eq!(titulo.storage_name(), Some("title"));
        assert_eq!(precio.allow_null, Some(true));
        assert_eq!(graph["libro"].attribute("precio").unwrap().allow_null, None);
    }

    #[test]
    fn test_descriptor_passes_through_by_identity() {
        let graph = graph();
        let literal = Arc::new(Field::boolean(FieldProperties::new()));
        let spec = FieldNode::group([("activo", FieldNode::Field(literal.clone()))]);

        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        assert!(Arc::ptr_eq(resolved.field("activo").unwrap(), &literal));
    }

    #[test]
    fn test_nested_associations() {
        let graph = graph();
        let spec = FieldNode::group([
            ("titulo", this()),
            (
                "autor",
                FieldNode::group([
                    ("nombre", this()),
                    (
                        "libros",
                        FieldNode::repeat(FieldNode::group([("titulo", this())])),
                    ),
                ]),
            ),
        ]);

        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        let autor = resolved.get("autor").unwrap();
        assert_eq!(autor.field("nombre").unwrap().kind.length(), Some(255));

        let libros = autor.get("libros").unwrap().as_repeat().unwrap();
        assert_eq!(libros.field("titulo").unwrap().kind.length(), Some(10));
    }

    #[test]
    fn test_plain_grouping_needs_model_hint() {
        let graph = graph();
        let spec = FieldNode::group([("meta", FieldNode::group([("precio", this())]))]);
        let err = Resolver::new(&graph).resolve("libro", &spec).unwrap_err();
        assert!(matches!(err, Error::MissingModelScope { ref attribute } if attribute == "precio"));

        let spec = FieldNode::group([(
            "meta",
            FieldNode::group([("precio", this_in("libro", FieldProperties::new()))]),
        )]);
        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        assert!(resolved.get("meta").unwrap().field("precio").is_some());
    }

    #[test]
    fn test_unknown_field_and_model() {
        let graph = graph();
        let spec = FieldNode::group([("isbn", this())]);
        let err = Resolver::new(&graph).resolve("libro", &spec).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref model, ref field } if model == "libro" && field == "isbn"));

        let err = Resolver::new(&graph).resolve("revista", &spec).unwrap_err();
        assert!(matches!(err, Error::UnknownModel(_)));

        let spec = FieldNode::group([("isbn", this_in("revista", FieldProperties::new()))]);
        let err = Resolver::new(&graph).resolve("libro", &spec).unwrap_err();
        assert!(matches!(err, Error::UnknownModel(ref m) if m == "revista"));
    }

    #[test]
    fn test_unknown_association_target() {
        let mut graph = graph();
        graph.remove("autor");
        let spec = FieldNode::group([("autor", FieldNode::group([("nombre", this())]))]);
        let err = Resolver::new(&graph).resolve("libro", &spec).unwrap_err();
        assert!(matches!(err, Error::UnknownAssociation { ref target, .. } if target == "autor"));
    }

    #[test]
    fn test_cardinality_mismatch_still_resolves() {
        let graph = graph();
        let spec = FieldNode::group([
            ("autor", FieldNode::repeat(FieldNode::group([("nombre", this())]))),
        ]);
        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        let autor = resolved.get("autor").unwrap().as_repeat().unwrap();
        assert!(autor.field("nombre").is_some());

        let spec = FieldNode::group([(
            "libros",
            FieldNode::group([("titulo", this())]),
        )]);
        let resolved = Resolver::new(&graph).resolve("autor", &spec).unwrap();
        assert_eq!(
            resolved.get("libros").unwrap().field("titulo").unwrap().kind.length(),
            Some(10)
        );
    }

    #[test]
    fn test_repeated_self_reference() {
        let graph = graph();
        let spec = FieldNode::group([("precio", FieldNode::repeat(this()))]);
        let resolved = Resolver::new(&graph).resolve("libro", &spec).unwrap();
        let inner = resolved.get("precio").unwrap().as_repeat().unwrap();
        assert!(inner.as_field().is_some());
    }

    #[test]
    fn test_root_self_reference_needs_attribute() {
        let graph = graph();
        let err = Resolver::new(&graph).resolve("libro", &this()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let reference = SelfReference::default().from_attribute("precio");
        let resolved = Resolver::new(&graph)
            .resolve("libro", &FieldNode::This(reference))
            .unwrap();
        assert!(resolved.as_field().is_some());
    }
}

//! Associations between models.

use serde::{Deserialize, Serialize};

/// Kind of association, as declared on the ORM model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssociationKind {
    /// Foreign key lives on the source model.
    BelongsTo,
    /// Foreign key lives on the target model, at most one row.
    HasOne,
    /// Foreign key lives on the target model, any number of rows.
    HasMany,
    /// Many-to-many through a join model.
    BelongsToMany,
}

/// A named association from one model to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Association name (the key used in nested specs).
    pub name: String,
    /// Target model name.
    pub target: String,
    /// Association kind.
    pub kind: AssociationKind,
}

impl Association {
    fn new(name: impl Into<String>, target: impl Into<String>, kind: AssociationKind) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind,
        }
    }

    /// Create a belongs-to association.
    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, AssociationKind::BelongsTo)
    }

    /// Create a has-one association.
    pub fn has_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, AssociationKind::HasOne)
    }

    /// Create a has-many association.
    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, AssociationKind::HasMany)
    }

    /// Create a belongs-to-many association.
    pub fn belongs_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, target, AssociationKind::BelongsToMany)
    }

    /// Check if the association yields a collection of target rows.
    pub fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            AssociationKind::HasMany | AssociationKind::BelongsToMany
        )
    }
}

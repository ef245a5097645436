//! Relationship descriptors.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Singular link to one target entity.
    ToOne,
    /// Plain collection of target entities (never auto-resolved).
    ToMany,
    /// Collection joined through an association table.
    ManyToMany,
}

impl RelationKind {
    /// Check if this is a singular link.
    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::ToOne)
    }

    /// Check if this is a join-table collection.
    pub fn is_join(&self) -> bool {
        matches!(self, Self::ManyToMany)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToOne => write!(f, "n:1"),
            Self::ToMany => write!(f, "1:n"),
            Self::ManyToMany => write!(f, "m:n"),
        }
    }
}

/// A relationship declared on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Relationship name (the attribute key it is set under).
    pub name: SmolStr,
    /// Target model name. For polymorphic relationships this is only the
    /// declared default; the concrete target is decided per instance.
    pub target: SmolStr,
    /// Cardinality.
    pub kind: RelationKind,
    /// Whether the concrete target type is decided at runtime by a sibling
    /// discriminator field.
    #[serde(default)]
    pub polymorphic: bool,
    /// Foreign-key column on this model (`{name}_id` when absent).
    #[serde(default)]
    pub fk_field: Option<SmolStr>,
    /// Referenced column on the target (the target's primary key when absent).
    #[serde(default)]
    pub references: Option<SmolStr>,
}

impl RelationDef {
    /// Create a new relationship.
    pub fn new(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        kind: RelationKind,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind,
            polymorphic: false,
            fk_field: None,
            references: None,
        }
    }

    /// Mark the relationship polymorphic.
    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    /// Set the foreign-key column.
    pub fn with_fk(mut self, fk: impl Into<SmolStr>) -> Self {
        self.fk_field = Some(fk.into());
        self
    }

    /// Set the referenced column on the target.
    pub fn with_references(mut self, field: impl Into<SmolStr>) -> Self {
        self.references = Some(field.into());
        self
    }

    /// The foreign-key column name, defaulted from the relationship name.
    pub fn fk_field(&self) -> SmolStr {
        self.fk_field
            .clone()
            .unwrap_or_else(|| SmolStr::new(format!("{}_id", self.name)))
    }

    /// The discriminator column paired with a polymorphic foreign key.
    pub fn type_field(&self) -> SmolStr {
        SmolStr::new(format!("{}_type", self.name))
    }

    /// Whether `other_name` is a type-specific shadow of this polymorphic
    /// relationship. Shadows share the polymorphic name as the prefix of
    /// their first underscore segment (`alertable_patient` shadows
    /// `alertable`) and exist only to allow direct joins.
    pub fn shadows(&self, other_name: &str) -> bool {
        self.polymorphic
            && other_name != self.name
            && other_name.split('_').next() == Some(self.name.as_str())
    }
}

//! Model and field definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::relation::RelationDef;

/// The scalar type of a literal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Integer column.
    Int,
    /// Floating-point column.
    Float,
    /// Short string column.
    #[default]
    String,
    /// Long text column.
    Text,
    /// Boolean column.
    Boolean,
    /// Date column.
    Date,
    /// Timestamp column.
    DateTime,
    /// Serialized/opaque JSON column.
    Json,
}

/// A literal (non-relationship) field on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: SmolStr,
    /// Scalar type.
    #[serde(default, rename = "type")]
    pub scalar_type: ScalarType,
    /// Whether the column accepts NULL.
    #[serde(default)]
    pub optional: bool,
    /// Whether this field is the primary key.
    #[serde(default)]
    pub id: bool,
}

impl FieldDef {
    /// Create a new field.
    pub fn new(name: impl Into<SmolStr>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
            optional: false,
            id: false,
        }
    }

    /// Get the field name as a string.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the field as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.id = true;
        self
    }
}

/// A model definition (maps to one persisted record type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Model name (canonical snake-case singular).
    pub name: SmolStr,
    /// Literal fields, in declaration order.
    #[serde(default)]
    pub fields: IndexMap<SmolStr, FieldDef>,
    /// Relationships declared on this model.
    #[serde(default)]
    pub relations: Vec<RelationDef>,
    /// Base model for subtypes that share a single physical store.
    #[serde(default)]
    pub base: Option<SmolStr>,
    /// Discriminator field selecting the concrete subtype, if any.
    #[serde(default)]
    pub discriminator: Option<SmolStr>,
}

impl ModelDef {
    /// Create a new model definition.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            relations: vec![],
            base: None,
            discriminator: None,
        }
    }

    /// Get the model name as a string.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Add a literal field.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Add a relationship.
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Set the base model for a shared-storage subtype.
    pub fn with_base(mut self, base: impl Into<SmolStr>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set the discriminator field name.
    pub fn with_discriminator(mut self, field: impl Into<SmolStr>) -> Self {
        self.discriminator = Some(field.into());
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Whether `name` is a literal field on this model.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The primary key field name (`id` when none is marked).
    pub fn primary_key(&self) -> &str {
        self.fields
            .values()
            .find(|f| f.id)
            .map(|f| f.name())
            .unwrap_or("id")
    }

    /// All declared relationships.
    pub fn relations(&self) -> &[RelationDef] {
        &self.relations
    }

    /// Get a relationship by name.
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// The polymorphic relationships declared on this model.
    pub fn polymorphic_relations(&self) -> impl Iterator<Item = &RelationDef> {
        self.relations.iter().filter(|r| r.polymorphic)
    }
}

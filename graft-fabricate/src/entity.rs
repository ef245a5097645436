//! Created entities.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::value::Value;

/// A persisted record produced by the store.
///
/// Entities are immutable once created; the fabricator only ever reads them
/// to resolve relationships on later nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    model: SmolStr,
    fields: IndexMap<SmolStr, Value>,
}

impl Entity {
    /// Create a new entity for `model` with the given field values.
    pub fn new(model: impl Into<SmolStr>, fields: IndexMap<SmolStr, Value>) -> Self {
        Self {
            model: model.into(),
            fields,
        }
    }

    /// The concrete model name this entity was instantiated as.
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get an integer field value.
    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    /// Get a string field value.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// All fields in storage order.
    pub fn fields(&self) -> &IndexMap<SmolStr, Value> {
        &self.fields
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.model)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, ")")
    }
}

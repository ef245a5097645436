//! Attribute values.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use smol_str::SmolStr;

use crate::entity::Entity;

/// A field value carried through fabrication and handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Serialized JSON value.
    Json(serde_json::Value),
    /// Date value.
    Date(NaiveDate),
    /// Timestamp value.
    DateTime(DateTime<Utc>),
    /// Reference to an already-created entity. Relationship attributes carry
    /// these; the store lowers them to foreign-key columns.
    Entity(Arc<Entity>),
    /// List of values (join-table relationship attributes are one-element
    /// entity lists).
    List(Vec<Value>),
}

impl Value {
    /// Get the integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the entity reference, if this is one.
    pub fn as_entity(&self) -> Option<&Arc<Entity>> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Check for null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert to a JSON value, for serialized columns. Entities collapse to
    /// their field maps; dates become strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Json(j) => j.clone(),
            Self::Date(d) => serde_json::Value::String(d.to_string()),
            Self::DateTime(t) => serde_json::Value::String(t.to_rfc3339()),
            Self::Entity(e) => serde_json::Value::Object(
                e.fields()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Json(j) => write!(f, "{j}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Entity(e) => write!(f, "<{}>", e.model()),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<SmolStr> for Value {
    fn from(v: SmolStr) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Arc<Entity>> for Value {
    fn from(v: Arc<Entity>) -> Self {
        Self::Entity(v)
    }
}

impl From<&Arc<Entity>> for Value {
    fn from(v: &Arc<Entity>) -> Self {
        Self::Entity(Arc::clone(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Self::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let _: Value = true.into();
        let _: Value = 42_i32.into();
        let _: Value = 42_i64.into();
        let _: Value = 1.5_f64.into();
        let _: Value = "hello".into();
        let _: Value = String::from("hello").into();
        let _: Value = Some(7).into();
        let _: Value = None::<i64>.into();
        let _: Value = vec![1, 2, 3].into();
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(5).as_int(), Some(5));
        assert_eq!(Value::String("x".into()).as_str(), Some("x"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_int(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::Null.to_string(), "null");
    }
}

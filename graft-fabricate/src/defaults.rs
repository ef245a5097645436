//! Per-model default attribute registry.
//!
//! Defaults fill in columns the spec leaves out, so a fabricated entity
//! satisfies not-null constraints without the caller spelling every field.
//! A default is either a literal value or a deferred thunk evaluated once
//! per fabricated entity, so timestamps and serial numbers stay fresh.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use parking_lot::Mutex;
use smol_str::SmolStr;

use graft_schema::model::ScalarType;
use graft_schema::schema::Schema;

use crate::value::Value;

/// One registered default: a literal, or a thunk run at materialization time.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Deferred(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn deferred(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Deferred(Arc::new(f))
    }

    /// Produce the concrete value for one entity.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Deferred(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Field defaults for the models of one schema.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    models: IndexMap<SmolStr, IndexMap<SmolStr, DefaultValue>>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive defaults from a schema's field types. Strings get the
    /// Pascal-cased field name, numbers get one, dates get today, booleans
    /// get false. Primary keys, foreign keys, discriminators, and token
    /// fields are left to the fabricator.
    pub fn auto_for_schema(schema: &Schema) -> Self {
        let mut defaults = Self::new();
        for (model_name, model) in schema.iter() {
            for (field_name, field) in &model.fields {
                if field.id
                    || field_name == "id"
                    || field_name.ends_with("_id")
                    || field_name.ends_with("_type")
                    || field_name.contains("token")
                    || model.discriminator.as_deref() == Some(field_name.as_str())
                {
                    continue;
                }
                let value = match field.scalar_type {
                    ScalarType::String | ScalarType::Text => {
                        DefaultValue::literal(field_name.to_case(Case::Pascal))
                    }
                    ScalarType::Int => DefaultValue::literal(1),
                    ScalarType::Float => DefaultValue::literal(1.0),
                    ScalarType::Boolean => DefaultValue::literal(false),
                    ScalarType::Date => {
                        DefaultValue::deferred(|| Value::Date(Utc::now().date_naive()))
                    }
                    ScalarType::DateTime => DefaultValue::deferred(|| Value::DateTime(Utc::now())),
                    ScalarType::Json => continue,
                };
                defaults.set(model_name.clone(), field_name.clone(), value);
            }
        }
        defaults
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Register a default for one model field.
    pub fn set(
        &mut self,
        model: impl Into<SmolStr>,
        field: impl Into<SmolStr>,
        value: DefaultValue,
    ) {
        self.models
            .entry(model.into())
            .or_default()
            .insert(field.into(), value);
    }

    /// Builder form of [`set`](Self::set) for literals.
    pub fn literal(
        mut self,
        model: impl Into<SmolStr>,
        field: impl Into<SmolStr>,
        value: impl Into<Value>,
    ) -> Self {
        self.set(model, field, DefaultValue::literal(value));
        self
    }

    /// Builder form of [`set`](Self::set) for thunks.
    pub fn deferred(
        mut self,
        model: impl Into<SmolStr>,
        field: impl Into<SmolStr>,
        f: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.set(model, field, DefaultValue::deferred(f));
        self
    }

    /// Overlay another registry; its entries win on conflict.
    pub fn extend_from(&mut self, other: Defaults) {
        for (model, fields) in other.models {
            let slot = self.models.entry(model).or_default();
            for (field, value) in fields {
                slot.insert(field, value);
            }
        }
    }

    /// Defaults registered for exactly this model name.
    pub fn model(&self, name: &str) -> Option<&IndexMap<SmolStr, DefaultValue>> {
        self.models.get(name)
    }

    /// Combined defaults for a model, with its base model's entries
    /// underneath. Exact-model entries win.
    pub fn collect(&self, model: &str, base: Option<&str>) -> IndexMap<SmolStr, DefaultValue> {
        let mut combined = base
            .and_then(|b| self.models.get(b))
            .cloned()
            .unwrap_or_default();
        if let Some(exact) = self.models.get(model) {
            for (field, value) in exact {
                combined.insert(field.clone(), value.clone());
            }
        }
        combined
    }
}

/// A deferred numeric serial: `start`, `start + step`, ...
pub fn serial_number(start: i64, step: i64) -> DefaultValue {
    let next = AtomicI64::new(start);
    DefaultValue::deferred(move || Value::Int(next.fetch_add(step, Ordering::Relaxed)))
}

/// A deferred string serial from a seed: `"a"`, `"b"`, ... `"z"`, `"aa"`.
///
/// The successor increments the rightmost alphanumeric character and
/// carries leftward, growing the string when every position rolls over
/// (`"0009"` → `"0010"`, `"zz"` → `"aaa"`).
pub fn serial_alpha(start: impl Into<String>) -> DefaultValue {
    let next = Mutex::new(start.into());
    DefaultValue::deferred(move || {
        let mut next = next.lock();
        let current = next.clone();
        *next = alpha_succ(&current);
        Value::String(current)
    })
}

fn alpha_succ(s: &str) -> String {
    let mut bytes: Vec<u8> = s.bytes().collect();
    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'a'..=b'y' | b'A'..=b'Y' | b'0'..=b'8' => {
                bytes[i] += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
            b'z' => bytes[i] = b'a',
            b'Z' => bytes[i] = b'A',
            b'9' => bytes[i] = b'0',
            _ => {}
        }
    }
    // Every position rolled over; grow on the left.
    let grown = match bytes.first() {
        Some(b'0'..=b'9') => "1",
        Some(b'A'..=b'Z') => "A",
        _ => "a",
    };
    format!("{grown}{}", String::from_utf8_lossy(&bytes))
}

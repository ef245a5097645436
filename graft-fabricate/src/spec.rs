//! Spec nodes: the caller-supplied nested description of entities to create.
//!
//! A spec node is an ordered mapping from a type token to one attribute map
//! or a list of attribute maps. Attribute maps mix literal column data,
//! nested spec nodes (relationship children), and directive keys; which kind
//! an entry is gets decided during the walk, against the schema.
//!
//! Build nodes with the fluent API:
//!
//! ```rust
//! use graft_fabricate::spec::SpecMap;
//!
//! let node = SpecMap::new().child(
//!     "client",
//!     SpecMap::new()
//!         .set("last_name", "Suzuki")
//!         .child("patient", SpecMap::new().ret()),
//! );
//! assert!(node.contains_return());
//! ```
//!
//! or with the [`spec!`](crate::spec!) macro:
//!
//! ```rust
//! use graft_fabricate::spec;
//!
//! let node = spec! {
//!     client: {
//!         last_name: "Suzuki",
//!         patient: { RETURN: true },
//!     },
//! };
//! assert!(node.contains_return());
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::entity::Entity;
use crate::value::Value;

/// A key in a spec node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpecKey {
    /// Symbolic token: a literal field or a model name, resolved by
    /// convention during the walk.
    Name(SmolStr),
    /// Direct model reference: always treated as a relationship child, even
    /// when a literal field shares the name.
    Model(SmolStr),
    /// `RETURN` directive.
    Return,
    /// `NO_DEFAULTS` directive (top level only).
    NoDefaults,
    /// Pre-built entity marker: splice an existing entity instead of
    /// creating one.
    Existing,
}

impl SpecKey {
    /// Symbolic key.
    pub fn name(name: impl Into<SmolStr>) -> Self {
        Self::Name(name.into())
    }

    /// Direct model reference key.
    pub fn model(name: impl Into<SmolStr>) -> Self {
        Self::Model(name.into())
    }
}

/// A value in a spec node.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecValue {
    /// Literal data (or a directive payload).
    Value(Value),
    /// One nested attribute map.
    Map(SpecMap),
    /// A list of nested attribute maps.
    List(Vec<SpecMap>),
}

/// A decoded `RETURN` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnAs {
    /// Return the entity positionally.
    Positional,
    /// Return the entity under this key in a result mapping.
    Keyed(SmolStr),
}

/// An ordered spec node / attribute map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecMap {
    entries: IndexMap<SpecKey, SpecValue>,
}

impl SpecMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for emptiness.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, keeping insertion order; re-inserting a key keeps
    /// its original position.
    pub fn insert(&mut self, key: SpecKey, value: SpecValue) {
        self.entries.insert(key, value);
    }

    /// Insert an entry only when the key is absent (explicit entries win).
    pub fn insert_default(&mut self, key: SpecKey, value: SpecValue) {
        self.entries.entry(key).or_insert(value);
    }

    /// Get an entry.
    pub fn get(&self, key: &SpecKey) -> Option<&SpecValue> {
        self.entries.get(key)
    }

    /// Get an entry mutably.
    pub fn get_mut(&mut self, key: &SpecKey) -> Option<&mut SpecValue> {
        self.entries.get_mut(key)
    }

    /// Check for a key.
    pub fn contains(&self, key: &SpecKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &SpecKey) -> Option<SpecValue> {
        self.entries.shift_remove(key)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&SpecKey, &SpecValue)> {
        self.entries.iter()
    }

    /// Iterate entries in order, with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&SpecKey, &mut SpecValue)> {
        self.entries.iter_mut()
    }

    /// The keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &SpecKey> {
        self.entries.keys()
    }

    /// Consume into ordered entries.
    pub fn into_entries(self) -> IndexMap<SpecKey, SpecValue> {
        self.entries
    }

    // ----- fluent builder -----

    /// Set a literal attribute.
    pub fn set(mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.insert(SpecKey::name(name), SpecValue::Value(value.into()));
        self
    }

    /// Add a nested child under a symbolic token.
    pub fn child(mut self, name: impl Into<SmolStr>, map: SpecMap) -> Self {
        self.insert(SpecKey::name(name), SpecValue::Map(map));
        self
    }

    /// Add a list of nested children under a symbolic token.
    pub fn child_list(mut self, name: impl Into<SmolStr>, maps: Vec<SpecMap>) -> Self {
        self.insert(SpecKey::name(name), SpecValue::List(maps));
        self
    }

    /// Add a nested child under a direct model reference.
    pub fn model_child(mut self, model: impl Into<SmolStr>, map: SpecMap) -> Self {
        self.insert(SpecKey::model(model), SpecValue::Map(map));
        self
    }

    /// Mark this node for positional return.
    pub fn ret(mut self) -> Self {
        self.insert(SpecKey::Return, SpecValue::Value(Value::Bool(true)));
        self
    }

    /// Mark this node for keyed return.
    pub fn ret_as(mut self, key: impl Into<SmolStr>) -> Self {
        self.insert(
            SpecKey::Return,
            SpecValue::Value(Value::String(key.into().to_string())),
        );
        self
    }

    /// Opt out of implicit default containers (top level only).
    pub fn no_defaults(mut self) -> Self {
        self.insert(SpecKey::NoDefaults, SpecValue::Value(Value::Bool(true)));
        self
    }

    /// Splice an already-created entity instead of creating one.
    pub fn existing(mut self, entity: Arc<Entity>) -> Self {
        self.insert(SpecKey::Existing, SpecValue::Value(Value::Entity(entity)));
        self
    }

    // ----- directive extraction -----

    /// Remove and decode a `RETURN` directive.
    pub fn take_return(&mut self) -> Option<ReturnAs> {
        match self.remove(&SpecKey::Return)? {
            SpecValue::Value(Value::Bool(true)) => Some(ReturnAs::Positional),
            SpecValue::Value(Value::String(key)) => Some(ReturnAs::Keyed(SmolStr::new(key))),
            _ => None,
        }
    }

    /// Remove a `NO_DEFAULTS` directive, reporting whether it was set.
    pub fn take_no_defaults(&mut self) -> bool {
        matches!(
            self.remove(&SpecKey::NoDefaults),
            Some(SpecValue::Value(Value::Bool(true)))
        )
    }

    /// Remove a pre-built entity marker.
    pub fn take_existing(&mut self) -> Option<Arc<Entity>> {
        match self.remove(&SpecKey::Existing)? {
            SpecValue::Value(Value::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Mark for positional return if no `RETURN` directive is present.
    pub fn mark_return(&mut self) {
        self.insert_default(SpecKey::Return, SpecValue::Value(Value::Bool(true)));
    }

    /// Whether any node in this tree carries a `RETURN` directive.
    pub fn contains_return(&self) -> bool {
        self.contains(&SpecKey::Return)
            || self.entries.values().any(|v| match v {
                SpecValue::Map(map) => map.contains_return(),
                SpecValue::List(maps) => maps.iter().any(SpecMap::contains_return),
                SpecValue::Value(_) => false,
            })
    }
}

impl FromIterator<(SpecKey, SpecValue)> for SpecMap {
    fn from_iter<T: IntoIterator<Item = (SpecKey, SpecValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Build a spec tree with hash-literal syntax.
///
/// ```rust
/// use graft_fabricate::spec;
///
/// let node = spec! {
///     practice: {
///         id: 3,
///         clients: [
///             { last_name: "Aaaa" },
///             { last_name: "Bbbb", RETURN: true },
///         ],
///     },
/// };
/// assert!(node.contains_return());
/// ```
///
/// Directive keys are `RETURN` (`true` or a key), `NO_DEFAULTS`, and
/// `EXISTING` (an entity expression). A `@name` key is a direct model
/// reference, forcing the entry to be a relationship child even when a
/// literal field shares the name.
#[macro_export]
macro_rules! spec {
    () => { $crate::spec::SpecMap::new() };
    ($($rest:tt)+) => {{
        #[allow(unused_mut)]
        let mut map = $crate::spec::SpecMap::new();
        $crate::spec_entries!(map; $($rest)+);
        map
    }};
}

/// Internal entry muncher for [`spec!`].
#[macro_export]
#[doc(hidden)]
macro_rules! spec_entries {
    ($map:ident;) => {};
    ($map:ident; RETURN: true $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::Return,
            $crate::spec::SpecValue::Value($crate::value::Value::Bool(true)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; RETURN: $key:ident $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::Return,
            $crate::spec::SpecValue::Value($crate::value::Value::String(
                stringify!($key).to_string(),
            )),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; RETURN: $key:literal $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::Return,
            $crate::spec::SpecValue::Value($crate::value::Value::from($key)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; NO_DEFAULTS: true $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::NoDefaults,
            $crate::spec::SpecValue::Value($crate::value::Value::Bool(true)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; EXISTING: $entity:expr $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::Existing,
            $crate::spec::SpecValue::Value($crate::value::Value::from($entity)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; @$name:ident: { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::model(stringify!($name)),
            $crate::spec::SpecValue::Map($crate::spec!($($inner)*)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; $name:ident: { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::name(stringify!($name)),
            $crate::spec::SpecValue::Map($crate::spec!($($inner)*)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; $name:ident: [ $({ $($inner:tt)* }),* $(,)? ] $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::name(stringify!($name)),
            $crate::spec::SpecValue::List(vec![$($crate::spec!($($inner)*)),*]),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
    ($map:ident; $name:ident: $value:expr $(, $($rest:tt)*)?) => {
        $map.insert(
            $crate::spec::SpecKey::name(stringify!($name)),
            $crate::spec::SpecValue::Value($crate::value::Value::from($value)),
        );
        $crate::spec_entries!($map; $($($rest)*)?);
    };
}

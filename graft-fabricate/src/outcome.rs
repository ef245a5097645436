//! The shaped result of one fabrication run.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::entity::Entity;
use crate::error::{FabricateError, FabricateResult};

/// What a fabrication run hands back, shaped by the `RETURN` directives the
/// spec carried: nothing, one entity, a list, or a key → entity mapping.
#[derive(Debug, Clone, Default)]
pub enum Fabricated {
    /// No node was marked for return.
    #[default]
    None,
    /// Exactly one positional return.
    One(Arc<Entity>),
    /// Several positional returns, in creation order.
    Many(Vec<Arc<Entity>>),
    /// Keyed returns, in creation order. A repeated key keeps the last
    /// entity created under it.
    Named(IndexMap<SmolStr, Arc<Entity>>),
}

impl Fabricated {
    /// Shape collected `(key, entity)` pairs. Mixing keyed and positional
    /// marks in one run is an error.
    pub fn from_marks(marks: Vec<(Option<SmolStr>, Arc<Entity>)>) -> FabricateResult<Self> {
        if marks.is_empty() {
            return Ok(Self::None);
        }
        let named_count = marks.iter().filter(|(key, _)| key.is_some()).count();
        if named_count == 0 {
            let mut entities: Vec<_> = marks.into_iter().map(|(_, e)| e).collect();
            if entities.len() == 1 {
                return Ok(Self::One(entities.remove(0)));
            }
            return Ok(Self::Many(entities));
        }
        if named_count != marks.len() {
            return Err(FabricateError::MixedReturns);
        }
        Ok(Self::Named(
            marks
                .into_iter()
                .filter_map(|(key, entity)| key.map(|k| (k, entity)))
                .collect(),
        ))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The single returned entity, if this run marked exactly one.
    pub fn one(&self) -> Option<&Arc<Entity>> {
        match self {
            Self::One(entity) => Some(entity),
            _ => None,
        }
    }

    /// The positional list, if this run marked several.
    pub fn many(&self) -> Option<&[Arc<Entity>]> {
        match self {
            Self::Many(entities) => Some(entities),
            _ => None,
        }
    }

    /// Look up a keyed return.
    pub fn get(&self, key: &str) -> Option<&Arc<Entity>> {
        match self {
            Self::Named(map) => map.get(key),
            _ => None,
        }
    }

    /// Consume into the single entity.
    pub fn into_one(self) -> Option<Arc<Entity>> {
        match self {
            Self::One(entity) => Some(entity),
            _ => None,
        }
    }

    /// Consume into the positional list; `One` becomes a list of one.
    pub fn into_many(self) -> Vec<Arc<Entity>> {
        match self {
            Self::One(entity) => vec![entity],
            Self::Many(entities) => entities,
            _ => vec![],
        }
    }

    /// Consume into the keyed mapping.
    pub fn into_named(self) -> IndexMap<SmolStr, Arc<Entity>> {
        match self {
            Self::Named(map) => map,
            _ => IndexMap::new(),
        }
    }
}

//! Ancestor context carried down the spec walk.
//!
//! One entity per model name, ordered by insertion. Each branch of the walk
//! clones the context, so siblings never see each other's ancestors.
//! Re-inserting a model moves it to the back: for polymorphic owners the
//! nearest ancestor wins, and "nearest" means most recently inserted.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::entity::Entity;

/// Ordered model-name → entity context.
#[derive(Debug, Clone, Default)]
pub struct Ancestors {
    entries: IndexMap<SmolStr, Arc<Entity>>,
}

impl Ancestors {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an entity under its model name, moving it to the back if the
    /// model is already present.
    pub fn push(&mut self, model: impl Into<SmolStr>, entity: Arc<Entity>) {
        let model = model.into();
        self.entries.shift_remove(&model);
        self.entries.insert(model, entity);
    }

    /// Look up an ancestor by model name.
    pub fn get(&self, model: &str) -> Option<&Arc<Entity>> {
        self.entries.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    /// The most recently inserted ancestor.
    pub fn last(&self) -> Option<(&SmolStr, &Arc<Entity>)> {
        self.entries.last()
    }

    /// Iterate ancestors oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Arc<Entity>)> {
        self.entries.iter()
    }
}

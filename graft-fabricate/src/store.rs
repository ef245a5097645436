//! Persistence seam and the in-memory reference store.
//!
//! The fabricator hands each materialized attribute map to a [`Store`],
//! which owns the physical write: foreign-key lowering, primary-key
//! allocation, and discriminator columns for subtype models that share
//! their base model's table.

use std::sync::Arc;

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;
use thiserror::Error;

use graft_schema::model::ModelDef;
use graft_schema::relation::RelationKind;
use graft_schema::schema::Schema;

use crate::entity::Entity;
use crate::ids::IdAllocator;
use crate::value::Value;

/// A failure writing one entity.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The attribute map carried a key that is neither a field, a relation
    /// column, nor the discriminator of the model.
    #[error("unknown column `{column}` on model `{model}`")]
    UnknownColumn { model: SmolStr, column: SmolStr },

    /// Two entities landed on the same primary key in one table.
    #[error("duplicate id {id} in table `{table}`")]
    DuplicateId { table: SmolStr, id: i64 },

    /// Backend-specific failure.
    #[error("store backend: {0}")]
    Backend(String),
}

/// Where fabricated entities are written.
pub trait Store: Send + Sync {
    /// Persist one entity of the given (concrete) model and return it with
    /// its primary key and relation columns filled in.
    fn create(
        &self,
        model: &ModelDef,
        attrs: IndexMap<SmolStr, Value>,
    ) -> Result<Arc<Entity>, StoreError>;

    /// Look up an entity by primary key, when the backend can. Default
    /// containers reuse an entity found here instead of creating a second
    /// one with the same sentinel id.
    fn find_by_id(&self, model: &ModelDef, id: i64) -> Option<Arc<Entity>> {
        let _ = (model, id);
        None
    }
}

/// In-memory store, one table per base model.
///
/// Good enough for tests and seed previews; a database-backed store
/// implements [`Store`] against the same attribute maps.
#[derive(Debug)]
pub struct MemoryStore {
    schema: Arc<Schema>,
    ids: IdAllocator,
    tables: RwLock<IndexMap<SmolStr, Vec<Arc<Entity>>>>,
}

impl MemoryStore {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            ids: IdAllocator::new(),
            tables: RwLock::new(IndexMap::new()),
        }
    }

    /// Use a custom id source (e.g. [`IdAllocator::negative`]).
    pub fn with_ids(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    /// All rows in a model's table, oldest first. Accepts a subtype name
    /// and reads its base table.
    pub fn all(&self, model: &str) -> Vec<Arc<Entity>> {
        let table = self.table_for(model);
        self.tables
            .read()
            .get(table.as_str())
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, model: &str) -> usize {
        let table = self.table_for(model);
        self.tables
            .read()
            .get(table.as_str())
            .map_or(0, Vec::len)
    }

    pub fn first(&self, model: &str) -> Option<Arc<Entity>> {
        self.all(model).into_iter().next()
    }

    pub fn last(&self, model: &str) -> Option<Arc<Entity>> {
        self.all(model).into_iter().next_back()
    }

    /// Find by primary key in a model's table.
    pub fn find(&self, model: &str, id: i64) -> Option<Arc<Entity>> {
        let pk = self
            .schema
            .get(model)
            .map(|m| SmolStr::new(m.primary_key()))
            .unwrap_or_else(|| SmolStr::new("id"));
        self.all(model)
            .into_iter()
            .find(|e| e.get_int(&pk) == Some(id))
    }

    /// Drop all rows.
    pub fn clear(&self) {
        self.tables.write().clear();
    }

    fn table_for(&self, model: &str) -> SmolStr {
        self.schema
            .get(model)
            .map(|m| self.schema.base_of(m).name.clone())
            .unwrap_or_else(|| SmolStr::new(model))
    }

    /// Whether `column` is writable on `model` (own field, base field,
    /// relation column, or discriminator).
    fn column_ok(&self, model: &ModelDef, column: &str) -> bool {
        let base = self.schema.base_of(model);
        if model.has_field(column) || base.has_field(column) {
            return true;
        }
        if column == model.primary_key() || column == base.primary_key() {
            return true;
        }
        if self
            .schema
            .discriminator_of(model)
            .is_some_and(|d| d == column)
        {
            return true;
        }
        model
            .relations()
            .iter()
            .chain(base.relations())
            .any(|r| r.name == column || r.fk_field() == column || r.type_field() == column)
    }

    /// Rewrite relation-valued attributes into foreign-key columns. An
    /// explicit foreign-key literal in the same map wins over the entity
    /// value.
    fn lower(
        &self,
        model: &ModelDef,
        attrs: IndexMap<SmolStr, Value>,
    ) -> Result<IndexMap<SmolStr, Value>, StoreError> {
        let base = self.schema.base_of(model);
        let mut columns: IndexMap<SmolStr, Value> = IndexMap::new();

        for (key, value) in &attrs {
            let relation = model
                .get_relation(key)
                .or_else(|| base.get_relation(key));
            let Some(relation) = relation else {
                if !self.column_ok(model, key) {
                    return Err(StoreError::UnknownColumn {
                        model: model.name.clone(),
                        column: key.clone(),
                    });
                }
                columns.insert(key.clone(), value.clone());
                continue;
            };

            match (relation.kind, value) {
                (RelationKind::ToOne, Value::Entity(target)) => {
                    let fk = relation.fk_field();
                    if !attrs.contains_key(&fk) {
                        columns.insert(fk, self.referenced_key(relation.references.as_deref(), target));
                    }
                    if relation.polymorphic {
                        columns.insert(
                            relation.type_field(),
                            Value::String(target.model().to_case(Case::Pascal)),
                        );
                    }
                }
                (RelationKind::ManyToMany | RelationKind::ToMany, Value::List(items)) => {
                    let keys = items
                        .iter()
                        .map(|item| match item {
                            Value::Entity(target) => {
                                self.referenced_key(relation.references.as_deref(), target)
                            }
                            other => other.clone(),
                        })
                        .collect();
                    columns.insert(key.clone(), Value::List(keys));
                }
                // A scalar under a relation name is taken as the foreign
                // key itself.
                (RelationKind::ToOne, scalar) => {
                    columns.insert(relation.fk_field(), scalar.clone());
                }
                (_, other) => {
                    columns.insert(key.clone(), other.clone());
                }
            }
        }

        Ok(columns)
    }

    fn referenced_key(&self, references: Option<&str>, target: &Arc<Entity>) -> Value {
        let key = references.map(SmolStr::new).unwrap_or_else(|| {
            self.schema
                .get(target.model())
                .map(|m| SmolStr::new(m.primary_key()))
                .unwrap_or_else(|| SmolStr::new("id"))
        });
        target.get(&key).cloned().unwrap_or(Value::Null)
    }
}

impl Store for MemoryStore {
    fn create(
        &self,
        model: &ModelDef,
        attrs: IndexMap<SmolStr, Value>,
    ) -> Result<Arc<Entity>, StoreError> {
        let mut columns = self.lower(model, attrs)?;

        let base = self.schema.base_of(model);
        let pk = SmolStr::new(base.primary_key());
        if !columns.contains_key(&pk) || columns[&pk].is_null() {
            columns.insert(pk.clone(), Value::Int(self.ids.next_id(base.name())));
        }

        // Subtypes that share the base table record their concrete type.
        if base.name != model.name {
            if let Some(discriminator) = self.schema.discriminator_of(model) {
                columns
                    .entry(SmolStr::new(discriminator))
                    .or_insert_with(|| Value::String(model.name.to_case(Case::Pascal)));
            }
        }

        let entity = Arc::new(Entity::new(model.name.clone(), columns));

        let mut tables = self.tables.write();
        let table = tables.entry(base.name.clone()).or_default();
        if let Some(id) = entity.get_int(&pk) {
            if table
                .iter()
                .any(|existing| existing.get_int(&pk) == Some(id))
            {
                return Err(StoreError::DuplicateId {
                    table: base.name.clone(),
                    id,
                });
            }
        }
        table.push(Arc::clone(&entity));
        Ok(entity)
    }

    fn find_by_id(&self, model: &ModelDef, id: i64) -> Option<Arc<Entity>> {
        self.find(model.name(), id)
    }
}

//! The spec walker: turns a nested spec tree into persisted entities.
//!
//! One [`Fabricator`] wraps a schema, a store, and the per-schema policy
//! pieces (defaults, connectors, implicit containers, hooks). Each call to
//! [`fabricate`](Fabricator::fabricate) walks one spec tree depth-first,
//! creating parents before children and threading an ancestor context down
//! each branch so relationship columns resolve without being spelled out.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tracing::{debug, trace};

use graft_schema::inflect;
use graft_schema::model::ModelDef;
use graft_schema::relation::{RelationDef, RelationKind};
use graft_schema::schema::Schema;

use crate::ancestors::Ancestors;
use crate::containers::{Connectors, ContainerDefaults};
use crate::defaults::Defaults;
use crate::entity::Entity;
use crate::error::{FabricateError, FabricateResult};
use crate::hooks::Hooks;
use crate::outcome::Fabricated;
use crate::spec::{ReturnAs, SpecKey, SpecMap, SpecValue};
use crate::store::{MemoryStore, Store};
use crate::value::Value;

/// A configured fabrication engine.
pub struct Fabricator<S = MemoryStore> {
    schema: Arc<Schema>,
    store: S,
    defaults: Defaults,
    connectors: Connectors,
    containers: Option<ContainerDefaults>,
    hooks: RwLock<Hooks>,
}

impl Fabricator<MemoryStore> {
    /// A fabricator writing to a fresh in-memory store.
    pub fn new(schema: Arc<Schema>) -> Self {
        let store = MemoryStore::new(Arc::clone(&schema));
        Self::with_store(schema, store)
    }
}

impl<S: Store> Fabricator<S> {
    /// A fabricator writing to the given store.
    pub fn with_store(schema: Arc<Schema>, store: S) -> Self {
        Self {
            schema,
            store,
            defaults: Defaults::new(),
            connectors: Connectors::new(),
            containers: None,
            hooks: RwLock::new(Hooks::new()),
        }
    }

    /// Use this defaults registry.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Derive defaults from the schema's field types, underneath any
    /// already-registered entries.
    pub fn with_auto_defaults(mut self) -> Self {
        let mut combined = Defaults::auto_for_schema(&self.schema);
        combined.extend_from(std::mem::take(&mut self.defaults));
        self.defaults = combined;
        self
    }

    /// Use these connector rules.
    pub fn with_connectors(mut self, connectors: Connectors) -> Self {
        self.connectors = connectors;
        self
    }

    /// Wrap specs in these implicit containers.
    pub fn with_containers(mut self, containers: ContainerDefaults) -> Self {
        self.containers = Some(containers);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adjust the hook set in place.
    pub fn configure_hooks(&self, f: impl FnOnce(&mut Hooks)) {
        f(&mut self.hooks.write());
    }

    /// Remove all installed hooks.
    pub fn reset_hooks(&self) {
        self.hooks.write().reset();
    }

    /// Walk one spec tree, creating every entity it describes, and shape
    /// the marked returns.
    pub fn fabricate(&self, spec: SpecMap) -> FabricateResult<Fabricated> {
        let mut spec = spec;
        Self::ensure_return(&mut spec);
        self.add_container_defaults(&mut spec);
        debug!(nodes = spec.len(), "fabricating spec");
        let mut marks = Vec::new();
        self.walk_types(spec, &Ancestors::new(), &mut marks)?;
        let shaped = Fabricated::from_marks(marks)?;
        self.hooks.read().run_before_fabricate(&shaped);
        Ok(shaped)
    }

    /// When no node asks to be returned, mark the first nested node so a
    /// bare spec still hands something back.
    fn ensure_return(spec: &mut SpecMap) {
        if spec.contains_return() {
            return;
        }
        for (_, value) in spec.iter_mut() {
            match value {
                SpecValue::Map(map) => {
                    map.mark_return();
                    return;
                }
                SpecValue::List(maps) => {
                    if let Some(first) = maps.first_mut() {
                        first.mark_return();
                        return;
                    }
                }
                SpecValue::Value(_) => {}
            }
        }
    }

    /// Wrap the spec in the configured containers unless it already
    /// mentions them (or opts out with `NO_DEFAULTS`). Nested entries of the
    /// outer container are re-parented under the injected inner one.
    fn add_container_defaults(&self, spec: &mut SpecMap) {
        let no_defaults = spec.take_no_defaults();
        let Some(containers) = &self.containers else {
            return;
        };
        if no_defaults {
            return;
        }

        let (outer, outer_id) = containers.outer();
        let Some(outer_model) = self.schema.get(outer) else {
            return;
        };

        if self.find_model_key(spec, outer).is_none() {
            let mut node = self.container_node(outer_model, outer_id);
            for (key, value) in std::mem::take(spec).into_entries() {
                node.insert(key, value);
            }
            spec.insert(SpecKey::name(outer), SpecValue::Map(node));
            debug!(container = outer, "wrapped spec in default container");
        }

        let Some((inner, inner_id)) = containers.inner() else {
            return;
        };
        let Some(inner_model) = self.schema.get(inner) else {
            return;
        };
        let Some(outer_key) = self.find_model_key(spec, outer) else {
            return;
        };
        let Some(SpecValue::Map(outer_node)) = spec.get_mut(&outer_key) else {
            return;
        };
        if self.find_model_key(outer_node, inner).is_some() {
            return;
        }
        let children = self.extract_children(inner_model, outer_node);
        let mut node = self.container_node(inner_model, inner_id);
        for (key, value) in children.into_entries() {
            node.insert(key, value);
        }
        outer_node.insert(SpecKey::name(inner), SpecValue::Map(node));
        debug!(container = inner, "injected default container");
    }

    /// The spec entries for a freshly-referenced container: the cached
    /// entity when its sentinel id is already in the store, else the
    /// sentinel id for a new one.
    fn container_node(&self, model: &ModelDef, id: i64) -> SpecMap {
        match self.store.find_by_id(model, id) {
            Some(entity) => SpecMap::new().existing(entity),
            None => SpecMap::new().set(model.primary_key(), id),
        }
    }

    /// The first top-level key of `spec` that resolves to `model`.
    fn find_model_key(&self, spec: &SpecMap, model: &str) -> Option<SpecKey> {
        spec.keys()
            .find(|key| match key {
                SpecKey::Name(token) => self
                    .schema
                    .resolve(token)
                    .is_some_and(|m| m.name == model),
                SpecKey::Model(name) => name == model,
                _ => false,
            })
            .cloned()
    }

    fn walk_types(
        &self,
        spec: SpecMap,
        ancestors: &Ancestors,
        marks: &mut Vec<(Option<SmolStr>, Arc<Entity>)>,
    ) -> FabricateResult<()> {
        for (key, value) in spec.into_entries() {
            let model = match &key {
                SpecKey::Name(token) => self.schema.resolve(token).ok_or_else(|| {
                    FabricateError::unknown_type(token.clone(), ancestors.last().map(|(m, _)| m.clone()))
                })?,
                SpecKey::Model(name) => self.schema.get(name).ok_or_else(|| {
                    FabricateError::unknown_type(name.clone(), ancestors.last().map(|(m, _)| m.clone()))
                })?,
                _ => continue,
            };
            let data_list = match value {
                SpecValue::Map(map) => vec![map],
                SpecValue::List(maps) => maps,
                SpecValue::Value(_) => {
                    trace!(model = %model.name, "skipping scalar under type key");
                    continue;
                }
            };
            self.walk_type(model, data_list, ancestors, marks)?;
        }
        Ok(())
    }

    fn walk_type(
        &self,
        model: &ModelDef,
        data_list: Vec<SpecMap>,
        ancestors: &Ancestors,
        marks: &mut Vec<(Option<SmolStr>, Arc<Entity>)>,
    ) -> FabricateResult<()> {
        // Computed once: list siblings share the same ancestor snapshot.
        let associations = self.collect_associations(model, ancestors);

        for mut data in data_list {
            let ret = data.take_return();
            data.take_no_defaults(); // meaningful only at the root
            let existing = data.take_existing();

            let mut children = self.extract_children(model, &mut data);
            self.inject_connector(model, ancestors, &mut children);

            let entity = match existing {
                Some(entity) => entity,
                None => self.materialize(model, data, &associations, ancestors, &children)?,
            };

            let mut next_ancestors = ancestors.clone();
            next_ancestors.push(model.name.clone(), Arc::clone(&entity));

            if let Some(ret) = ret {
                let key = match ret {
                    ReturnAs::Positional => None,
                    ReturnAs::Keyed(key) => Some(key),
                };
                marks.push((key, Arc::clone(&entity)));
            }

            self.walk_types(children, &next_ancestors, marks)?;
        }
        Ok(())
    }

    /// Relationship attributes derivable from the ancestor context:
    /// singular and join-table links to models already created on this
    /// branch, plus the nearest ancestor for a polymorphic owner.
    fn collect_associations(
        &self,
        model: &ModelDef,
        ancestors: &Ancestors,
    ) -> IndexMap<SmolStr, Value> {
        let base = self.schema.base_of(model);
        let mut relations: Vec<&RelationDef> = model.relations().iter().collect();
        if base.name != model.name {
            relations.extend(base.relations());
        }
        let mut polymorphics: Vec<&RelationDef> = model.polymorphic_relations().collect();
        if base.name != model.name {
            polymorphics.extend(base.polymorphic_relations());
        }

        let mut associations = IndexMap::new();
        for relation in &relations {
            if matches!(relation.kind, RelationKind::ToMany) || relation.polymorphic {
                continue;
            }
            // Type-specific shadows of a polymorphic link exist only for
            // joins and never get auto-resolved.
            if polymorphics.iter().any(|p| p.shadows(&relation.name)) {
                continue;
            }
            let Some(ancestor) = ancestors.get(&relation.target) else {
                continue;
            };
            let value = if relation.kind.is_join() {
                Value::List(vec![Value::Entity(Arc::clone(ancestor))])
            } else {
                Value::Entity(Arc::clone(ancestor))
            };
            associations.insert(relation.name.clone(), value);
        }

        if let Some(poly) = polymorphics.first() {
            if let Some((_, last)) = ancestors.last() {
                associations.insert(poly.name.clone(), Value::Entity(Arc::clone(last)));
            }
        }

        trace!(model = %model.name, count = associations.len(), "collected associations");
        associations
    }

    /// Split nested entries out of an attribute map. An entry is a child
    /// when its token resolves to a model and is not also a literal field
    /// of this model; direct model references always win over fields.
    fn extract_children(&self, model: &ModelDef, data: &mut SpecMap) -> SpecMap {
        let base = self.schema.base_of(model);
        let child_keys: Vec<SpecKey> = data
            .iter()
            .filter(|(key, value)| {
                if !matches!(value, SpecValue::Map(_) | SpecValue::List(_)) {
                    return false;
                }
                match key {
                    SpecKey::Model(name) => self.schema.get(name).is_some(),
                    SpecKey::Name(token) => {
                        self.schema.resolve(token).is_some()
                            && !model.has_field(token)
                            && !base.has_field(token)
                    }
                    _ => false,
                }
            })
            .map(|(key, _)| key.clone())
            .collect();

        let mut children = SpecMap::new();
        for key in child_keys {
            if let Some(value) = data.remove(&key) {
                children.insert(key, value);
            }
        }
        children
    }

    /// When this model and an ancestor form a declared pair, prepend their
    /// connector as an implicit child unless the spec already names it.
    fn inject_connector(&self, model: &ModelDef, ancestors: &Ancestors, children: &mut SpecMap) {
        let Some(connector) = self.connectors.connector_for(model.name(), ancestors) else {
            return;
        };
        let already = children.keys().any(|key| match key {
            SpecKey::Name(token) => self
                .schema
                .resolve(token)
                .is_some_and(|m| m.name == connector),
            SpecKey::Model(name) => name == connector,
            _ => false,
        });
        if already {
            return;
        }
        let mut rebuilt = SpecMap::new();
        rebuilt.insert(SpecKey::name(connector), SpecValue::Map(SpecMap::new()));
        for (key, value) in std::mem::take(children).into_entries() {
            rebuilt.insert(key, value);
        }
        *children = rebuilt;
        debug!(model = %model.name, connector, "injected connector");
    }

    /// Build the final attribute map for one entity and write it: literal
    /// data first, then ancestor links, then defaults, each layer filling
    /// only gaps left by the one before.
    fn materialize(
        &self,
        model: &ModelDef,
        data: SpecMap,
        associations: &IndexMap<SmolStr, Value>,
        ancestors: &Ancestors,
        children: &SpecMap,
    ) -> FabricateResult<Arc<Entity>> {
        let mut attrs: IndexMap<SmolStr, Value> = IndexMap::new();
        for (key, value) in data.into_entries() {
            let name = match key {
                SpecKey::Name(token) => token,
                SpecKey::Model(name) => name,
                _ => continue,
            };
            // Nested data that stayed behind the child split is a
            // serialized column.
            let value = match value {
                SpecValue::Value(v) => v,
                SpecValue::Map(map) => Value::Json(spec_to_json(&map)),
                SpecValue::List(maps) => Value::Json(serde_json::Value::Array(
                    maps.iter().map(spec_to_json).collect(),
                )),
            };
            attrs.insert(name, value);
        }

        // A discriminator value naming a sibling subtype picks the concrete
        // model; anything else stays a literal column.
        let mut concrete = model;
        if let Some(column) = self.schema.discriminator_of(model) {
            let column = SmolStr::new(column);
            let type_name = match attrs.get(&column) {
                Some(Value::String(name)) => Some(name.clone()),
                _ => None,
            };
            if let Some(type_name) = type_name {
                if let Some(subtype) = self.schema.get(&inflect::fold(&type_name)) {
                    if self.schema.base_of(subtype).name == self.schema.base_of(model).name {
                        concrete = subtype;
                        attrs.shift_remove(&column);
                    }
                }
            }
        }

        for (name, value) in associations {
            attrs.entry(name.clone()).or_insert_with(|| value.clone());
        }

        let base = self.schema.base_of(concrete);
        let base_name = (base.name != concrete.name).then(|| base.name.as_str());
        for (field, default) in self.defaults.collect(concrete.name(), base_name) {
            attrs.entry(field).or_insert_with(|| default.resolve());
        }

        self.hooks
            .read()
            .run_before_create(concrete, &mut attrs, ancestors, children);
        let entity = self
            .store
            .create(concrete, attrs)
            .map_err(|e| FabricateError::creation(concrete.name.clone(), e))?;
        debug!(model = %entity.model(), "created entity");
        Ok(entity)
    }
}

fn spec_to_json(map: &SpecMap) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .filter_map(|(key, value)| {
                let name = match key {
                    SpecKey::Name(token) => token.to_string(),
                    SpecKey::Model(name) => name.to_string(),
                    _ => return None,
                };
                let json = match value {
                    SpecValue::Value(v) => v.to_json(),
                    SpecValue::Map(m) => spec_to_json(m),
                    SpecValue::List(l) => {
                        serde_json::Value::Array(l.iter().map(spec_to_json).collect())
                    }
                };
                Some((name, json))
            })
            .collect(),
    )
}

//! Caller-installed callbacks around fabrication.
//!
//! Hooks let a test suite adjust every run without threading the tweak
//! through each spec: patch an attribute map just before its entity is
//! written, or observe the finished output right before it is handed back.
//! Installing a hook replaces the previous one; `reset` clears both.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use graft_schema::model::ModelDef;

use crate::ancestors::Ancestors;
use crate::outcome::Fabricated;
use crate::spec::SpecMap;
use crate::value::Value;

type BeforeFabricate = Arc<dyn Fn(&Fabricated) + Send + Sync>;
type BeforeCreate =
    Arc<dyn Fn(&ModelDef, &mut IndexMap<SmolStr, Value>, &Ancestors, &SpecMap) + Send + Sync>;

/// The hook set for one fabricator.
#[derive(Clone, Default)]
pub struct Hooks {
    before_fabricate: Option<BeforeFabricate>,
    before_create: Option<BeforeCreate>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run on the shaped output collection immediately before `fabricate`
    /// returns it.
    pub fn on_before_fabricate(&mut self, f: impl Fn(&Fabricated) + Send + Sync + 'static) {
        self.before_fabricate = Some(Arc::new(f));
    }

    /// Run on each entity's final attribute map, just before the store
    /// write. Receives the ancestor context and the child specs still to be
    /// walked under this entity.
    pub fn on_before_create(
        &mut self,
        f: impl Fn(&ModelDef, &mut IndexMap<SmolStr, Value>, &Ancestors, &SpecMap)
        + Send
        + Sync
        + 'static,
    ) {
        self.before_create = Some(Arc::new(f));
    }

    /// Remove all installed hooks.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn run_before_fabricate(&self, output: &Fabricated) {
        if let Some(hook) = &self.before_fabricate {
            hook(output);
        }
    }

    pub(crate) fn run_before_create(
        &self,
        model: &ModelDef,
        attrs: &mut IndexMap<SmolStr, Value>,
        ancestors: &Ancestors,
        children: &SpecMap,
    ) {
        if let Some(hook) = &self.before_create {
            hook(model, attrs, ancestors, children);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_fabricate", &self.before_fabricate.is_some())
            .field("before_create", &self.before_create.is_some())
            .finish()
    }
}

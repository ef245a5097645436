//! The schema registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};
use crate::inflect;
use crate::model::ModelDef;

/// A complete schema: the registry of all known models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// All models, keyed by canonical name.
    pub models: IndexMap<SmolStr, ModelDef>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model to the schema.
    pub fn add_model(&mut self, model: ModelDef) {
        self.models.insert(model.name.clone(), model);
    }

    /// Builder-style model insertion.
    pub fn with_model(mut self, model: ModelDef) -> Self {
        self.add_model(model);
        self
    }

    /// Get a model by exact name. Direct type references resolve here and
    /// bypass the naming convention entirely.
    pub fn get(&self, name: &str) -> Option<&ModelDef> {
        self.models.get(name)
    }

    /// Resolve a symbolic token against the registry.
    ///
    /// Applies the naming convention: case-fold, then singularize, then fall
    /// back to the pluralized form for models registered under a plural name.
    pub fn resolve(&self, token: &str) -> Option<&ModelDef> {
        let folded = inflect::fold(token);
        if let Some(model) = self.models.get(folded.as_str()) {
            return Some(model);
        }
        let singular = inflect::singularize(&folded);
        if let Some(model) = self.models.get(singular.as_str()) {
            return Some(model);
        }
        self.models.get(inflect::pluralize(&singular).as_str())
    }

    /// The base persisted model for `model` (identity when it has none).
    pub fn base_of<'a>(&'a self, model: &'a ModelDef) -> &'a ModelDef {
        match &model.base {
            Some(base) => self.models.get(base.as_str()).unwrap_or(model),
            None => model,
        }
    }

    /// The discriminator field used to pick a concrete subtype, if any.
    ///
    /// Declared on the base model; subtypes inherit it.
    pub fn discriminator_of<'a>(&'a self, model: &'a ModelDef) -> Option<&'a str> {
        self.base_of(model)
            .discriminator
            .as_deref()
            .or(model.discriminator.as_deref())
    }

    /// All model names in declaration order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(|s| s.as_str())
    }

    /// Iterate models in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &ModelDef)> {
        self.models.iter()
    }

    /// Check every cross-reference in the schema.
    ///
    /// Relation targets and base links must name known models; a subtype's
    /// base must carry a discriminator.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut errors = vec![];

        for model in self.models.values() {
            for relation in model.relations() {
                if !relation.polymorphic && self.get(&relation.target).is_none() {
                    errors.push(SchemaError::unknown_model(
                        model.name(),
                        format!("relation `{}`", relation.name),
                        relation.target.clone(),
                    ));
                }
            }
            if let Some(base) = &model.base {
                match self.get(base) {
                    None => errors.push(SchemaError::unknown_model(
                        model.name(),
                        "base",
                        base.clone(),
                    )),
                    Some(base_model) if base_model.discriminator.is_none() => {
                        errors.push(SchemaError::invalid_model(
                            base.clone(),
                            format!(
                                "base of `{}` must declare a discriminator field",
                                model.name()
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => Err(SchemaError::ValidationFailed { count, errors }),
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field_count: usize = self.models.values().map(|m| m.fields.len()).sum();
        let relation_count: usize = self.models.values().map(|m| m.relations.len()).sum();
        write!(
            f,
            "Schema({} models, {} fields, {} relations)",
            self.models.len(),
            field_count,
            relation_count
        )
    }
}

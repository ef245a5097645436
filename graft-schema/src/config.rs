//! TOML schema descriptions.
//!
//! A schema can be supplied declaratively instead of built in code, so the
//! metadata table is constructed once at startup from an external
//! description:
//!
//! ```toml
//! [models.practice.fields.id]
//! type = "int"
//! id = true
//!
//! [models.client.fields.id]
//! type = "int"
//! id = true
//!
//! [[models.client.relations]]
//! name = "practice"
//! target = "practice"
//! kind = "to_one"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};
use crate::model::{FieldDef, ModelDef, ScalarType};
use crate::relation::RelationDef;
use crate::schema::Schema;

/// Raw TOML shape of a whole schema. Field and model names come from the
/// table keys rather than being repeated in the body.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSchema {
    #[serde(default)]
    models: IndexMap<SmolStr, RawModel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    #[serde(default)]
    fields: IndexMap<SmolStr, RawField>,
    #[serde(default)]
    relations: Vec<RelationDef>,
    #[serde(default)]
    base: Option<SmolStr>,
    #[serde(default)]
    discriminator: Option<SmolStr>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    #[serde(default, rename = "type")]
    scalar_type: ScalarType,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    id: bool,
}

impl Schema {
    /// Parse a schema from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> SchemaResult<Self> {
        let raw: RawSchema =
            toml::from_str(content).map_err(|e| SchemaError::TomlError { source: e })?;

        let mut schema = Schema::new();
        for (name, raw_model) in raw.models {
            let mut model = ModelDef::new(name);
            for (field_name, raw_field) in raw_model.fields {
                let mut field = FieldDef::new(field_name, raw_field.scalar_type);
                field.optional = raw_field.optional;
                field.id = raw_field.id;
                model = model.field(field);
            }
            for relation in raw_model.relations {
                model = model.relation(relation);
            }
            model.base = raw_model.base;
            model.discriminator = raw_model.discriminator;
            schema.add_model(model);
        }

        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a schema from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        let schema = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), models = schema.model_names().count(), "loaded schema");
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::RelationKind;
    use pretty_assertions::assert_eq;

    const CLINIC: &str = r#"
        [models.practice.fields.id]
        type = "int"
        id = true

        [models.practice.fields.name]
        type = "string"

        [models.client.fields.id]
        type = "int"
        id = true

        [models.client.fields.last_name]
        type = "string"
        optional = true

        [[models.client.relations]]
        name = "practice"
        target = "practice"
        kind = "to_one"
    "#;

    #[test]
    fn test_parse_clinic() {
        let schema = Schema::from_toml_str(CLINIC).unwrap();
        assert_eq!(schema.models.len(), 2);

        let client = schema.get("client").unwrap();
        assert_eq!(client.primary_key(), "id");
        assert!(client.get_field("last_name").unwrap().optional);

        let rel = client.get_relation("practice").unwrap();
        assert_eq!(rel.kind, RelationKind::ToOne);
        assert_eq!(rel.fk_field(), "practice_id");
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let result = Schema::from_toml_str("[models.client]\nbogus = 1\n");
        assert!(matches!(result, Err(SchemaError::TomlError { .. })));
    }

    #[test]
    fn test_parse_validates_references() {
        let result = Schema::from_toml_str(
            r#"
            [models.client.fields.id]
            id = true

            [[models.client.relations]]
            name = "practice"
            target = "practice"
            kind = "to_one"
            "#,
        );
        assert!(matches!(result, Err(SchemaError::UnknownModel { .. })));
    }
}

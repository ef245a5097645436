//! Error types for schema construction and validation.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building or validating a schema.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a schema file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(graft::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse schema TOML")]
    #[diagnostic(code(graft::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// Invalid model definition.
    #[error("invalid model `{name}`: {message}")]
    #[diagnostic(code(graft::schema::invalid_model))]
    InvalidModel { name: String, message: String },

    /// Invalid relationship definition.
    #[error("invalid relation `{model}.{relation}`: {message}")]
    #[diagnostic(code(graft::schema::invalid_relation))]
    InvalidRelation {
        model: String,
        relation: String,
        message: String,
    },

    /// A definition references a model that does not exist.
    #[error("unknown model `{target}` referenced by `{model}.{context}`")]
    #[diagnostic(code(graft::schema::unknown_model))]
    UnknownModel {
        model: String,
        context: String,
        target: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(code(graft::schema::duplicate))]
    Duplicate { kind: String, name: String },

    /// Validation failed with multiple issues.
    #[error("schema validation failed with {count} error(s)")]
    #[diagnostic(code(graft::schema::validation_failed))]
    ValidationFailed {
        count: usize,
        #[related]
        errors: Vec<SchemaError>,
    },
}

impl SchemaError {
    /// Create an invalid model error.
    pub fn invalid_model(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid relation error.
    pub fn invalid_relation(
        model: impl Into<String>,
        relation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRelation {
            model: model.into(),
            relation: relation.into(),
            message: message.into(),
        }
    }

    /// Create an unknown model reference error.
    pub fn unknown_model(
        model: impl Into<String>,
        context: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::UnknownModel {
            model: model.into(),
            context: context.into(),
            target: target.into(),
        }
    }

    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_display() {
        let err = SchemaError::invalid_model("client", "no primary key");
        let display = format!("{}", err);
        assert!(display.contains("client"));
        assert!(display.contains("no primary key"));
    }

    #[test]
    fn test_invalid_relation_display() {
        let err = SchemaError::invalid_relation("owner", "patient", "missing target");
        let display = format!("{}", err);
        assert!(display.contains("owner.patient"));
    }

    #[test]
    fn test_unknown_model_display() {
        let err = SchemaError::unknown_model("alert", "relation `alertable`", "ghost");
        let display = format!("{}", err);
        assert!(display.contains("ghost"));
        assert!(display.contains("alert"));
    }

    #[test]
    fn test_validation_failed_display() {
        let err = SchemaError::ValidationFailed {
            count: 2,
            errors: vec![],
        };
        assert!(format!("{}", err).contains("2"));
    }
}

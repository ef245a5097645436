//! # graft-schema
//!
//! Relational schema metadata for the Graft fixture fabricator.
//!
//! This crate provides:
//! - Model, field, and relationship definitions
//! - The type registry with naming-convention token resolution
//! - Inheritance metadata (base models and discriminator fields)
//! - Declarative TOML schema descriptions
//!
//! ## Example
//!
//! ```rust
//! use graft_schema::{FieldDef, ModelDef, RelationDef, RelationKind, ScalarType, Schema};
//!
//! let schema = Schema::new()
//!     .with_model(
//!         ModelDef::new("practice").field(FieldDef::new("id", ScalarType::Int).primary_key()),
//!     )
//!     .with_model(
//!         ModelDef::new("client")
//!             .field(FieldDef::new("id", ScalarType::Int).primary_key())
//!             .relation(RelationDef::new("practice", "practice", RelationKind::ToOne)),
//!     );
//!
//! schema.validate().unwrap();
//! assert!(schema.resolve("Clients").is_some());
//! ```

pub mod config;
pub mod error;
pub mod inflect;
pub mod model;
pub mod relation;
pub mod schema;

pub use error::{SchemaError, SchemaResult};
pub use model::{FieldDef, ModelDef, ScalarType};
pub use relation::{RelationDef, RelationKind};
pub use schema::Schema;

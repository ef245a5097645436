//! # Graft
//!
//! Declarative, recursive fixture fabrication for relational schemas.
//!
//! Graft builds whole object graphs from one nested description: each node
//! names a model by convention, parents are created before children, and
//! relationship columns are filled in from the ancestor context instead of
//! being spelled out per entity.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use graft::prelude::*;
//! use graft::spec;
//!
//! let schema = Arc::new(Schema::from_toml_str(r#"
//!     [models.practice.fields]
//!     id = { type = "int", id = true }
//!     name = { type = "string" }
//!
//!     [models.client.fields]
//!     id = { type = "int", id = true }
//!     last_name = { type = "string" }
//!     practice_id = { type = "int", optional = true }
//!
//!     [[models.client.relations]]
//!     name = "practice"
//!     target = "practice"
//!     kind = "to_one"
//! "#).unwrap());
//!
//! let fab = Fabricator::new(schema);
//! let client = fab
//!     .fabricate(spec! {
//!         practice: {
//!             name: "North Clinic",
//!             client: { last_name: "Suzuki", RETURN: true },
//!         },
//!     })
//!     .unwrap()
//!     .into_one()
//!     .unwrap();
//!
//! assert_eq!(client.get_str("last_name"), Some("Suzuki"));
//! assert!(client.get_int("practice_id").is_some());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema metadata: models, fields, relationships, and TOML descriptions.
pub mod schema {
    pub use graft_schema::*;
}

/// Fabrication: specs, the walker, stores, defaults, and hooks.
pub mod fabricate {
    pub use graft_fabricate::*;
}

// The macro re-export lands at this crate's root.
pub use graft_fabricate::spec;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fabricate::{
        Connectors, ContainerDefaults, Defaults, Entity, Fabricated, FabricateError,
        FabricateResult, Fabricator, Hooks, MemoryStore, SpecMap, Store, Value,
    };
    pub use crate::schema::{
        FieldDef, ModelDef, RelationDef, RelationKind, ScalarType, Schema,
    };
}

// Re-export key types at the crate root
pub use fabricate::{Fabricated, FabricateError, FabricateResult, Fabricator, SpecMap};
pub use schema::Schema;

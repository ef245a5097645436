//! # graft-fabricate
//!
//! Declarative fixture fabrication for relational schemas.
//!
//! A spec is a nested map of type tokens to attribute data. Fabricating it
//! creates every entity it describes, parents before children, and wires
//! relationship columns from the ancestor context so nothing has to be
//! spelled twice:
//!
//! ```rust
//! use std::sync::Arc;
//! use graft_fabricate::{spec, Fabricator};
//! use graft_schema::Schema;
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
//! let result = fab.fabricate(spec! {
//!     practice: {
//!         name: "North Clinic",
//!         clients: [
//!             { last_name: "Suzuki", RETURN: true },
//!             { last_name: "Sato" },
//!         ],
//!     },
//! }).unwrap();
//!
//! let client = result.one().unwrap();
//! assert_eq!(client.get_str("last_name"), Some("Suzuki"));
//! // The client points at the practice without the spec saying so.
//! assert_eq!(client.get_int("practice_id"), fab.store().first("practice").unwrap().get_int("id"));
//! ```
//!
//! ## Return directives
//!
//! `RETURN: true` marks an entity to come back positionally; `RETURN: key`
//! collects keyed entities into a mapping; with no directive at all the
//! first entity is returned. Mixing positional and keyed marks in one spec
//! is an error.
//!
//! ## Policy pieces
//!
//! - [`Defaults`] fills unspecified columns, per model, with literals or
//!   deferred thunks ([`defaults::serial_number`], [`defaults::serial_alpha`]).
//! - [`ContainerDefaults`] wraps every spec in the schema's container
//!   entities unless the spec mentions them or opts out with `NO_DEFAULTS`.
//! - [`Connectors`] injects join entities between declared model pairs.
//! - [`Hooks`] lets a test suite patch attribute maps before each write and
//!   observe the finished output.
//! - [`Store`] is the persistence seam; [`MemoryStore`] is the in-memory
//!   reference backend.

pub mod ancestors;
pub mod containers;
pub mod defaults;
pub mod entity;
pub mod error;
pub mod fabricate;
pub mod hooks;
pub mod ids;
pub mod logging;
pub mod outcome;
#[macro_use]
pub mod spec;
pub mod store;
pub mod value;

pub use ancestors::Ancestors;
pub use containers::{Connectors, ContainerDefaults};
pub use defaults::{DefaultValue, Defaults};
pub use entity::Entity;
pub use error::{FabricateError, FabricateResult};
pub use fabricate::Fabricator;
pub use hooks::Hooks;
pub use ids::IdAllocator;
pub use outcome::Fabricated;
pub use spec::{ReturnAs, SpecKey, SpecMap, SpecValue};
pub use store::{MemoryStore, Store, StoreError};
pub use value::Value;

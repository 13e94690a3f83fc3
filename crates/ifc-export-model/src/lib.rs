// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Export Model - entity types, entity graph and identity for IFC export
//!
//! This crate holds everything the encoders share: the value model, the
//! schema-driven entity type registry, the entity graph built for one export
//! session, and the identity helpers used by both output formats.
//!
//! # Architecture
//!
//! - [`Registry`] - read-only catalog of entity types resolved from a static
//!   table, with effective attribute lists cached per type
//! - [`EntityGraph`] - instances of one session, sequential STEP ids,
//!   kind-checked registration and the shared encoder pre-check
//! - [`EntityResolver`] - reference lookup used by encoder passes
//! - [`identity`] - string-namespace UUID5 and the IFC GlobalId codec
//!
//! # Example
//!
//! ```ignore
//! use ifc_export_model::{EntityGraph, Registry, Value};
//!
//! let mut graph = EntityGraph::new(Registry::ifc4()?);
//! let project = graph.register("IfcProject", [
//!     ("GlobalId", Value::text(ifc_export_model::identity::new_global_id())),
//!     ("Name", Value::text("Demo")),
//! ])?;
//! assert_eq!(project.id().0, 1);
//! ```

pub mod error;
pub mod graph;
pub mod identity;
pub mod resolver;
pub mod schema;
pub mod types;

pub use error::*;
pub use graph::*;
pub use resolver::*;
pub use schema::{opt, req, Attribute, AttributeDef, EntityDef, EntityType, Registry};
pub use types::*;

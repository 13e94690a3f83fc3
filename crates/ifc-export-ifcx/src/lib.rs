// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Export IFCX - path-addressed JSON scene graph encoder
//!
//! Turns an [`EntityGraph`](ifc_export_model::EntityGraph) into an IFCX
//! document: a flat `data` array of nodes, each addressed by a UUID5 `path`
//! and carrying namespaced attributes or `children` links.
//!
//! # Architecture
//!
//! - [`hierarchy`] - one read-only pass recovering the spatial tree, placement
//!   owners and shape owners from relationship instances
//! - [`nodes`] - per-class node builders (objects, placements, meshes, styles,
//!   materials, properties, classifications)
//! - [`exclusion`] - attribute names and enum tokens never written
//! - [`pretty`] - the IFCX text layout and empty-value stripping
//!
//! Graph errors are reported as [`ModelError`](ifc_export_model::ModelError).
//!
//! # Example
//!
//! ```ignore
//! use ifc_export_ifcx::{encode, IfcxHeader};
//!
//! let mut counts = Default::default();
//! let json = encode(&graph, IfcxHeader::new("model.ifcx"), &mut counts)?;
//! ```

pub mod exclusion;
pub mod hierarchy;
pub mod nodes;
pub mod placement;
pub mod pretty;
mod writer;

pub use hierarchy::Hierarchy;
pub use pretty::{strip_empty, to_ifcx_string};
pub use writer::{encode, is_retained, IfcxHeader, IMPORTS, TIMESTAMP_FORMAT};

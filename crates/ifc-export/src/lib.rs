// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Export - scene in, `.ifc` or `.ifcx` out
//!
//! Ties the model and the two encoders together behind an [`ExportSession`]:
//!
//! 1. build a session over the IFC4 [`Registry`](ifc_export_model::Registry)
//!    with an [`ExportOptions`] bag
//! 2. populate its graph from a [`Scene`] (or register instances directly)
//! 3. call [`ExportSession::export`], which picks the encoder from the file
//!    extension and returns an [`ExportSummary`]
//!
//! # Example
//!
//! ```ignore
//! use ifc_export::{ExportOptions, ExportSession, Scene};
//! use ifc_export_model::Registry;
//!
//! let scene = Scene::from_file("scene.json")?;
//! let mut session = ExportSession::new(Registry::ifc4()?, ExportOptions::default());
//! session.populate(&scene)?;
//! let summary = session.export("model.ifcx");
//! println!("{}", summary);
//! ```

pub mod error;
pub mod options;
pub mod ping;
pub mod scene;
pub mod session;
pub mod summary;

pub use error::{ExportError, Result};
pub use options::{ExportOptions, GeometryMode};
pub use ping::{LogPing, PingEvent, UsagePing};
pub use scene::{populate, Scene, SceneNode, SeedValue};
pub use session::{ExportSession, OutputFormat};
pub use summary::{ExportSummary, Messages};

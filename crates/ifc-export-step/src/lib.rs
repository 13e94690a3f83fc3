// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Export STEP - Part-21 encoder and reader
//!
//! Encodes an [`EntityGraph`](ifc_export_model::EntityGraph) as an ISO
//! 10303-21 physical file, and reads such files back into plain records.
//!
//! # Features
//!
//! - **Single-pass writer** with an explicit HEADER / DATA / done state machine
//! - **Exact literals**: reals always carry a decimal point, strings use the
//!   `\X\`, `\X2\` and `\X4\` directives for anything outside printable ASCII
//! - **Reader** built on `nom` combinators and `memchr` scanning, decoding
//!   every escape the writer produces
//!
//! # Example
//!
//! ```ignore
//! use ifc_export_step::{encode, read, StepHeader};
//!
//! let mut counts = Default::default();
//! let text = encode(&graph, StepHeader::new("model.ifc", "IFC4"), &mut counts)?;
//! let doc = read(&text)?;
//! assert_eq!(doc.records.len(), graph.len());
//! ```

mod error;
mod header;
mod literal;
mod reader;
mod scanner;
mod tokenizer;
mod writer;

pub use error::{Result, StepError};
pub use header::{default_view_definition, StepHeader, TIMESTAMP_FORMAT};
pub use literal::{encode_string, format_real};
pub use reader::{parse_header, read, HeaderInfo, StepDocument, StepRecord};
pub use scanner::EntityScanner;
pub use tokenizer::{decode_string, parse_entity, Token};
pub use writer::{encode, StepWriter, WriterState};

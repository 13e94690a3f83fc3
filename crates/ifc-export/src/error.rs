// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for export sessions

use ifc_export_model::ModelError;
use ifc_export_step::StepError;
use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that end an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output extension this engine does not write
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Scene reference to a key that no node declares
    #[error("Unknown scene key: {0}")]
    UnknownKey(String),

    /// Two scene nodes declare the same key
    #[error("Duplicate scene key: {0}")]
    DuplicateKey(String),
}

impl ExportError {
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        ExportError::UnsupportedFormat(msg.into())
    }
}

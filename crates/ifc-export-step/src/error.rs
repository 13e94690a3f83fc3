// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP encoding and reading

use ifc_export_model::ModelError;
use thiserror::Error;

/// Result type alias for STEP operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Errors raised by the STEP writer and reader
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// Graph or value error found while encoding
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writer call made in the wrong section
    #[error("STEP writer is in the {state} section, cannot {action}")]
    InvalidState { state: &'static str, action: &'static str },

    /// Document structure is broken (missing sections, unterminated records)
    #[error("Invalid STEP document: {0}")]
    InvalidFormat(String),

    /// Failed to parse one entity record
    #[error("Failed to parse entity #{0}: {1}")]
    EntityParse(u32, String),
}

impl StepError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        StepError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: u32, msg: impl Into<String>) -> Self {
        StepError::EntityParse(id, msg.into())
    }
}

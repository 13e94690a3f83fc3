// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for entity graph and encoding operations

use crate::EntityId;
use thiserror::Error;

/// Result type alias for model and encoder operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or encoding an entity graph
///
/// Every variant is fatal to the export that raised it: encoders never
/// produce a partial file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Type name not present in the registry
    #[error("Unknown entity type: {0}")]
    UnknownType(String),

    /// Supertype chain loops back on itself
    #[error("Cyclic supertype chain detected at {0}")]
    CyclicHierarchy(String),

    /// Instance id not present in the graph
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Attribute name not part of the type's effective attribute list
    #[error("Unknown attribute {attribute} for entity type {entity_type}")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    /// Required attribute left unset at encode time
    #[error("Missing required attribute {attribute} on entity {entity}")]
    MissingRequiredAttribute { entity: EntityId, attribute: String },

    /// Value does not fit the declared kind of its attribute slot
    #[error(
        "Type mismatch at {entity_type}.{attribute}: expected {expected}, got {actual}"
    )]
    ValueKindMismatch {
        entity_type: String,
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Enumeration token or defined-type name outside the Part-21 token syntax
    #[error("Invalid token '{token}' at {entity_type}.{attribute}")]
    InvalidToken {
        entity_type: String,
        attribute: String,
        token: String,
    },

    /// Reference to an instance that is not part of the graph
    #[error("Entity {entity} attribute {attribute} references missing entity {target}")]
    DanglingReference {
        entity: EntityId,
        attribute: String,
        target: EntityId,
    },

    /// Project name or GlobalId unavailable, so the IFCX root path cannot be derived
    #[error("Missing project identity: {0}")]
    MissingProjectIdentity(String),

    /// NaN or infinite REAL value
    #[error("Non-finite real value at {entity_type}.{attribute}")]
    NonFiniteReal {
        entity_type: String,
        attribute: String,
    },

    /// String is not a valid 22 character IFC GlobalId
    #[error("Invalid GlobalId: {0}")]
    InvalidGlobalId(String),
}

impl ModelError {
    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        ModelError::UnknownType(name.into())
    }

    /// Create an unknown attribute error
    pub fn unknown_attribute(entity_type: impl Into<String>, attribute: impl Into<String>) -> Self {
        ModelError::UnknownAttribute {
            entity_type: entity_type.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a missing project identity error
    pub fn missing_project_identity(msg: impl Into<String>) -> Self {
        ModelError::MissingProjectIdentity(msg.into())
    }
}

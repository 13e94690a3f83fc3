// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for the export value model
//!
//! [`Value`] is the tagged union both encoders consume. [`ValueKind`] is the
//! declared shape of an attribute slot in the schema table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-type counts of emitted instances, keyed by canonical type name
///
/// Encoders add to it as they go, so a failed export still reports what
/// was written before the failure.
pub type EmitCounts = BTreeMap<&'static str, usize>;

/// Type-safe entity identifier
///
/// Wraps the STEP instance number (e.g., #123 becomes EntityId(123)).
/// Ids are assigned by the entity graph starting at 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Part-21 token syntax: an upper case letter or `_`, then upper case
/// letters, digits or `_`
pub fn is_step_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Attribute value
///
/// Represents any literal that can be stored in an entity attribute slot.
/// An attribute that was never populated reads as [`Value::Unset`].
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// Not set ($ in STEP, omitted in IFCX)
    #[default]
    Unset,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// String value
    Text(String),
    /// Enumeration token, stored without dots
    Enum(String),
    /// Reference to another instance of the same graph
    Reference(EntityId),
    /// Aggregate of values
    List(Vec<Value>),
    /// Defined-type value in a SELECT slot, like IFCLABEL('text')
    Typed(String, Box<Value>),
}

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Create an enumeration token
    pub fn enumeration(token: impl Into<String>) -> Self {
        Value::Enum(token.into())
    }

    /// Create a typed SELECT value
    pub fn typed(type_name: impl Into<String>, inner: Value) -> Self {
        Value::Typed(type_name.into(), Box::new(inner))
    }

    /// Create a list of references
    pub fn refs(ids: impl IntoIterator<Item = EntityId>) -> Self {
        Value::List(ids.into_iter().map(Value::Reference).collect())
    }

    /// Create a list of reals
    pub fn reals(values: impl IntoIterator<Item = f64>) -> Self {
        Value::List(values.into_iter().map(Value::Real).collect())
    }

    /// Create a list of integers
    pub fn integers(values: impl IntoIterator<Item = i64>) -> Self {
        Value::List(values.into_iter().map(Value::Integer).collect())
    }

    /// First enumeration token or defined-type name Part-21 cannot carry
    ///
    /// Defined-type names are written upper case, so only their characters
    /// matter; enumeration tokens are written verbatim.
    pub fn invalid_token(&self) -> Option<&str> {
        match self {
            Value::Enum(token) if !is_step_token(token) => Some(token),
            Value::Typed(type_name, _) if !is_step_token(&type_name.to_ascii_uppercase()) => {
                Some(type_name)
            }
            Value::Typed(_, inner) => inner.invalid_token(),
            Value::List(items) => items.iter().find_map(Value::invalid_token),
            _ => None,
        }
    }

    /// Check if this is an unset value
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Try to get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Typed(_, inner) => inner.as_text(),
            _ => None,
        }
    }

    /// Try to get as float (integers widen)
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::Typed(_, inner) => inner.as_real(),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as enumeration token
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as entity reference
    pub fn as_reference(&self) -> Option<EntityId> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Collect every reference in this value, depth first
    pub fn references(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<EntityId>) {
        match self {
            Value::Reference(id) => out.push(*id),
            Value::List(items) => items.iter().for_each(|v| v.collect_references(out)),
            Value::Typed(_, inner) => inner.collect_references(out),
            _ => {}
        }
    }

    /// Short name of the variant, used in mismatch errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unset => "UNSET",
            Value::Bool(_) => "BOOLEAN",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "STRING",
            Value::Enum(_) => "ENUMERATION",
            Value::Reference(_) => "ENTITY",
            Value::List(_) => "LIST",
            Value::Typed(_, _) => "TYPED",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Value::Reference(id)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Declared shape of an attribute slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// BOOLEAN
    Boolean,
    /// INTEGER
    Integer,
    /// REAL
    Real,
    /// STRING and string-based defined types
    Text,
    /// ENUMERATION
    Enum,
    /// Entity reference
    Entity,
    /// SELECT over defined types or entities
    Select,
    /// Attribute redeclared as DERIVE, always written as *
    Derived,
    /// LIST / SET of the inner kind
    List(&'static ValueKind),
}

impl ValueKind {
    /// Check whether a value fits this slot
    ///
    /// `Unset` fits every slot; whether it is allowed is decided by the
    /// attribute's optional flag, not here. Derived slots accept nothing else.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Unset) => true,
            (ValueKind::Derived, _) => false,
            (ValueKind::Boolean, Value::Bool(_)) => true,
            (ValueKind::Integer, Value::Integer(_)) => true,
            (ValueKind::Real, Value::Real(_)) => true,
            (ValueKind::Text, Value::Text(_)) => true,
            (ValueKind::Enum, Value::Enum(_)) => true,
            (ValueKind::Entity, Value::Reference(_)) => true,
            (ValueKind::Select, Value::Reference(_) | Value::Typed(_, _)) => true,
            (ValueKind::List(inner), Value::List(items)) => items
                .iter()
                .all(|item| !item.is_unset() && inner.accepts(item)),
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Boolean => write!(f, "BOOLEAN"),
            ValueKind::Integer => write!(f, "INTEGER"),
            ValueKind::Real => write!(f, "REAL"),
            ValueKind::Text => write!(f, "STRING"),
            ValueKind::Enum => write!(f, "ENUMERATION"),
            ValueKind::Entity => write!(f, "ENTITY"),
            ValueKind::Select => write!(f, "SELECT"),
            ValueKind::Derived => write!(f, "DERIVED"),
            ValueKind::List(inner) => write!(f, "LIST OF {}", inner),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part-21 literal encoding
//!
//! Strings are written in the ISO 10303-21 escape syntax: printable ASCII
//! passes through, `'` and `\` are doubled, anything else goes through the
//! `\X\`, `\X2\` or `\X4\` hex directives.

use ifc_export_model::{Attribute, EntityType, ModelError, Result, Value, ValueKind};
use std::fmt::Write;

/// Append the encoding of one attribute slot
pub fn write_attribute(
    out: &mut String,
    entity_type: &EntityType,
    attribute: &Attribute,
    value: &Value,
) -> Result<()> {
    if attribute.kind == ValueKind::Derived {
        out.push('*');
        return Ok(());
    }
    write_value(out, value).ok_or_else(|| ModelError::NonFiniteReal {
        entity_type: entity_type.name().to_string(),
        attribute: attribute.name.to_string(),
    })
}

/// Append a value; `None` when a real is NaN or infinite
pub fn write_value(out: &mut String, value: &Value) -> Option<()> {
    match value {
        Value::Unset => out.push('$'),
        Value::Bool(true) => out.push_str(".T."),
        Value::Bool(false) => out.push_str(".F."),
        Value::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Real(f) => out.push_str(&format_real(*f)?),
        Value::Text(s) => write_string(out, s),
        Value::Enum(token) => {
            out.push('.');
            out.push_str(token);
            out.push('.');
        }
        Value::Reference(id) => {
            let _ = write!(out, "{}", id);
        }
        Value::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(')');
        }
        Value::Typed(type_name, inner) => {
            out.push_str(&type_name.to_uppercase());
            out.push('(');
            write_value(out, inner)?;
            out.push(')');
        }
    }
    Some(())
}

/// Format a REAL with a mandatory decimal point
///
/// Uses the shortest round-tripping representation, e.g. `1.`, `0.5`,
/// `1.5E-7`, `1.E20`.
pub fn format_real(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let shortest = format!("{:?}", value);
    let (mantissa, exponent) = match shortest.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (shortest.as_str(), None),
    };

    let mut out = String::with_capacity(shortest.len() + 1);
    match mantissa.strip_suffix(".0") {
        Some(integral) => {
            out.push_str(integral);
            out.push('.');
        }
        None => {
            out.push_str(mantissa);
            if !mantissa.contains('.') {
                out.push('.');
            }
        }
    }

    if let Some(exponent) = exponent {
        out.push('E');
        out.push_str(exponent);
    }

    Some(out)
}

/// Append a quoted, escaped STEP string
pub fn write_string(out: &mut String, s: &str) {
    out.push('\'');

    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let code = c as u32;
        match code {
            0x27 => out.push_str("''"),
            0x5C => out.push_str("\\\\"),
            0x20..=0x7E => out.push(c),
            0x00..=0xFF => {
                let _ = write!(out, "\\X\\{:02X}", code);
            }
            0x100..=0xFFFF => {
                out.push_str("\\X2\\");
                let _ = write!(out, "{:04X}", code);
                while let Some(&next) = chars.peek() {
                    if !(0x100..=0xFFFF).contains(&(next as u32)) {
                        break;
                    }
                    let _ = write!(out, "{:04X}", next as u32);
                    chars.next();
                }
                out.push_str("\\X0\\");
            }
            _ => {
                out.push_str("\\X4\\");
                let _ = write!(out, "{:08X}", code);
                while let Some(&next) = chars.peek() {
                    if (next as u32) < 0x10000 {
                        break;
                    }
                    let _ = write!(out, "{:08X}", next as u32);
                    chars.next();
                }
                out.push_str("\\X0\\");
            }
        }
    }

    out.push('\'');
}

/// Quoted, escaped STEP string
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_string(&mut out, s);
    out
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instance identity
//!
//! Two independent systems live here:
//!
//! - [`uuid5`]: name-based UUIDs for IFCX paths. The namespace is hashed as
//!   a plain string, not as the 16 bytes of a namespace UUID, so the output
//!   differs from RFC 4122 UUID5 for the same inputs. IFCX consumers
//!   cross-reference files by these values.
//! - [`compress_global_id`] / [`expand_global_id`]: the 22 character IFC
//!   base-64 form of a 128-bit UUID used for `GlobalId` attributes.

use crate::{ModelError, Result};
use sha1::{Digest, Sha1};
use uuid::Uuid;

/// IFC base-64 alphabet
const GLOBAL_ID_CHARS: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of an encoded GlobalId
pub const GLOBAL_ID_LEN: usize = 22;

/// Derive a name-based UUID from a string namespace and a name
pub fn uuid5(namespace: &str, name: &str) -> Uuid {
    let mut hasher = Sha1::new();
    hasher.update(namespace.as_bytes());
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    bytes[6] = (bytes[6] & 0x0f) | 0x50;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Encode a UUID as an IFC GlobalId
pub fn compress_global_id(uuid: &Uuid) -> String {
    let value = uuid.as_u128();
    let mut out = String::with_capacity(GLOBAL_ID_LEN);

    // First character carries the top 2 bits, then 21 groups of 6
    out.push(GLOBAL_ID_CHARS[(value >> 126) as usize] as char);
    for group in (0..21).rev() {
        let index = (value >> (group * 6)) & 0x3f;
        out.push(GLOBAL_ID_CHARS[index as usize] as char);
    }

    out
}

/// Decode an IFC GlobalId back into its UUID
pub fn expand_global_id(global_id: &str) -> Result<Uuid> {
    let bytes = global_id.as_bytes();
    if bytes.len() != GLOBAL_ID_LEN {
        return Err(ModelError::InvalidGlobalId(global_id.to_string()));
    }

    let mut value: u128 = 0;
    for (i, &c) in bytes.iter().enumerate() {
        let digit = char_value(c)
            .ok_or_else(|| ModelError::InvalidGlobalId(global_id.to_string()))?;
        if i == 0 && digit > 3 {
            return Err(ModelError::InvalidGlobalId(global_id.to_string()));
        }
        value = (value << 6) | digit as u128;
    }

    Ok(Uuid::from_u128(value))
}

/// Fresh random GlobalId for a newly created rooted entity
pub fn new_global_id() -> String {
    compress_global_id(&Uuid::new_v4())
}

/// Deterministic GlobalId derived from a namespace and a name
pub fn derived_global_id(namespace: &str, name: &str) -> String {
    compress_global_id(&uuid5(namespace, name))
}

fn char_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'Z' => Some(c - b'A' + 10),
        b'a'..=b'z' => Some(c - b'a' + 36),
        b'_' => Some(62),
        b'$' => Some(63),
        _ => None,
    }
}

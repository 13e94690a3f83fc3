// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record scanner using SIMD-accelerated byte searching
//!
//! Finds record boundaries without tokenizing: `#` at the start of a line
//! opens an instance record and the next `;` outside a string closes it.

use memchr::{memchr, memchr2};
use rustc_hash::FxHashMap;

/// Entity scanner over the DATA section of a Part-21 document
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned after `DATA;`
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);
        Self { content, pos }
    }

    /// Scan to the next instance record
    ///
    /// Returns (id, type_name, start_byte, end_byte)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            // References inside attribute lists never follow a line break
            let is_entity_start = self.pos == 0
                || bytes[self.pos - 1] == b'\n'
                || bytes[self.pos - 1] == b'\r'
                || bytes[self.pos - 1] == b';';

            if !is_entity_start {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            self.pos += 1;
            let id_start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }
            let id: u32 = self.content[id_start..self.pos].parse().ok()?;

            self.skip_blanks();
            if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blanks();

            let type_start = self.pos;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }
            let type_name = &self.content[type_start..self.pos];

            let end = self.find_record_end()?;
            return Some((id, type_name, start, end));
        }

        None
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && (bytes[self.pos] == b' ' || bytes[self.pos] == b'\t') {
            self.pos += 1;
        }
    }

    /// Advance past the closing semicolon, honouring quoted strings
    fn find_record_end(&mut self) -> Option<usize> {
        let end = record_end(self.content.as_bytes(), self.pos)?;
        self.pos = end;
        Some(end)
    }

    /// Count records by upper-case type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        while let Some((_, type_name, _, _)) = scanner.next_entity() {
            *counts.entry(type_name.to_uppercase()).or_insert(0) += 1;
        }
        counts
    }
}

/// Byte offset just past the `;` closing the record that starts at `from`
pub(crate) fn record_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    let mut in_string = false;

    while pos < bytes.len() {
        if in_string {
            let quote = memchr(b'\'', &bytes[pos..])?;
            pos += quote;
            // '' is an escaped quote
            if bytes.get(pos + 1) == Some(&b'\'') {
                pos += 2;
                continue;
            }
            in_string = false;
            pos += 1;
        } else {
            let hit = memchr2(b'\'', b';', &bytes[pos..])?;
            pos += hit;
            if bytes[pos] == b';' {
                return Some(pos + 1);
            }
            in_string = true;
            pos += 1;
        }
    }

    None
}

/// Split the HEADER section into its records
///
/// Returns an empty list when the document has no HEADER section.
pub fn header_records(content: &str) -> Vec<&str> {
    let Some(header_start) = content.find("HEADER;") else {
        return Vec::new();
    };
    let start = header_start + "HEADER;".len();
    let bytes = content.as_bytes();

    let mut records = Vec::new();
    let mut pos = start;
    while let Some(end) = record_end(bytes, pos) {
        let record = content[pos..end].trim();
        if record == "ENDSEC;" {
            break;
        }
        records.push(record);
        pos = end;
    }
    records
}

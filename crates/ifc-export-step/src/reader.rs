// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part-21 document reader
//!
//! Reads a document back into plain records. The exporter uses it to check
//! its own output; it does not rebuild an entity graph.

use crate::scanner::{header_records, EntityScanner};
use crate::tokenizer::{parse_entity, parse_record, Token};
use crate::{Result, StepError};
use ifc_export_model::Value;

/// Header information extracted from a document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderInfo {
    pub view_definition: Option<String>,
    pub schema_version: String,
    pub file_name: Option<String>,
    pub timestamp: Option<String>,
    pub author: Option<String>,
    pub organization: Option<String>,
    pub preprocessor_version: Option<String>,
    pub originating_system: Option<String>,
}

/// One DATA record
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    pub id: u32,
    /// Type keyword as written, e.g. "IFCWALL"
    pub type_name: String,
    pub values: Vec<Value>,
}

/// Parsed document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepDocument {
    pub header: HeaderInfo,
    pub records: Vec<StepRecord>,
}

impl StepDocument {
    pub fn record(&self, id: u32) -> Option<&StepRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Read a whole Part-21 document
pub fn read(content: &str) -> Result<StepDocument> {
    if !content.trim_start().starts_with("ISO-10303-21;") {
        return Err(StepError::format("missing ISO-10303-21 opening keyword"));
    }
    if !content.contains("DATA;") {
        return Err(StepError::format("missing DATA section"));
    }

    let header = parse_header(content)?;

    let mut records = Vec::new();
    let mut scanner = EntityScanner::new(content);
    while let Some((id, _, start, end)) = scanner.next_entity() {
        let (id, type_name, values) =
            parse_entity(&content[start..end]).map_err(|msg| StepError::entity_parse(id, msg))?;
        records.push(StepRecord {
            id,
            type_name: type_name.to_string(),
            values,
        });
    }

    log::debug!("Read {} records ({})", records.len(), header.schema_version);
    Ok(StepDocument { header, records })
}

/// Extract header metadata
pub fn parse_header(content: &str) -> Result<HeaderInfo> {
    let mut info = HeaderInfo::default();

    for record in header_records(content) {
        let (name, args) = parse_record(record).map_err(StepError::format)?;
        match name {
            "FILE_DESCRIPTION" => {
                info.view_definition = args
                    .first()
                    .and_then(first_text)
                    .and_then(|d| view_definition(&d).map(str::to_string));
            }
            "FILE_NAME" => {
                info.file_name = args.first().and_then(first_text);
                info.timestamp = args.get(1).and_then(first_text);
                info.author = args.get(2).and_then(first_text);
                info.organization = args.get(3).and_then(first_text);
                info.preprocessor_version = args.get(4).and_then(first_text);
                info.originating_system = args.get(5).and_then(first_text);
            }
            "FILE_SCHEMA" => {
                info.schema_version = args.first().and_then(first_text).unwrap_or_default();
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Text of a string token, or of the first string in a list token
fn first_text(token: &Token) -> Option<String> {
    match token.to_value() {
        Value::Text(s) => Some(s),
        Value::List(items) => items.into_iter().find_map(|v| match v {
            Value::Text(s) => Some(s),
            _ => None,
        }),
        _ => None,
    }
}

fn view_definition(description: &str) -> Option<&str> {
    let start = description.find("ViewDefinition [")? + "ViewDefinition [".len();
    let end = description[start..].find(']')? + start;
    Some(&description[start..end])
}

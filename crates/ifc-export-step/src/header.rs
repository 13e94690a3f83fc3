// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section configuration

use crate::literal::write_string;
use chrono::NaiveDateTime;

/// Timestamp layout used in FILE_NAME
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Metadata written to the HEADER section
#[derive(Clone, Debug, PartialEq)]
pub struct StepHeader {
    pub file_name: String,
    pub timestamp: NaiveDateTime,
    pub author: String,
    pub organization: String,
    pub preprocessor: String,
    pub originating_system: String,
    pub authorization: String,
    /// FILE_SCHEMA identifier, e.g. "IFC4"
    pub schema: String,
    /// Model view definition named in FILE_DESCRIPTION
    pub view_definition: String,
}

impl StepHeader {
    /// Header for `file_name` stamped with the current local time
    pub fn new(file_name: impl Into<String>, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        Self {
            file_name: file_name.into(),
            timestamp: chrono::Local::now().naive_local(),
            author: String::new(),
            organization: String::new(),
            preprocessor: concat!("ifc-export ", env!("CARGO_PKG_VERSION")).to_string(),
            originating_system: "ifc-export".to_string(),
            authorization: String::new(),
            view_definition: default_view_definition(&schema).to_string(),
            schema,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_originating_system(mut self, system: impl Into<String>) -> Self {
        self.originating_system = system.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Render the lines between `HEADER;` and `ENDSEC;`
    pub(crate) fn write_records(&self, out: &mut String) {
        out.push_str("FILE_DESCRIPTION((");
        write_string(out, &format!("ViewDefinition [{}]", self.view_definition));
        out.push_str("),'2;1');\n");

        out.push_str("FILE_NAME(");
        write_string(out, &self.file_name);
        out.push(',');
        write_string(out, &self.timestamp.format(TIMESTAMP_FORMAT).to_string());
        out.push_str(",(");
        write_string(out, &self.author);
        out.push_str("),(");
        write_string(out, &self.organization);
        out.push_str("),");
        write_string(out, &self.preprocessor);
        out.push(',');
        write_string(out, &self.originating_system);
        out.push(',');
        write_string(out, &self.authorization);
        out.push_str(");\n");

        out.push_str("FILE_SCHEMA((");
        write_string(out, &self.schema);
        out.push_str("));\n");
    }
}

/// Model view definition matching a schema
pub fn default_view_definition(schema: &str) -> &'static str {
    if schema.eq_ignore_ascii_case("IFC2X3") {
        "CoordinationView_V2.0"
    } else {
        "ReferenceView_V1.2"
    }
}

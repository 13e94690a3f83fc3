// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export summary and advisory messages

use ifc_export_model::EmitCounts;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Advisory notices collected during an export, deduplicated and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Messages(BTreeSet<String>);

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.0.insert(message.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

/// Outcome of one export
///
/// Rendered whether or not the export succeeded: on failure `error` holds the
/// message and `counts` whatever was emitted before the failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    /// Emitted instances per type name
    pub counts: EmitCounts,
    pub elapsed: Duration,
    /// Empty on success
    pub error: String,
    /// Sorted, without duplicates
    pub messages: Vec<String>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Total emitted instances
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            writeln!(
                f,
                "Exported {} entities to {} in {:.2}s",
                self.total(),
                self.path.display(),
                self.elapsed.as_secs_f64()
            )?;
        } else {
            writeln!(f, "Export to {} failed: {}", self.path.display(), self.error)?;
        }

        for (type_name, count) in &self.counts {
            writeln!(f, "  {} {}", count, type_name)?;
        }

        if !self.messages.is_empty() {
            writeln!(f, "Messages:")?;
            for message in &self.messages {
                writeln!(f, "  {}", message)?;
            }
        }
        Ok(())
    }
}

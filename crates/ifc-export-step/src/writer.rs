// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP physical file writer
//!
//! A single pass over the graph moves the writer through three sections:
//! `Header` until the HEADER block is written, `Data` while instance lines
//! are appended, `Done` once the trailer is out. Calls made in the wrong
//! section fail with [`StepError::InvalidState`].

use crate::header::StepHeader;
use crate::literal::write_attribute;
use crate::{Result, StepError};
use ifc_export_model::{EmitCounts, EntityGraph, EntityInstance};
use std::fmt::Write;

/// Section the writer is currently in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Header,
    Data,
    Done,
}

impl WriterState {
    fn name(self) -> &'static str {
        match self {
            WriterState::Header => "HEADER",
            WriterState::Data => "DATA",
            WriterState::Done => "closed",
        }
    }
}

/// Streaming Part-21 writer over an in-memory buffer
pub struct StepWriter<'g, 'r> {
    graph: &'g EntityGraph<'r>,
    header: StepHeader,
    state: WriterState,
    out: String,
}

impl<'g, 'r> StepWriter<'g, 'r> {
    pub fn new(graph: &'g EntityGraph<'r>, header: StepHeader) -> Self {
        Self {
            graph,
            header,
            state: WriterState::Header,
            out: String::with_capacity(graph.len() * 96 + 512),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Write the HEADER section and open DATA
    pub fn write_header(&mut self) -> Result<()> {
        self.expect(WriterState::Header, "write the header")?;

        self.out.push_str("ISO-10303-21;\nHEADER;\n");
        self.header.write_records(&mut self.out);
        self.out.push_str("ENDSEC;\nDATA;\n");

        self.state = WriterState::Data;
        Ok(())
    }

    /// Validate and append one `#id=TYPE(...);` line
    pub fn write_instance(&mut self, instance: &EntityInstance) -> Result<()> {
        self.expect(WriterState::Data, "write an instance")?;
        self.graph.validate(instance)?;

        let entity_type = instance.entity_type();
        let mut line = String::with_capacity(96);
        let _ = write!(line, "{}={}(", instance.id(), entity_type.step_name());
        for (i, (attribute, value)) in entity_type
            .attributes()
            .iter()
            .zip(instance.values())
            .enumerate()
        {
            if i > 0 {
                line.push(',');
            }
            write_attribute(&mut line, entity_type, attribute, value)?;
        }
        line.push_str(");\n");

        self.out.push_str(&line);
        Ok(())
    }

    /// Close DATA and the exchange structure, returning the file text
    pub fn finish(mut self) -> Result<String> {
        self.expect(WriterState::Data, "finish the file")?;
        self.out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        self.state = WriterState::Done;
        Ok(self.out)
    }

    fn expect(&self, state: WriterState, action: &'static str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(StepError::InvalidState {
                state: self.state.name(),
                action,
            })
        }
    }
}

/// Encode a whole graph as a Part-21 document
///
/// Instances are written in registration order. `counts` is updated as each
/// line is written so a failure still leaves the counts of what came before.
pub fn encode(graph: &EntityGraph<'_>, header: StepHeader, counts: &mut EmitCounts) -> Result<String> {
    log::debug!("Encoding {} instances as STEP ({})", graph.len(), header.schema);

    let mut writer = StepWriter::new(graph, header);
    writer.write_header()?;
    for instance in graph.all() {
        writer.write_instance(instance)?;
        *counts.entry(instance.type_name()).or_insert(0) += 1;
    }
    writer.finish()
}

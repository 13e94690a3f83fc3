// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export session: populate one graph, encode it once, write the file

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::ping::{self, PingEvent, UsagePing};
use crate::scene::{self, Scene};
use crate::summary::{ExportSummary, Messages};
use ifc_export_ifcx::IfcxHeader;
use ifc_export_model::{EmitCounts, EntityGraph, Registry};
use ifc_export_step::StepHeader;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Output encodings, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.ifc`, STEP Part-21
    Step,
    /// `.ifcx`, JSON scene graph
    Ifcx,
}

impl OutputFormat {
    /// Pick the encoder for a destination path (case-insensitive extension)
    ///
    /// `.ifcZip` needs an archive writer and is reported as unsupported, as is
    /// any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ifc" => Ok(OutputFormat::Step),
            "ifcx" => Ok(OutputFormat::Ifcx),
            "ifczip" => Err(ExportError::unsupported_format(".ifcZip archives are not written by this engine")),
            "" => Err(ExportError::unsupported_format(format!("{} has no extension", path.display()))),
            other => Err(ExportError::unsupported_format(format!(".{}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Step => "ifc",
            OutputFormat::Ifcx => "ifcx",
        }
    }
}

/// State of one export
///
/// Owns the entity graph and the advisory messages. [`export`](Self::export)
/// consumes the session, so a graph is encoded exactly once.
pub struct ExportSession<'r> {
    graph: EntityGraph<'r>,
    options: ExportOptions,
    messages: Messages,
    /// First population failure, reported by [`export`](Self::export)
    population_error: Option<String>,
    ping: Option<Arc<dyn UsagePing>>,
}

impl<'r> ExportSession<'r> {
    pub fn new(registry: &'r Registry, options: ExportOptions) -> Self {
        Self {
            graph: EntityGraph::new(registry),
            options,
            messages: Messages::new(),
            population_error: None,
            ping: None,
        }
    }

    /// Send a usage ping after each successful export
    pub fn with_ping(mut self, ping: Arc<dyn UsagePing>) -> Self {
        self.ping = Some(ping);
        self
    }

    pub fn graph(&self) -> &EntityGraph<'r> {
        &self.graph
    }

    /// Graph access for walkers that register instances directly
    pub fn graph_mut(&mut self) -> &mut EntityGraph<'r> {
        &mut self.graph
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Record an advisory notice for the summary
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.add(message);
    }

    /// Add a scene's instances to the graph
    ///
    /// A failure is also kept for the summary: the following
    /// [`export`](Self::export) reports it and writes nothing.
    pub fn populate(&mut self, scene: &Scene) -> Result<()> {
        let result = scene::populate(scene, &mut self.graph, &self.options, &mut self.messages);
        if let Err(e) = &result {
            log::error!("Scene population failed: {}", e);
            self.population_error.get_or_insert_with(|| e.to_string());
        }
        result
    }

    /// Encode the graph to `path` and report the outcome
    ///
    /// Never fails: errors end up in [`ExportSummary::error`]. Nothing is
    /// written unless the whole document encoded.
    pub fn export(mut self, path: impl AsRef<Path>) -> ExportSummary {
        let path = path.as_ref();
        let start = Instant::now();
        let mut counts = EmitCounts::new();

        let result = match self.population_error.take() {
            Some(error) => Err(error),
            None => self.write(path, &mut counts).map_err(|e| e.to_string()),
        };
        let elapsed = start.elapsed();

        let error = match result {
            Ok(format) => {
                log::info!(
                    "Exported {} instances to {} in {:?}",
                    counts.values().sum::<usize>(),
                    path.display(),
                    elapsed
                );
                if let Some(usage) = &self.ping {
                    let event = PingEvent {
                        format: format.name(),
                        entity_count: counts.values().sum(),
                        version: env!("CARGO_PKG_VERSION"),
                    };
                    // Detached
                    let _ = ping::spawn(usage.clone(), event);
                }
                String::new()
            }
            Err(error) => {
                log::error!("Export to {} failed: {}", path.display(), error);
                error
            }
        };

        ExportSummary {
            path: path.to_path_buf(),
            counts,
            elapsed,
            error,
            messages: self.messages.into_vec(),
        }
    }

    /// Render the whole document in memory, then write it
    fn write(&self, path: &Path, counts: &mut EmitCounts) -> Result<OutputFormat> {
        let format = OutputFormat::from_path(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        log::debug!("Encoding {} instances as {}", self.graph.len(), format.name());
        let content = match format {
            OutputFormat::Step => {
                let header = StepHeader::new(file_name, self.graph.registry().schema_identifier())
                    .with_author(self.options.author.clone())
                    .with_organization(self.options.organization.clone())
                    .with_originating_system(self.options.application.clone());
                ifc_export_step::encode(&self.graph, header, counts)?
            }
            OutputFormat::Ifcx => {
                let header = IfcxHeader::new(file_name).with_author(self.options.author.clone());
                ifc_export_ifcx::encode(&self.graph, header, counts)?
            }
        };

        std::fs::write(path, content)?;
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneNode, SeedValue};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scene() -> Scene {
        let wall = SceneNode::new("IfcWall").with("Name", SeedValue::text("Wall 1"));
        let site = SceneNode::new("IfcSite")
            .with("Name", SeedValue::text("Site"))
            .with_child(wall);
        Scene {
            root: SceneNode::new("IfcProject")
                .with("Name", SeedValue::text("Demo"))
                .with_child(site),
            resources: Vec::new(),
        }
    }

    fn session() -> ExportSession<'static> {
        let mut session = ExportSession::new(Registry::ifc4().unwrap(), ExportOptions::default());
        session.populate(&scene()).unwrap();
        session
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.IFC")).unwrap(), OutputFormat::Step);
        assert_eq!(OutputFormat::from_path(Path::new("a.ifcx")).unwrap(), OutputFormat::Ifcx);
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.ifcZip")),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_path(Path::new("a.txt")).is_err());
        assert!(OutputFormat::from_path(Path::new("model")).is_err());
    }

    #[test]
    fn test_step_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.ifc");

        let summary = session().export(&path);
        assert!(summary.is_success(), "{}", summary.error);
        assert_eq!(summary.counts.get("IfcProject"), Some(&1));
        assert_eq!(summary.counts.get("IfcWall"), Some(&1));
        assert_eq!(summary.counts.get("IfcRelAggregates"), Some(&1));
        assert_eq!(summary.counts.get("IfcRelContainedInSpatialStructure"), Some(&1));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ISO-10303-21;\n"));
        assert!(text.contains("FILE_NAME('demo.ifc'"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));"));

        let doc = ifc_export_step::read(&text).unwrap();
        assert_eq!(doc.records.len(), summary.total());
    }

    #[test]
    fn test_ifcx_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.ifcx");

        let summary = session().export(&path);
        assert!(summary.is_success(), "{}", summary.error);
        assert_eq!(summary.counts.get("IfcProject"), Some(&1));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["header"]["id"], "demo.ifcx");
        assert!(json["data"].as_array().unwrap().len() > 2);
    }

    #[test]
    fn test_failed_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ifc");

        let mut session = session();
        session
            .graph_mut()
            .register("IfcLocalPlacement", Vec::<(&str, ifc_export_model::Value)>::new())
            .unwrap();
        session.add_message("note");

        let summary = session.export(&path);
        assert!(!summary.is_success());
        assert!(summary.error.contains("RelativePlacement"));
        // Instances before the broken one were counted
        assert_eq!(summary.counts.get("IfcProject"), Some(&1));
        assert_eq!(summary.messages, vec!["note"]);
        assert!(!path.exists());
    }

    #[test]
    fn test_population_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.ifc");

        let mut broken = scene();
        broken
            .root
            .attributes
            .insert("Colour".to_string(), SeedValue::text("red"));

        let mut session = ExportSession::new(Registry::ifc4().unwrap(), ExportOptions::default());
        assert!(session.populate(&broken).is_err());

        let summary = session.export(&path);
        assert!(!summary.is_success());
        assert!(summary.error.contains("Colour"), "{}", summary.error);
        assert!(summary.counts.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_unsupported_format_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let summary = session().export(dir.path().join("demo.ifcZip"));
        assert!(summary.error.starts_with("Unsupported output format"));
        assert!(summary.counts.is_empty());
    }

    #[test]
    fn test_ping_after_success_only() {
        struct Counting(AtomicUsize);
        impl UsagePing for Counting {
            fn send(&self, _: &PingEvent) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let ping = Arc::new(Counting(AtomicUsize::new(0)));

        let summary = session()
            .with_ping(ping.clone())
            .export(dir.path().join("demo.txt"));
        assert!(!summary.is_success());
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(ping.0.load(Ordering::SeqCst), 0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCX document assembly

use crate::hierarchy::Hierarchy;
use crate::nodes::{
    classification_nodes, hierarchy_nodes, material_association_nodes,
    mesh_nodes, object_attributes, object_node, placement_node, property_nodes,
    styled_item_node, surface_style_node,
};
use crate::pretty::{strip_empty, to_ifcx_string};
use chrono::NaiveDateTime;
use ifc_export_model::identity::uuid5;
use ifc_export_model::{EmitCounts, EntityGraph, EntityInstance, ModelError, Result};
use serde_json::{json, Value as Json};

/// Timestamp layout of the IFCX header
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Schemas every document imports
pub const IMPORTS: &[&str] = &[
    "https://ifcx.dev/@standards.buildingsmart.org/ifc/core/ifc@v5a.ifcx",
    "https://ifcx.dev/@standards.buildingsmart.org/ifc/core/prop@v5a.ifcx",
    "https://ifcx.dev/@standards.buildingsmart.org/ifc/ifc-mat/ifc-mat@v1.0.0.ifcx",
    "https://ifcx.dev/@openusd.org/usd@v1.ifcx",
    "https://ifcx.dev/@nlsfb/nlsfb@v1.ifcx",
];

/// Metadata written to the `header` object
#[derive(Clone, Debug, PartialEq)]
pub struct IfcxHeader {
    /// Output file name
    pub id: String,
    pub author: String,
    pub timestamp: NaiveDateTime,
}

impl IfcxHeader {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: String::new(),
            timestamp: chrono::Local::now().naive_local(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn to_json(&self) -> Json {
        json!({
            "id": self.id,
            "ifcxVersion": "ifcx_alpha",
            "dataVersion": "1.0.0",
            "author": self.author,
            "timestamp": self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// Whether an instance contributes nodes to the `data` section
pub fn is_retained(instance: &EntityInstance) -> bool {
    const RETAINED: &[&str] = &[
        "IfcProject",
        "IfcMaterial",
        "IfcProduct",
        "IfcStyledItem",
        "IfcSurfaceStyle",
        "IfcTypeProduct",
        "IfcTriangulatedFaceSet",
        "IfcLocalPlacement",
        "IfcRelAssociatesMaterial",
        "IfcRelDefinesByProperties",
        "IfcRelAssociatesClassification",
    ];
    RETAINED.iter().any(|t| instance.is_a(t))
}

/// Encode a graph as an IFCX document
///
/// Every instance is checked with [`EntityGraph::validate`] first, so a graph
/// that fails STEP encoding fails here too. `counts` receives one entry per
/// retained instance that produced at least one node.
pub fn encode(graph: &EntityGraph<'_>, header: IfcxHeader, counts: &mut EmitCounts) -> Result<String> {
    log::debug!("Encoding {} instances as IFCX", graph.len());

    for instance in graph.all() {
        graph.validate(instance)?;
    }

    let document = json!({
        "header": header.to_json(),
        "imports": IMPORTS.iter().map(|uri| json!({ "uri": uri })).collect::<Vec<_>>(),
        "schemas": {},
        "data": data_section(graph, counts)?,
    });

    Ok(to_ifcx_string(&document))
}

fn data_section(graph: &EntityGraph<'_>, counts: &mut EmitCounts) -> Result<Vec<Json>> {
    let project = graph
        .find_by_type("IfcProject")
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::missing_project_identity("graph has no IfcProject"))?;
    let project_name = project
        .text("Name")
        .ok_or_else(|| ModelError::missing_project_identity("IfcProject has no Name"))?;
    if project.global_id().is_none() {
        return Err(ModelError::missing_project_identity("IfcProject has no GlobalId"));
    }
    let project_uuid = graph.uuid5_for(project, "IfcProject").to_string();

    let project_attributes = object_attributes(project, graph);

    let mut data = vec![
        json!({
            "path": uuid5(project_name, &project_uuid).to_string(),
            "children": { project_name: project_uuid },
        }),
        json!({ "path": project_uuid, "attributes": project_attributes }),
    ];
    *counts.entry(project.type_name()).or_insert(0) += 1;

    let hierarchy = Hierarchy::build(graph);
    data.extend(hierarchy_nodes(&hierarchy, graph));

    for instance in graph.all().filter(|i| is_retained(i)) {
        if instance.id() == project.id() {
            continue;
        }

        let nodes = instance_nodes(instance, &hierarchy, graph);
        if nodes.is_empty() {
            continue;
        }
        *counts.entry(instance.type_name()).or_insert(0) += 1;
        data.extend(nodes);
    }

    Ok(data.into_iter().filter_map(strip_record).collect())
}

fn instance_nodes(instance: &EntityInstance, hierarchy: &Hierarchy, graph: &EntityGraph<'_>) -> Vec<Json> {
    match instance.type_name() {
        "IfcTriangulatedFaceSet" => mesh_nodes(instance, hierarchy, graph),
        "IfcLocalPlacement" => placement_node(instance, hierarchy, graph).into_iter().collect(),
        "IfcSurfaceStyle" => surface_style_node(instance, graph).into_iter().collect(),
        "IfcStyledItem" => styled_item_node(instance, graph).into_iter().collect(),
        "IfcRelAssociatesMaterial" => material_association_nodes(instance, graph),
        "IfcRelDefinesByProperties" => property_nodes(instance, graph),
        "IfcRelAssociatesClassification" => classification_nodes(instance, graph),
        _ => vec![object_node(instance, graph)],
    }
}

/// Strip empties inside a record and drop records left with only a path
fn strip_record(record: Json) -> Option<Json> {
    let record = strip_empty(record)?;
    let meaningful = record
        .as_object()
        .is_some_and(|map| map.keys().any(|k| k != "path"));
    meaningful.then_some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ifc_export_model::{Registry, Value};

    const PROJECT_ID: &str = "0$9GJWJub1qveC0mNeB3C1";
    const WALL_ID: &str = "2O2Fr$t4X7Zf8NOew3FLOH";

    fn header() -> IfcxHeader {
        let timestamp = NaiveDate::from_ymd_opt(2025, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 6)
            .unwrap();
        IfcxHeader::new("demo.ifcx")
            .with_author("Tester")
            .with_timestamp(timestamp)
    }

    fn demo_graph() -> EntityGraph<'static> {
        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let project = graph
            .register(
                "IfcProject",
                [("GlobalId", Value::text(PROJECT_ID)), ("Name", Value::text("Demo"))],
            )
            .unwrap()
            .id();
        let wall = graph
            .register(
                "IfcWall",
                [
                    ("GlobalId", Value::text(WALL_ID)),
                    ("Name", Value::text("Wall 1")),
                    ("Description", Value::text("")),
                    ("PredefinedType", Value::enumeration("NOTDEFINED")),
                ],
            )
            .unwrap()
            .id();
        graph
            .register(
                "IfcRelAggregates",
                [
                    ("GlobalId", Value::text("1kTvXnbbzCWw8lcMd1dR4o")),
                    ("RelatingObject", Value::Reference(project)),
                    ("RelatedObjects", Value::refs([wall])),
                ],
            )
            .unwrap();
        graph
    }

    fn encode_demo() -> Json {
        let text = encode(&demo_graph(), header(), &mut EmitCounts::new()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_top_level_sections() {
        let doc = encode_demo();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["header", "imports", "schemas", "data"]);

        assert_eq!(doc["header"]["id"], "demo.ifcx");
        assert_eq!(doc["header"]["ifcxVersion"], "ifcx_alpha");
        assert_eq!(doc["header"]["dataVersion"], "1.0.0");
        assert_eq!(doc["header"]["timestamp"], "2025-02-03T04:05:06");
        assert_eq!(doc["imports"].as_array().unwrap().len(), 5);
        assert_eq!(doc["schemas"], json!({}));
    }

    #[test]
    fn test_project_root() {
        let doc = encode_demo();
        let project_uuid = uuid5("IfcProject", PROJECT_ID).to_string();

        let root = &doc["data"][0];
        assert_eq!(root["path"], uuid5("Demo", &project_uuid).to_string());
        assert_eq!(root["children"]["Demo"], project_uuid);

        let project = &doc["data"][1];
        assert_eq!(project["path"], project_uuid);
        assert_eq!(project["attributes"]["bsi::ifc::class"]["code"], "IfcProject");
        assert_eq!(project["attributes"]["bsi::ifc::prop::Name"], "Demo");
    }

    #[test]
    fn test_hierarchy_and_exclusions() {
        let doc = encode_demo();
        let data = doc["data"].as_array().unwrap();
        let wall_path = uuid5("IfcWall", WALL_ID).to_string();

        let link = &data[2];
        assert_eq!(link["children"][format!("Wall 1 - {}", WALL_ID)], wall_path);

        let wall = data
            .iter()
            .find(|n| n["path"] == wall_path && n.get("attributes").is_some())
            .unwrap();
        let attributes = wall["attributes"].as_object().unwrap();
        assert!(!attributes.contains_key("bsi::ifc::prop::Description"));
        assert!(!attributes.contains_key("bsi::ifc::prop::PredefinedType"));
        assert!(!attributes.contains_key("bsi::ifc::prop::GlobalId"));
    }

    #[test]
    fn test_no_nulls_anywhere() {
        let text = encode(&demo_graph(), header(), &mut EmitCounts::new()).unwrap();
        assert!(!text.contains("null"));
        assert!(!text.contains("\"\""));
    }

    #[test]
    fn test_missing_project_identity() {
        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let err = encode(&graph, header(), &mut EmitCounts::new()).unwrap_err();
        assert!(matches!(err, ModelError::MissingProjectIdentity(_)));

        graph
            .register("IfcProject", [("GlobalId", Value::text(PROJECT_ID))])
            .unwrap();
        let err = encode(&graph, header(), &mut EmitCounts::new()).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingProjectIdentity("IfcProject has no Name".to_string())
        );
    }

    #[test]
    fn test_counts_retained_instances() {
        let mut counts = EmitCounts::new();
        encode(&demo_graph(), header(), &mut counts).unwrap();
        assert_eq!(counts.get("IfcProject"), Some(&1));
        assert_eq!(counts.get("IfcWall"), Some(&1));
        assert_eq!(counts.get("IfcRelAggregates"), None);
    }
}

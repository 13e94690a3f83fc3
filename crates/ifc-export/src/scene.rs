// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene input
//!
//! A scene is the walker's view of a model: a tree of products rooted at the
//! project, plus free-standing resources (placements, geometry, styles,
//! relationships) that tree nodes reference by key.
//!
//! ```json
//! {
//!   "root": {
//!     "key": "project", "type": "IfcProject",
//!     "attributes": { "Name": "Demo", "UnitsInContext": { "ref": "units" } },
//!     "children": [{ "type": "IfcSite", "attributes": { "Name": "Site" } }]
//!   },
//!   "resources": [
//!     { "key": "units", "type": "IfcUnitAssignment", "attributes": { "Units": [] } }
//!   ]
//! }
//! ```
//!
//! Population runs in three passes: register every node with its literal
//! attributes, fill in references once all keys have ids, then link each
//! parent to its children with `IfcRelAggregates` or
//! `IfcRelContainedInSpatialStructure`.

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::summary::Messages;
use ifc_export_model::identity::derived_global_id;
use ifc_export_model::{EntityGraph, EntityId, EntityType, ModelError, Value, ValueKind};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Longest label the exporter writes, in characters
pub const LABEL_LIMIT: usize = 255;

/// Scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub root: SceneNode,
    #[serde(default)]
    pub resources: Vec<SceneNode>,
}

/// One entity of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Handle other nodes use to reference this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, SeedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            key: None,
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: SeedValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Attribute value as written in a scene
///
/// Plain JSON scalars and arrays map to literals; objects carry the forms
/// JSON cannot express directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Unset,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    List(Vec<SeedValue>),
    /// `{"ref": "<key>"}`
    Ref {
        #[serde(rename = "ref")]
        key: String,
    },
    /// `{"enum": "TOKEN"}`
    Enum {
        #[serde(rename = "enum")]
        token: String,
    },
    /// `{"type": "IFCLABEL", "value": ...}`
    Typed {
        #[serde(rename = "type")]
        type_name: String,
        value: Box<SeedValue>,
    },
}

impl SeedValue {
    pub fn text(s: impl Into<String>) -> Self {
        SeedValue::Text(s.into())
    }

    pub fn reference(key: impl Into<String>) -> Self {
        SeedValue::Ref { key: key.into() }
    }

    pub fn enumeration(token: impl Into<String>) -> Self {
        SeedValue::Enum {
            token: token.into(),
        }
    }

    fn has_reference(&self) -> bool {
        match self {
            SeedValue::Ref { .. } => true,
            SeedValue::List(items) => items.iter().any(SeedValue::has_reference),
            SeedValue::Typed { value, .. } => value.has_reference(),
            _ => false,
        }
    }
}

impl Scene {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A node accepted for registration
struct Planned<'s> {
    node: &'s SceneNode,
    entity_type: Arc<EntityType>,
    /// Stable position in the scene, seeds derived GlobalIds
    path: String,
    /// Index of the parent in the plan, for tree nodes
    parent: Option<usize>,
}

/// Where a scene key points
enum Target {
    Registered(EntityId),
    Dropped,
}

/// Populate `graph` from `scene`
///
/// Nodes whose type an option switches off are skipped together with their
/// subtree; references to them are unset, or removed from lists, and noted in
/// `messages`.
pub fn populate(
    scene: &Scene,
    graph: &mut EntityGraph<'_>,
    options: &ExportOptions,
    messages: &mut Messages,
) -> Result<()> {
    let mut plan = Vec::new();
    let mut dropped = FxHashSet::default();

    for (i, node) in scene.resources.iter().enumerate() {
        let path = format!("resources/{}", node.key.clone().unwrap_or_else(|| i.to_string()));
        plan_node(node, path, None, graph, options, &mut plan, &mut dropped, messages)?;
    }
    let root_path = scene
        .root
        .key
        .clone()
        .unwrap_or_else(|| scene.root.type_name.clone());
    plan_node(&scene.root, root_path, None, graph, options, &mut plan, &mut dropped, messages)?;

    // Literals
    let mut targets: FxHashMap<&str, Target> = dropped
        .iter()
        .map(|key: &&str| (*key, Target::Dropped))
        .collect();
    let mut ids = Vec::with_capacity(plan.len());
    let mut deferred = Vec::new();

    for (index, planned) in plan.iter().enumerate() {
        let seed = literal_seed(planned, index, options, &mut deferred, messages)?;
        let id = graph.register(planned.entity_type.name(), seed)?.id();
        ids.push(id);

        if let Some(key) = planned.node.key.as_deref() {
            if targets.insert(key, Target::Registered(id)).is_some() {
                return Err(ExportError::DuplicateKey(key.to_string()));
            }
        }
    }

    // References
    for (index, name, seed) in deferred {
        let kind = attribute_kind(&plan[index].entity_type, name)?;
        let value = convert(seed, kind, &targets, messages)?;
        graph.set_attribute(ids[index], name, value)?;
    }

    link_children(&plan, &ids, graph)?;

    log::debug!(
        "Populated {} scene nodes, skipped {} keyed nodes",
        plan.len(),
        dropped.len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn plan_node<'s>(
    node: &'s SceneNode,
    path: String,
    parent: Option<usize>,
    graph: &EntityGraph<'_>,
    options: &ExportOptions,
    plan: &mut Vec<Planned<'s>>,
    dropped: &mut FxHashSet<&'s str>,
    messages: &mut Messages,
) -> Result<()> {
    let entity_type = graph.registry().resolve(&node.type_name)?;

    if let Some(option) = options.dropped_by(&entity_type) {
        messages.add(format!("{} skipped: {} export disabled", entity_type.name(), option));
        mark_dropped(node, dropped);
        return Ok(());
    }

    let index = plan.len();
    plan.push(Planned {
        node,
        entity_type,
        path: path.clone(),
        parent,
    });

    for (i, child) in node.children.iter().enumerate() {
        let segment = child
            .key
            .clone()
            .unwrap_or_else(|| format!("{}[{}]", child.type_name, i));
        let child_path = format!("{}/{}", path, segment);
        plan_node(child, child_path, Some(index), graph, options, plan, dropped, messages)?;
    }
    Ok(())
}

fn mark_dropped<'s>(node: &'s SceneNode, dropped: &mut FxHashSet<&'s str>) {
    if let Some(key) = node.key.as_deref() {
        dropped.insert(key);
    }
    for child in &node.children {
        mark_dropped(child, dropped);
    }
}

/// Seed values that need no key lookup, plus the defaults the scene omits
fn literal_seed<'s>(
    planned: &Planned<'s>,
    index: usize,
    options: &ExportOptions,
    deferred: &mut Vec<(usize, &'s str, &'s SeedValue)>,
    messages: &mut Messages,
) -> Result<Vec<(String, Value)>> {
    let node: &'s SceneNode = planned.node;
    let entity_type = &planned.entity_type;
    let no_targets = FxHashMap::default();
    let mut seed = Vec::new();

    for (name, value) in &node.attributes {
        let kind = attribute_kind(entity_type, name)?;
        if value.has_reference() {
            deferred.push((index, name.as_str(), value));
            continue;
        }

        let value = convert(value, kind, &no_targets, messages)?;
        let value = if name == "Name" {
            limit_label(value, messages)
        } else {
            value
        };
        seed.push((name.clone(), value));
    }

    let seeded = |name: &str| node.attributes.contains_key(name);

    if entity_type.attribute("GlobalId").is_some() && !seeded("GlobalId") {
        let global_id = derived_global_id(entity_type.name(), &planned.path);
        seed.push(("GlobalId".to_string(), Value::Text(global_id)));
    }
    if entity_type.is_subtype_of("IfcSurfaceStyle") && !seeded("Side") {
        seed.push(("Side".to_string(), Value::enumeration(options.surface_side())));
    }
    if entity_type.is_subtype_of("IfcShapeRepresentation") && !seeded("RepresentationType") {
        if let Some(representation_type) = options.geometry.representation_type() {
            seed.push(("RepresentationType".to_string(), Value::text(representation_type)));
        }
    }

    Ok(seed)
}

fn attribute_kind<'t>(entity_type: &'t EntityType, name: &str) -> Result<&'t ValueKind> {
    entity_type
        .attribute(name)
        .map(|attr| &attr.kind)
        .ok_or_else(|| ModelError::unknown_attribute(entity_type.name(), name).into())
}

/// Convert a seed for a slot of `kind`
///
/// Integers are widened in real slots and strings become tokens in
/// enumeration slots. References to dropped nodes convert to `Unset` and are
/// filtered out of lists.
fn convert(
    seed: &SeedValue,
    kind: &ValueKind,
    targets: &FxHashMap<&str, Target>,
    messages: &mut Messages,
) -> Result<Value> {
    let value = match (seed, kind) {
        (SeedValue::Unset, _) => Value::Unset,
        (SeedValue::Integer(i), ValueKind::Real) => Value::Real(*i as f64),
        (SeedValue::Text(s), ValueKind::Enum) => Value::Enum(s.to_uppercase()),
        (SeedValue::Bool(b), _) => Value::Bool(*b),
        (SeedValue::Integer(i), _) => Value::Integer(*i),
        (SeedValue::Real(f), _) => Value::Real(*f),
        (SeedValue::Text(s), _) => Value::Text(s.clone()),
        (SeedValue::Enum { token }, _) => Value::Enum(token.to_uppercase()),
        (SeedValue::List(items), _) => {
            let inner = match kind {
                ValueKind::List(inner) => *inner,
                other => other,
            };
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let value = convert(item, inner, targets, messages)?;
                if !value.is_unset() {
                    values.push(value);
                }
            }
            Value::List(values)
        }
        (SeedValue::Typed { type_name, value }, _) => {
            let type_name = type_name.to_uppercase();
            let inner = convert(value, typed_kind(&type_name), targets, messages)?;
            limit_typed_label(Value::typed(type_name, inner), messages)
        }
        (SeedValue::Ref { key }, _) => match targets.get(key.as_str()) {
            Some(Target::Registered(id)) => Value::Reference(*id),
            Some(Target::Dropped) => {
                log::warn!("Dropping reference to skipped scene node '{}'", key);
                messages.add(format!("Reference to skipped '{}' removed", key));
                Value::Unset
            }
            None => return Err(ExportError::UnknownKey(key.clone())),
        },
    };
    Ok(value)
}

/// Kind of the value wrapped by a defined type
fn typed_kind(type_name: &str) -> &'static ValueKind {
    match type_name {
        "IFCREAL" => &ValueKind::Real,
        "IFCINTEGER" | "IFCCOUNTMEASURE" => &ValueKind::Integer,
        "IFCBOOLEAN" | "IFCLOGICAL" => &ValueKind::Boolean,
        name if name.ends_with("MEASURE") => &ValueKind::Real,
        _ => &ValueKind::Text,
    }
}

fn limit_label(value: Value, messages: &mut Messages) -> Value {
    match value {
        Value::Text(s) if s.chars().count() > LABEL_LIMIT => {
            messages.add(format!("IfcLabel truncated to maximum of {} characters", LABEL_LIMIT));
            Value::Text(s.chars().take(LABEL_LIMIT).collect())
        }
        other => other,
    }
}

fn limit_typed_label(value: Value, messages: &mut Messages) -> Value {
    match value {
        Value::Typed(type_name, inner) if type_name == "IFCLABEL" || type_name == "IFCIDENTIFIER" => {
            Value::Typed(type_name, Box::new(limit_label(*inner, messages)))
        }
        other => other,
    }
}

/// Register the decomposition relationships of the tree
fn link_children(plan: &[Planned<'_>], ids: &[EntityId], graph: &mut EntityGraph<'_>) -> Result<()> {
    // Plan order is pre-order, so children stay in scene order
    let mut children: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (index, planned) in plan.iter().enumerate() {
        if let Some(parent) = planned.parent {
            children.entry(parent).or_default().push(index);
        }
    }

    for (index, parent) in plan.iter().enumerate() {
        let Some(child_indices) = children.get(&index) else {
            continue;
        };
        let mut aggregated = Vec::new();
        let mut contained = Vec::new();

        for &child_index in child_indices {
            let child = &plan[child_index];
            let is_containment = parent.entity_type.is_subtype_of("IfcSpatialStructureElement")
                && !child.entity_type.is_subtype_of("IfcSpatialElement");
            if is_containment {
                contained.push(ids[child_index]);
            } else {
                aggregated.push(ids[child_index]);
            }
        }

        let parent_id = ids[index];
        if !aggregated.is_empty() {
            graph.register(
                "IfcRelAggregates",
                [
                    ("GlobalId", Value::Text(derived_global_id("IfcRelAggregates", &parent.path))),
                    ("RelatingObject", Value::Reference(parent_id)),
                    ("RelatedObjects", Value::refs(aggregated)),
                ],
            )?;
        }
        if !contained.is_empty() {
            graph.register(
                "IfcRelContainedInSpatialStructure",
                [
                    (
                        "GlobalId",
                        Value::Text(derived_global_id("IfcRelContainedInSpatialStructure", &parent.path)),
                    ),
                    ("RelatedElements", Value::refs(contained)),
                    ("RelatingStructure", Value::Reference(parent_id)),
                ],
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GeometryMode;
    use ifc_export_model::identity::GLOBAL_ID_LEN;
    use ifc_export_model::Registry;

    fn populated(scene: &Scene, options: &ExportOptions) -> (EntityGraph<'static>, Messages) {
        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let mut messages = Messages::new();
        populate(scene, &mut graph, options, &mut messages).unwrap();
        (graph, messages)
    }

    fn building_scene() -> Scene {
        let wall = SceneNode::new("IfcWall")
            .with_key("wall")
            .with("Name", SeedValue::text("Wall 1"))
            .with("ObjectPlacement", SeedValue::reference("wall-placement"));
        let storey = SceneNode::new("IfcBuildingStorey")
            .with_key("storey")
            .with("Name", SeedValue::text("Ground floor"))
            .with_child(wall);
        let root = SceneNode::new("IfcProject")
            .with_key("project")
            .with("Name", SeedValue::text("Demo"))
            .with_child(storey);

        Scene {
            root,
            resources: vec![
                SceneNode::new("IfcLocalPlacement")
                    .with_key("wall-placement")
                    .with("RelativePlacement", SeedValue::reference("axis")),
                SceneNode::new("IfcAxis2Placement3D")
                    .with_key("axis")
                    .with("Location", SeedValue::reference("origin")),
                SceneNode::new("IfcCartesianPoint").with_key("origin").with(
                    "Coordinates",
                    SeedValue::List(vec![SeedValue::Integer(0), SeedValue::Integer(0), SeedValue::Real(1.5)]),
                ),
            ],
        }
    }

    #[test]
    fn test_forward_references_resolve() {
        let (graph, messages) = populated(&building_scene(), &ExportOptions::default());
        assert!(messages.is_empty());

        let placement = graph.find_by_type("IfcLocalPlacement")[0];
        let axis = graph.find_by_type("IfcAxis2Placement3D")[0];
        assert_eq!(placement.reference("RelativePlacement"), Some(axis.id()));

        let point = graph.find_by_type("IfcCartesianPoint")[0];
        assert_eq!(point.get("Coordinates"), Some(&Value::reals([0.0, 0.0, 1.5])));

        for instance in graph.all() {
            graph.validate(instance).unwrap();
        }
    }

    #[test]
    fn test_children_become_relationships() {
        let (graph, _) = populated(&building_scene(), &ExportOptions::default());
        let project = graph.find_by_type("IfcProject")[0].id();
        let storey = graph.find_by_type("IfcBuildingStorey")[0].id();
        let wall = graph.find_by_type("IfcWall")[0].id();

        let aggregates = graph.find_by_type("IfcRelAggregates");
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].reference("RelatingObject"), Some(project));
        assert_eq!(aggregates[0].references("RelatedObjects"), vec![storey]);

        let containment = graph.find_by_type("IfcRelContainedInSpatialStructure");
        assert_eq!(containment.len(), 1);
        assert_eq!(containment[0].reference("RelatingStructure"), Some(storey));
        assert_eq!(containment[0].references("RelatedElements"), vec![wall]);
    }

    #[test]
    fn test_missing_global_ids_are_deterministic() {
        let (first, _) = populated(&building_scene(), &ExportOptions::default());
        let (second, _) = populated(&building_scene(), &ExportOptions::default());

        let ids = |graph: &EntityGraph<'_>| -> Vec<String> {
            graph
                .all()
                .filter_map(|i| i.global_id().map(str::to_string))
                .collect()
        };
        let first_ids = ids(&first);
        assert_eq!(first_ids.len(), 5);
        assert!(first_ids.iter().all(|id| id.len() == GLOBAL_ID_LEN));
        assert_eq!(first_ids, ids(&second));

        let unique: FxHashSet<_> = first_ids.iter().collect();
        assert_eq!(unique.len(), first_ids.len());
    }

    #[test]
    fn test_disabled_category_is_dropped() {
        let mut scene = building_scene();
        scene.resources.push(
            SceneNode::new("IfcMaterial")
                .with_key("brick")
                .with("Name", SeedValue::text("Brick")),
        );
        scene.resources.push(
            SceneNode::new("IfcRelAssociatesMaterial")
                .with("RelatedObjects", SeedValue::List(vec![SeedValue::reference("wall")]))
                .with("RelatingMaterial", SeedValue::reference("brick")),
        );

        let options = ExportOptions {
            materials: false,
            ..Default::default()
        };
        let (graph, messages) = populated(&scene, &options);
        assert!(graph.find_by_type("IfcMaterial").is_empty());
        assert!(graph.find_by_type("IfcRelAssociatesMaterial").is_empty());
        assert_eq!(
            messages.iter().collect::<Vec<_>>(),
            vec![
                "IfcMaterial skipped: materials export disabled",
                "IfcRelAssociatesMaterial skipped: materials export disabled",
            ]
        );
    }

    #[test]
    fn test_references_to_dropped_nodes_are_removed() {
        let mut scene = building_scene();
        scene.resources.push(
            SceneNode::new("IfcPresentationLayerAssignment")
                .with("Name", SeedValue::text("Walls"))
                .with(
                    "AssignedItems",
                    SeedValue::List(vec![SeedValue::reference("styled"), SeedValue::reference("axis")]),
                ),
        );
        scene.resources.push(
            SceneNode::new("IfcStyledItem")
                .with_key("styled")
                .with("Styles", SeedValue::List(vec![])),
        );

        let options = ExportOptions {
            colors: false,
            ..Default::default()
        };
        let (graph, messages) = populated(&scene, &options);
        let layer = graph.find_by_type("IfcPresentationLayerAssignment")[0];
        let axis = graph.find_by_type("IfcAxis2Placement3D")[0].id();
        assert_eq!(layer.references("AssignedItems"), vec![axis]);
        assert!(messages.iter().any(|m| m == "Reference to skipped 'styled' removed"));
    }

    #[test]
    fn test_geometry_none_unsets_representation() {
        let mut scene = building_scene();
        scene.root.children[0].children[0]
            .attributes
            .insert("Representation".to_string(), SeedValue::reference("shape"));
        scene.resources.push(
            SceneNode::new("IfcProductDefinitionShape")
                .with_key("shape")
                .with("Representations", SeedValue::List(vec![])),
        );

        let options = ExportOptions {
            geometry: GeometryMode::None,
            ..Default::default()
        };
        let (graph, _) = populated(&scene, &options);
        let wall = graph.find_by_type("IfcWall")[0];
        assert_eq!(wall.get("Representation"), Some(&Value::Unset));
        assert!(wall.reference("ObjectPlacement").is_some());
    }

    fn shape_scene() -> Scene {
        let mut scene = building_scene();
        scene.resources.extend([
            SceneNode::new("IfcGeometricRepresentationContext")
                .with_key("body-context")
                .with("ContextType", SeedValue::text("Model"))
                .with("CoordinateSpaceDimension", SeedValue::Integer(3)),
            SceneNode::new("IfcShapeRepresentation")
                .with("ContextOfItems", SeedValue::reference("body-context"))
                .with(
                    "Items",
                    SeedValue::List(vec![SeedValue::reference("solid"), SeedValue::reference("mesh")]),
                ),
            SceneNode::new("IfcClosedShell")
                .with_key("shell")
                .with("CfsFaces", SeedValue::List(vec![])),
            SceneNode::new("IfcFacetedBrep")
                .with_key("solid")
                .with("Outer", SeedValue::reference("shell")),
            SceneNode::new("IfcCartesianPointList3D").with_key("points").with(
                "CoordList",
                SeedValue::List(vec![
                    SeedValue::List(vec![SeedValue::Real(0.0), SeedValue::Real(0.0), SeedValue::Real(0.0)]),
                    SeedValue::List(vec![SeedValue::Real(1.0), SeedValue::Real(0.0), SeedValue::Real(0.0)]),
                    SeedValue::List(vec![SeedValue::Real(0.0), SeedValue::Real(1.0), SeedValue::Real(0.0)]),
                ]),
            ),
            SceneNode::new("IfcTriangulatedFaceSet")
                .with_key("mesh")
                .with("Coordinates", SeedValue::reference("points"))
                .with(
                    "CoordIndex",
                    SeedValue::List(vec![SeedValue::List(vec![
                        SeedValue::Integer(1),
                        SeedValue::Integer(2),
                        SeedValue::Integer(3),
                    ])]),
                ),
        ]);
        scene
    }

    #[test]
    fn test_brep_mode_drops_tessellated_items() {
        let (graph, messages) = populated(&shape_scene(), &ExportOptions::default());
        assert!(graph.find_by_type("IfcTriangulatedFaceSet").is_empty());
        assert!(graph.find_by_type("IfcCartesianPointList3D").is_empty());

        let solid = graph.find_by_type("IfcFacetedBrep")[0].id();
        let representation = graph.find_by_type("IfcShapeRepresentation")[0];
        assert_eq!(representation.references("Items"), vec![solid]);
        assert_eq!(representation.text("RepresentationType"), Some("Brep"));
        assert!(messages
            .iter()
            .any(|m| m == "IfcTriangulatedFaceSet skipped: tessellation export disabled"));
    }

    #[test]
    fn test_tessellation_mode_drops_brep_solids() {
        let options = ExportOptions {
            geometry: GeometryMode::Tessellation,
            ..Default::default()
        };
        let (graph, messages) = populated(&shape_scene(), &options);
        assert!(graph.find_by_type("IfcFacetedBrep").is_empty());
        assert!(graph.find_by_type("IfcClosedShell").is_empty());

        let mesh = graph.find_by_type("IfcTriangulatedFaceSet")[0].id();
        let representation = graph.find_by_type("IfcShapeRepresentation")[0];
        assert_eq!(representation.references("Items"), vec![mesh]);
        assert_eq!(representation.text("RepresentationType"), Some("Tessellation"));
        assert!(messages
            .iter()
            .any(|m| m == "IfcFacetedBrep skipped: brep export disabled"));
    }

    #[test]
    fn test_unknown_key_fails() {
        let mut scene = building_scene();
        scene.resources[0]
            .attributes
            .insert("PlacementRelTo".to_string(), SeedValue::reference("nowhere"));

        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let err = populate(&scene, &mut graph, &ExportOptions::default(), &mut Messages::new()).unwrap_err();
        assert!(matches!(err, ExportError::UnknownKey(key) if key == "nowhere"));
    }

    #[test]
    fn test_unknown_attribute_fails() {
        let mut scene = building_scene();
        scene.root.attributes.insert("Colour".to_string(), SeedValue::text("red"));

        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let err = populate(&scene, &mut graph, &ExportOptions::default(), &mut Messages::new()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Model(ModelError::UnknownAttribute { ref attribute, .. }) if attribute == "Colour"
        ));
    }

    #[test]
    fn test_surface_style_side_and_label_limit() {
        let mut scene = building_scene();
        scene.resources.push(
            SceneNode::new("IfcSurfaceStyle")
                .with("Name", SeedValue::text("x".repeat(300)))
                .with("Styles", SeedValue::List(vec![])),
        );

        let options = ExportOptions {
            double_sided_faces: true,
            ..Default::default()
        };
        let (graph, messages) = populated(&scene, &options);
        let style = graph.find_by_type("IfcSurfaceStyle")[0];
        assert_eq!(style.get("Side"), Some(&Value::enumeration("BOTH")));
        assert_eq!(style.text("Name").map(|n| n.chars().count()), Some(LABEL_LIMIT));
        assert!(messages
            .iter()
            .any(|m| m == "IfcLabel truncated to maximum of 255 characters"));
    }

    #[test]
    fn test_seed_value_forms() {
        let json = r#"{
            "root": {
                "type": "IfcProject",
                "attributes": {
                    "Name": "Demo",
                    "Description": null,
                    "RepresentationContexts": [{ "ref": "ctx" }]
                }
            },
            "resources": [
                {
                    "key": "ctx",
                    "type": "IfcGeometricRepresentationContext",
                    "attributes": { "ContextType": "Model", "CoordinateSpaceDimension": 3 }
                },
                {
                    "type": "IfcPropertySingleValue",
                    "attributes": {
                        "Name": "LoadBearing",
                        "NominalValue": { "type": "IfcBoolean", "value": true }
                    }
                }
            ]
        }"#;
        let scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.root.attributes["Description"], SeedValue::Unset);
        assert_eq!(
            scene.root.attributes["RepresentationContexts"],
            SeedValue::List(vec![SeedValue::reference("ctx")])
        );

        let (graph, _) = populated(&scene, &ExportOptions::default());
        let property = graph.find_by_type("IfcPropertySingleValue")[0];
        assert_eq!(
            property.get("NominalValue"),
            Some(&Value::typed("IFCBOOLEAN", Value::Bool(true)))
        );
        let context = graph.find_by_type("IfcGeometricRepresentationContext")[0];
        assert_eq!(context.get("CoordinateSpaceDimension"), Some(&Value::Integer(3)));
    }
}

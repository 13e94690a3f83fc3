// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCX node builders
//!
//! Every node is a JSON object with a `path` (a UUID5 string) and either
//! `children` (name -> path) or namespaced `attributes`. Several nodes may
//! share a path; consumers merge them.

use crate::exclusion::{is_excluded_attribute, is_excluded_enum};
use crate::hierarchy::Hierarchy;
use crate::placement::{local_transform, usd_rows};
use ifc_export_model::identity::uuid5;
use ifc_export_model::{EntityGraph, EntityInstance, EntityResolver, Value};
use serde_json::{json, Map, Value as Json};

/// Class URI prefix for `bsi::ifc::class`
pub const IFC_CLASS_URI: &str = "https://identifier.buildingsmart.org/uri/buildingsmart/ifc/4.3/class/";

/// Classes whose instances get a node of their own
pub const NODE_CLASSES: &[&str] = &[
    "IfcProject",
    "IfcMaterial",
    "IfcProduct",
    "IfcTypeProduct",
    "IfcSurfaceStyle",
    "IfcTriangulatedFaceSet",
];

/// Node path of an instance
///
/// Rooted entities hash their GlobalId. Named resources without one (surface
/// styles, materials) hash their name followed by their instance name, so two
/// resources sharing a name still get distinct paths.
pub fn path_of(instance: &EntityInstance) -> String {
    let namespace = instance.type_name();
    match (instance.global_id(), instance.text("Name")) {
        (None, Some(name)) if instance.entity_type().attribute("GlobalId").is_none() => {
            uuid5(namespace, &format!("{}{}", name, instance.local_name())).to_string()
        }
        _ => instance.uuid5(namespace).to_string(),
    }
}

/// Whether an instance is written as a node a path can point to
pub fn has_node(instance: &EntityInstance) -> bool {
    NODE_CLASSES.iter().any(|class| instance.is_a(class))
}

/// `bsi::ifc::class` value for a class code
pub fn class_attribute(code: &str) -> Json {
    json!({ "code": code, "uri": format!("{}{}", IFC_CLASS_URI, code) })
}

/// Convert a model value to JSON; `None` means "omit"
///
/// References render as the target's path, and only for targets that have a
/// node of their own.
pub fn to_json(value: &Value, resolver: &impl EntityResolver) -> Option<Json> {
    match value {
        Value::Unset => None,
        Value::Bool(b) => Some(Json::Bool(*b)),
        Value::Integer(i) => Some(Json::from(*i)),
        Value::Real(f) => serde_json::Number::from_f64(*f).map(Json::Number),
        Value::Text(s) => Some(Json::String(s.clone())),
        Value::Enum(token) if is_excluded_enum(token) => None,
        Value::Enum(token) => Some(Json::String(token.clone())),
        Value::Reference(id) => resolver
            .get(*id)
            .filter(|target| has_node(target))
            .map(|target| Json::String(path_of(target))),
        Value::List(items) => Some(Json::Array(
            items.iter().filter_map(|item| to_json(item, resolver)).collect(),
        )),
        Value::Typed(_, inner) => to_json(inner, resolver),
    }
}

/// Class code plus one `bsi::ifc::prop::<Attribute>` per set, non-excluded attribute
pub fn object_attributes(instance: &EntityInstance, resolver: &impl EntityResolver) -> Map<String, Json> {
    let mut attributes = Map::new();
    attributes.insert("bsi::ifc::class".to_string(), class_attribute(instance.type_name()));

    for (attribute, value) in instance.entity_type().attributes().iter().zip(instance.values()) {
        if is_excluded_attribute(attribute.name) {
            continue;
        }
        if let Some(json) = to_json(value, resolver) {
            attributes.insert(format!("bsi::ifc::prop::{}", attribute.name), json);
        }
    }

    attributes
}

/// Object node for products, type products and materials
pub fn object_node(instance: &EntityInstance, resolver: &impl EntityResolver) -> Json {
    json!({
        "path": path_of(instance),
        "attributes": object_attributes(instance, resolver),
    })
}

/// Key of a child in a `children` map: "<Name> - <GlobalId>"
pub fn child_key(child: &EntityInstance) -> String {
    let name = child.text("Name").unwrap_or_else(|| child.type_name());
    format!("{} - {}", name, child.local_name())
}

/// One `children` node per parent of the spatial/aggregation tree
pub fn hierarchy_nodes(hierarchy: &Hierarchy, graph: &EntityGraph<'_>) -> Vec<Json> {
    hierarchy
        .children
        .iter()
        .filter_map(|(parent, children)| {
            let parent = graph.get(*parent)?;
            let mut map = Map::new();
            for child in children.iter().filter_map(|id| graph.get(*id)) {
                map.insert(child_key(child), Json::String(path_of(child)));
            }
            Some(json!({ "path": path_of(parent), "children": map }))
        })
        .collect()
}

/// `usd::xformop` transform on the product a placement positions
pub fn placement_node(
    placement: &EntityInstance,
    hierarchy: &Hierarchy,
    resolver: &impl EntityResolver,
) -> Option<Json> {
    let product = resolver.get(hierarchy.product_placed_by(placement.id())?)?;
    let rows = usd_rows(&local_transform(placement, resolver));
    Some(json!({
        "path": path_of(product),
        "attributes": { "usd::xformop": { "transform": rows } },
    }))
}

/// Mesh node for a triangulated face set, plus the `Body` link to its product
pub fn mesh_nodes(
    face_set: &EntityInstance,
    hierarchy: &Hierarchy,
    resolver: &impl EntityResolver,
) -> Vec<Json> {
    let points: Vec<Json> = resolver
        .resolve_attribute(face_set, "Coordinates")
        .and_then(|list| list.get("CoordList"))
        .and_then(Value::as_list)
        .map(|rows| rows.iter().filter_map(|row| to_json(row, resolver)).collect())
        .unwrap_or_default();

    let mut indices = Vec::new();
    let mut counts = Vec::new();
    for face in face_set.get("CoordIndex").and_then(Value::as_list).unwrap_or(&[]) {
        let Some(corners) = face.as_list() else {
            continue;
        };
        let corners: Vec<i64> = corners
            .iter()
            .filter_map(Value::as_integer)
            .map(|i| i - 1)
            .collect();
        counts.push(corners.len());
        indices.extend(corners);
    }

    let mesh_path = path_of(face_set);
    let mut nodes = vec![json!({
        "path": mesh_path,
        "attributes": {
            "usd::usdgeom::mesh": {
                "points": points,
                "faceVertexIndices": indices,
                "faceVertexCounts": counts,
            }
        },
    })];

    if let Some(product) = hierarchy
        .owner_of_item(face_set.id())
        .and_then(|id| resolver.get(id))
    {
        nodes.push(json!({ "path": path_of(product), "children": { "Body": mesh_path } }));
    }

    nodes
}

/// Presentation colour of a surface style
pub fn surface_style_node(style: &EntityInstance, resolver: &impl EntityResolver) -> Option<Json> {
    let shading = style
        .get("Styles")
        .map(|styles| resolver.resolve_ref_list(styles))
        .unwrap_or_default()
        .into_iter()
        .find(|s| s.is_a("IfcSurfaceStyleShading"))?;
    let colour = resolver.resolve_attribute(shading, "SurfaceColour")?;

    let channel = |name: &str| colour.get(name).and_then(Value::as_real).unwrap_or(0.0);
    let transparency = shading
        .get("Transparency")
        .and_then(Value::as_real)
        .unwrap_or(0.0);

    Some(json!({
        "path": path_of(style),
        "attributes": {
            "bsi::ifc::presentation::diffuseColor": [channel("Red"), channel("Green"), channel("Blue")],
            "bsi::ifc::presentation::opacity": 1.0 - transparency,
        },
    }))
}

/// Style link on the geometry a styled item decorates
///
/// Styles may be listed directly or through a presentation style assignment.
pub fn styled_item_node(item: &EntityInstance, resolver: &impl EntityResolver) -> Option<Json> {
    let geometry = resolver.resolve_attribute(item, "Item")?;
    let styles = move |owner: &EntityInstance| {
        owner
            .get("Styles")
            .map(|styles| resolver.resolve_ref_list(styles))
            .unwrap_or_default()
    };
    let style = styles(item)
        .into_iter()
        .flat_map(|s| {
            if s.is_a("IfcPresentationStyleAssignment") {
                styles(s)
            } else {
                vec![s]
            }
        })
        .find(|s| s.is_a("IfcSurfaceStyle"))?;

    Some(json!({
        "path": path_of(geometry),
        "attributes": { "bsi::ifc::presentation::style": path_of(style) },
    }))
}

/// `bsi::ifc::material` on each object of a material association
pub fn material_association_nodes(rel: &EntityInstance, resolver: &impl EntityResolver) -> Vec<Json> {
    let Some(material) = resolver.resolve_attribute(rel, "RelatingMaterial") else {
        return Vec::new();
    };
    let code = material
        .text("Name")
        .or_else(|| material.text("LayerSetName"))
        .unwrap_or_else(|| material.type_name());
    let value = json!({ "code": code, "ref": path_of(material) });

    related_objects(rel, resolver)
        .into_iter()
        .map(|object| {
            json!({
                "path": path_of(object),
                "attributes": { "bsi::ifc::material": value.clone() },
            })
        })
        .collect()
}

/// `bsi::ifc::prop::<Property>` on each object of a property assignment
///
/// Covers property sets and element quantities. Properties named like an
/// excluded attribute are skipped.
pub fn property_nodes(rel: &EntityInstance, resolver: &impl EntityResolver) -> Vec<Json> {
    let Some(definition) = resolver.resolve_attribute(rel, "RelatingPropertyDefinition") else {
        return Vec::new();
    };

    let mut attributes = Map::new();
    let members = ["HasProperties", "Quantities"]
        .iter()
        .filter_map(|list| definition.get(list))
        .flat_map(|list| resolver.resolve_ref_list(list));
    for property in members {
        let Some(name) = property.text("Name") else {
            continue;
        };
        if is_excluded_attribute(name) {
            continue;
        }
        if let Some(value) = property_value(property).and_then(|v| to_json(v, resolver)) {
            attributes.insert(format!("bsi::ifc::prop::{}", name), value);
        }
    }

    if attributes.is_empty() {
        return Vec::new();
    }

    related_objects(rel, resolver)
        .into_iter()
        .map(|object| json!({ "path": path_of(object), "attributes": attributes.clone() }))
        .collect()
}

/// Value slot of a property or quantity
fn property_value(property: &EntityInstance) -> Option<&Value> {
    if property.is_a("IfcPropertyEnumeratedValue") {
        return property.get("EnumerationValues");
    }
    if property.is_a("IfcPhysicalSimpleQuantity") {
        // LengthValue, AreaValue, ...
        return property
            .entity_type()
            .attributes()
            .iter()
            .zip(property.values())
            .find(|(attribute, _)| attribute.name.ends_with("Value"))
            .map(|(_, value)| value);
    }
    property.get("NominalValue")
}

/// `<Source>::class` on each object of a classification association
pub fn classification_nodes(rel: &EntityInstance, resolver: &impl EntityResolver) -> Vec<Json> {
    let Some(reference) = resolver.resolve_attribute(rel, "RelatingClassification") else {
        return Vec::new();
    };
    let source = resolver
        .resolve_attribute(reference, "ReferencedSource")
        .and_then(|c| c.text("Name"))
        .unwrap_or_else(|| reference.text("Name").unwrap_or_default());
    let namespace: String = source.chars().filter(char::is_ascii_alphanumeric).collect();
    if namespace.is_empty() {
        return Vec::new();
    }

    let code = reference
        .text("Identification")
        .or_else(|| reference.text("Name"));
    let mut class = Map::new();
    if let Some(code) = code {
        class.insert("code".to_string(), Json::String(code.to_string()));
    }
    if let Some(uri) = reference.text("Location") {
        class.insert("uri".to_string(), Json::String(uri.to_string()));
    }

    let mut attributes = Map::new();
    attributes.insert(format!("{}::class", namespace), Json::Object(class));
    related_objects(rel, resolver)
        .into_iter()
        .map(|object| json!({ "path": path_of(object), "attributes": attributes.clone() }))
        .collect()
}

fn related_objects<'a>(rel: &EntityInstance, resolver: &'a impl EntityResolver) -> Vec<&'a EntityInstance> {
    rel.get("RelatedObjects")
        .map(|objects| resolver.resolve_ref_list(objects))
        .unwrap_or_default()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity type registry
//!
//! Entity kinds are data, not Rust types: a static table of [`EntityDef`]
//! records (one per IFC class) is resolved once into [`EntityType`]s whose
//! effective attribute list accumulates every supertype's own attributes,
//! root-most first, the way EXPRESS single inheritance does.
//!
//! # Example
//!
//! ```ignore
//! use ifc_export_model::Registry;
//!
//! let registry = Registry::ifc4()?;
//! let wall = registry.resolve("IfcWall")?;
//! assert_eq!(wall.attributes()[0].name, "GlobalId");
//! ```

mod ifc4;

use crate::{ModelError, Result, ValueKind};
use once_cell::sync::OnceCell;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Own attribute of a table record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: &'static str,
    pub kind: ValueKind,
    pub optional: bool,
}

/// Declare a required attribute
pub const fn req(name: &'static str, kind: ValueKind) -> AttributeDef {
    AttributeDef {
        name,
        kind,
        optional: false,
    }
}

/// Declare an optional attribute
pub const fn opt(name: &'static str, kind: ValueKind) -> AttributeDef {
    AttributeDef {
        name,
        kind,
        optional: true,
    }
}

/// One record of the static schema table
#[derive(Clone, Copy, Debug)]
pub struct EntityDef {
    /// Canonical name, e.g. "IfcWall"
    pub name: &'static str,
    /// Direct supertype
    pub supertype: Option<&'static str>,
    /// Attributes declared by this entity, in schema order
    pub attributes: &'static [AttributeDef],
    /// Inherited attributes this entity redeclares as DERIVE
    pub derived: &'static [&'static str],
}

/// Attribute slot of an effective attribute list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: ValueKind,
    pub optional: bool,
    /// Entity that declared the attribute
    pub declared_by: &'static str,
}

impl Attribute {
    /// Whether encoders must find a value in this slot
    pub fn is_required(&self) -> bool {
        !self.optional && self.kind != ValueKind::Derived
    }
}

/// Resolved entity type with its cached effective attribute list
#[derive(Debug)]
pub struct EntityType {
    name: &'static str,
    step_name: String,
    supertype: Option<&'static str>,
    /// Supertypes, nearest first
    ancestors: Vec<&'static str>,
    attributes: Vec<Attribute>,
    index: FxHashMap<&'static str, usize>,
}

impl EntityType {
    /// Canonical CamelCase name (IFCX class code)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Upper-case name used in STEP instance lines
    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// Direct supertype
    pub fn supertype(&self) -> Option<&'static str> {
        self.supertype
    }

    /// Supertypes, nearest first
    pub fn ancestors(&self) -> &[&'static str] {
        &self.ancestors
    }

    /// Effective attribute list
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Position of an attribute in the effective list
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Look up an attribute slot by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attribute_index(name).map(|i| &self.attributes[i])
    }

    /// Attributes declared by this type itself
    pub fn own_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes
            .iter()
            .filter(move |a| a.declared_by == self.name)
    }

    /// Whether this type is `ancestor` or inherits from it (case-insensitive)
    pub fn is_subtype_of(&self, ancestor: &str) -> bool {
        self.name.eq_ignore_ascii_case(ancestor)
            || self
                .ancestors
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ancestor))
    }
}

/// Read-only catalog of entity types for one schema
///
/// Built once from a static table and shared by every export session;
/// lookups take `&self` so concurrent readers are always safe.
#[derive(Debug)]
pub struct Registry {
    schema: &'static str,
    /// Upper-case name -> resolved type
    types: FxHashMap<String, Arc<EntityType>>,
}

static IFC4: OnceCell<Registry> = OnceCell::new();

impl Registry {
    /// Process-wide IFC4 registry, resolved on first use
    pub fn ifc4() -> Result<&'static Registry> {
        IFC4.get_or_try_init(|| Registry::from_table("IFC4", ifc4::ENTITIES))
    }

    /// Resolve a static table into a registry
    ///
    /// Fails with [`ModelError::UnknownType`] when a supertype is missing from
    /// the table and [`ModelError::CyclicHierarchy`] when a supertype chain
    /// loops.
    pub fn from_table(schema: &'static str, defs: &'static [EntityDef]) -> Result<Self> {
        let by_name: FxHashMap<String, &'static EntityDef> = defs
            .iter()
            .map(|def| (def.name.to_uppercase(), def))
            .collect();

        let mut types = FxHashMap::default();
        for def in defs {
            let chain = supertype_chain(def, &by_name)?;
            let entity_type = build_entity_type(def, &chain)?;
            types.insert(def.name.to_uppercase(), Arc::new(entity_type));
        }

        log::debug!("Resolved {} entity types for schema {}", types.len(), schema);
        Ok(Self { schema, types })
    }

    /// Schema identifier written to FILE_SCHEMA
    pub fn schema_identifier(&self) -> &'static str {
        self.schema
    }

    /// Resolve a type name (case-insensitive)
    pub fn resolve(&self, type_name: &str) -> Result<Arc<EntityType>> {
        self.types
            .get(&type_name.to_uppercase())
            .cloned()
            .ok_or_else(|| ModelError::unknown_type(type_name))
    }

    /// Check whether a name is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(&type_name.to_uppercase())
    }

    /// Whether `type_name` is `ancestor` or one of its subtypes
    ///
    /// Unknown names answer false.
    pub fn is_subtype_of(&self, type_name: &str, ancestor: &str) -> bool {
        self.resolve(type_name)
            .map(|t| t.is_subtype_of(ancestor))
            .unwrap_or(false)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered types (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.types.values()
    }
}

/// Walk from `def` to the root, returning the chain root-most first
fn supertype_chain(
    def: &'static EntityDef,
    by_name: &FxHashMap<String, &'static EntityDef>,
) -> Result<Vec<&'static EntityDef>> {
    let mut chain = vec![def];
    let mut seen = FxHashSet::default();
    seen.insert(def.name);

    let mut current = def;
    while let Some(parent_name) = current.supertype {
        let parent = by_name
            .get(&parent_name.to_uppercase())
            .copied()
            .ok_or_else(|| ModelError::unknown_type(parent_name))?;

        if !seen.insert(parent.name) {
            return Err(ModelError::CyclicHierarchy(def.name.to_string()));
        }

        chain.push(parent);
        current = parent;
    }

    chain.reverse();
    Ok(chain)
}

fn build_entity_type(def: &'static EntityDef, chain: &[&'static EntityDef]) -> Result<EntityType> {
    let mut attributes: Vec<Attribute> = Vec::new();

    for link in chain {
        // Redeclarations apply to what the supertypes already contributed
        for derived in link.derived {
            let slot = attributes
                .iter_mut()
                .find(|a| a.name == *derived)
                .ok_or_else(|| ModelError::unknown_attribute(link.name, *derived))?;
            slot.kind = ValueKind::Derived;
        }

        attributes.extend(link.attributes.iter().map(|a| Attribute {
            name: a.name,
            kind: a.kind,
            optional: a.optional,
            declared_by: link.name,
        }));
    }

    let index = attributes
        .iter()
        .enumerate()
        .map(|(i, a)| (a.name, i))
        .collect();

    let ancestors = chain
        .iter()
        .rev()
        .skip(1)
        .map(|link| link.name)
        .collect();

    Ok(EntityType {
        name: def.name,
        step_name: def.name.to_uppercase(),
        supertype: def.supertype,
        ancestors,
        attributes,
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    static SMALL: &[EntityDef] = &[
        EntityDef {
            name: "IfcRoot",
            supertype: None,
            attributes: &[req("GlobalId", ValueKind::Text), opt("Name", ValueKind::Text)],
            derived: &[],
        },
        EntityDef {
            name: "IfcThing",
            supertype: Some("IfcRoot"),
            attributes: &[opt("Size", ValueKind::Real)],
            derived: &[],
        },
        EntityDef {
            name: "IfcDerivedThing",
            supertype: Some("IfcThing"),
            attributes: &[],
            derived: &["Name"],
        },
    ];

    static CYCLIC: &[EntityDef] = &[
        EntityDef {
            name: "IfcA",
            supertype: Some("IfcB"),
            attributes: &[],
            derived: &[],
        },
        EntityDef {
            name: "IfcB",
            supertype: Some("IfcA"),
            attributes: &[],
            derived: &[],
        },
    ];

    static ORPHAN: &[EntityDef] = &[EntityDef {
        name: "IfcOrphan",
        supertype: Some("IfcMissing"),
        attributes: &[],
        derived: &[],
    }];

    static BAD_DERIVE: &[EntityDef] = &[EntityDef {
        name: "IfcRoot",
        supertype: None,
        attributes: &[],
        derived: &["Nope"],
    }];

    #[test]
    fn test_effective_attributes_accumulate_root_first() {
        let registry = Registry::from_table("TEST", SMALL).unwrap();
        let thing = registry.resolve("IfcThing").unwrap();
        let names: Vec<_> = thing.attributes().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["GlobalId", "Name", "Size"]);
        assert_eq!(thing.attribute("Size").unwrap().declared_by, "IfcThing");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = Registry::from_table("TEST", SMALL).unwrap();
        let thing = registry.resolve("IFCTHING").unwrap();
        assert_eq!(thing.name(), "IfcThing");
        assert_eq!(thing.step_name(), "IFCTHING");
    }

    #[test]
    fn test_unknown_type() {
        let registry = Registry::from_table("TEST", SMALL).unwrap();
        assert_eq!(
            registry.resolve("IfcUnicorn").unwrap_err(),
            ModelError::UnknownType("IfcUnicorn".to_string())
        );
    }

    #[test]
    fn test_cycle_detected() {
        let err = Registry::from_table("TEST", CYCLIC).unwrap_err();
        assert!(matches!(err, ModelError::CyclicHierarchy(_)));
    }

    #[test]
    fn test_missing_supertype_is_unknown_type() {
        let err = Registry::from_table("TEST", ORPHAN).unwrap_err();
        assert_eq!(err, ModelError::UnknownType("IfcMissing".to_string()));
    }

    #[test]
    fn test_derived_redeclaration() {
        let registry = Registry::from_table("TEST", SMALL).unwrap();
        let derived = registry.resolve("IfcDerivedThing").unwrap();
        let name = derived.attribute("Name").unwrap();
        assert_eq!(name.kind, ValueKind::Derived);
        assert!(!name.is_required());

        // The supertype keeps its own declaration
        let thing = registry.resolve("IfcThing").unwrap();
        assert_eq!(thing.attribute("Name").unwrap().kind, ValueKind::Text);
    }

    #[test]
    fn test_derived_redeclaration_of_unknown_attribute() {
        let err = Registry::from_table("TEST", BAD_DERIVE).unwrap_err();
        assert!(matches!(err, ModelError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_subtype_queries() {
        let registry = Registry::from_table("TEST", SMALL).unwrap();
        assert!(registry.is_subtype_of("IfcDerivedThing", "IfcRoot"));
        assert!(registry.is_subtype_of("IfcThing", "IfcThing"));
        assert!(!registry.is_subtype_of("IfcRoot", "IfcThing"));
        assert!(!registry.is_subtype_of("IfcUnicorn", "IfcRoot"));
    }

    #[test]
    fn test_ifc4_effective_lists_extend_supertypes() {
        let registry = Registry::ifc4().unwrap();
        for entity_type in registry.iter() {
            let Some(parent_name) = entity_type.supertype() else {
                continue;
            };
            let parent = registry.resolve(parent_name).unwrap();
            let own = entity_type.attributes();
            let inherited = parent.attributes();

            let declared = entity_type.own_attributes().count();
            assert_eq!(own.len(), inherited.len() + declared, "{}", entity_type.name());
            if declared > 0 {
                assert!(own.len() > inherited.len(), "{}", entity_type.name());
            }
            for (child_slot, parent_slot) in own.iter().zip(inherited) {
                assert_eq!(child_slot.name, parent_slot.name, "{}", entity_type.name());
            }
            for slot in &own[inherited.len()..] {
                assert_eq!(slot.declared_by, entity_type.name(), "{}.{}", entity_type.name(), slot.name);
            }
        }
    }

    #[test]
    fn test_ifc4_wall_shape() {
        let registry = Registry::ifc4().unwrap();
        assert_eq!(registry.schema_identifier(), "IFC4");

        let wall = registry.resolve("IfcWall").unwrap();
        let names: Vec<_> = wall.attributes().iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            vec![
                "GlobalId",
                "OwnerHistory",
                "Name",
                "Description",
                "ObjectType",
                "ObjectPlacement",
                "Representation",
                "Tag",
                "PredefinedType",
            ]
        );
        assert!(wall.is_subtype_of("IfcProduct"));
    }

    #[test]
    fn test_ifc4_brep_mapped_and_georeferencing_classes() {
        let registry = Registry::ifc4().unwrap();
        let names = |type_name: &str| -> Vec<&'static str> {
            registry
                .resolve(type_name)
                .unwrap()
                .attributes()
                .iter()
                .map(|a| a.name)
                .collect()
        };

        assert_eq!(names("IfcFacetedBrep"), vec!["Outer"]);
        assert_eq!(names("IfcClosedShell"), vec!["CfsFaces"]);
        assert_eq!(names("IfcFaceOuterBound"), vec!["Bound", "Orientation"]);
        assert_eq!(names("IfcPolyLoop"), vec!["Polygon"]);
        assert_eq!(names("IfcMappedItem"), vec!["MappingSource", "MappingTarget"]);
        assert_eq!(
            names("IfcCartesianTransformationOperator3D"),
            vec!["Axis1", "Axis2", "LocalOrigin", "Scale", "Axis3"]
        );
        assert_eq!(
            names("IfcMapConversion"),
            vec![
                "SourceCRS",
                "TargetCRS",
                "Eastings",
                "Northings",
                "OrthogonalHeight",
                "XAxisAbscissa",
                "XAxisOrdinate",
                "Scale",
            ]
        );
        assert_eq!(names("IfcQuantityLength"), vec!["Name", "Description", "Unit", "LengthValue", "Formula"]);
        assert!(registry.is_subtype_of("IfcElementQuantity", "IfcPropertySetDefinition"));
        assert!(registry.is_subtype_of("IfcSurfaceStyleRendering", "IfcSurfaceStyleShading"));
        assert!(registry.is_subtype_of("IfcRelAdheresToElement", "IfcRelDecomposes"));
    }

    #[test]
    fn test_ifc4_si_unit_dimensions_are_derived() {
        let registry = Registry::ifc4().unwrap();
        let unit = registry.resolve("IfcSIUnit").unwrap();
        assert_eq!(unit.attributes()[0].name, "Dimensions");
        assert_eq!(unit.attributes()[0].kind, ValueKind::Derived);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 entity table
//!
//! Covers the classes the exporter emits. Own attributes follow the IFC4
//! ADD2 TC1 EXPRESS declarations in order; SET and LIST aggregates share
//! the `List` kind.

use super::{opt, req, EntityDef};
use crate::ValueKind::{self, Boolean, Entity, Enum, Integer, Real, Select, Text};

const ENTITIES_OF: ValueKind = ValueKind::List(&Entity);
const REALS: ValueKind = ValueKind::List(&Real);
const INTEGERS: ValueKind = ValueKind::List(&Integer);
const TEXTS: ValueKind = ValueKind::List(&Text);
const SELECTS: ValueKind = ValueKind::List(&Select);
const REAL_GRID: ValueKind = ValueKind::List(&REALS);
const INTEGER_GRID: ValueKind = ValueKind::List(&INTEGERS);

macro_rules! entity {
    ($name:literal) => {
        EntityDef { name: $name, supertype: None, attributes: &[], derived: &[] }
    };
    ($name:literal : $super:literal) => {
        EntityDef { name: $name, supertype: Some($super), attributes: &[], derived: &[] }
    };
    ($name:literal : $super:literal, [$($attr:expr),* $(,)?]) => {
        EntityDef { name: $name, supertype: Some($super), attributes: &[$($attr),*], derived: &[] }
    };
    ($name:literal, [$($attr:expr),* $(,)?]) => {
        EntityDef { name: $name, supertype: None, attributes: &[$($attr),*], derived: &[] }
    };
}

pub(super) static ENTITIES: &[EntityDef] = &[
    // Root and object hierarchy
    entity!("IfcRoot", [
        req("GlobalId", Text),
        opt("OwnerHistory", Entity),
        opt("Name", Text),
        opt("Description", Text),
    ]),
    entity!("IfcObjectDefinition": "IfcRoot"),
    entity!("IfcObject": "IfcObjectDefinition", [opt("ObjectType", Text)]),
    entity!("IfcProduct": "IfcObject", [
        opt("ObjectPlacement", Entity),
        opt("Representation", Entity),
    ]),
    entity!("IfcElement": "IfcProduct", [opt("Tag", Text)]),
    entity!("IfcBuildingElement": "IfcElement"),
    entity!("IfcContext": "IfcObjectDefinition", [
        opt("ObjectType", Text),
        opt("LongName", Text),
        opt("Phase", Text),
        opt("RepresentationContexts", ENTITIES_OF),
        opt("UnitsInContext", Entity),
    ]),
    // Spatial structure
    entity!("IfcProject": "IfcContext"),
    entity!("IfcSpatialElement": "IfcProduct", [opt("LongName", Text)]),
    entity!("IfcSpatialStructureElement": "IfcSpatialElement", [opt("CompositionType", Enum)]),
    entity!("IfcSite": "IfcSpatialStructureElement", [
        opt("RefLatitude", INTEGERS),
        opt("RefLongitude", INTEGERS),
        opt("RefElevation", Real),
        opt("LandTitleNumber", Text),
        opt("SiteAddress", Entity),
    ]),
    entity!("IfcBuilding": "IfcSpatialStructureElement", [
        opt("ElevationOfRefHeight", Real),
        opt("ElevationOfTerrain", Real),
        opt("BuildingAddress", Entity),
    ]),
    entity!("IfcBuildingStorey": "IfcSpatialStructureElement", [opt("Elevation", Real)]),
    entity!("IfcSpace": "IfcSpatialStructureElement", [
        opt("PredefinedType", Enum),
        opt("ElevationWithFlooring", Real),
    ]),
    // Building elements
    entity!("IfcBuildingElementProxy": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcWall": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcSlab": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcRoof": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcBeam": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcColumn": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcPlate": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcMember": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcCovering": "IfcBuildingElement", [opt("PredefinedType", Enum)]),
    entity!("IfcPile": "IfcBuildingElement", [
        opt("PredefinedType", Enum),
        opt("ConstructionType", Enum),
    ]),
    entity!("IfcDoor": "IfcBuildingElement", [
        opt("OverallHeight", Real),
        opt("OverallWidth", Real),
        opt("PredefinedType", Enum),
        opt("OperationType", Enum),
        opt("UserDefinedOperationType", Text),
    ]),
    entity!("IfcWindow": "IfcBuildingElement", [
        opt("OverallHeight", Real),
        opt("OverallWidth", Real),
        opt("PredefinedType", Enum),
        opt("PartitioningType", Enum),
        opt("UserDefinedPartitioningType", Text),
    ]),
    entity!("IfcFurnishingElement": "IfcElement"),
    entity!("IfcElementAssembly": "IfcElement", [
        opt("AssemblyPlace", Enum),
        opt("PredefinedType", Enum),
    ]),
    entity!("IfcFeatureElement": "IfcElement"),
    entity!("IfcSurfaceFeature": "IfcFeatureElement", [opt("PredefinedType", Enum)]),
    // Type objects
    entity!("IfcTypeObject": "IfcObjectDefinition", [
        opt("ApplicableOccurrence", Text),
        opt("HasPropertySets", ENTITIES_OF),
    ]),
    entity!("IfcTypeProduct": "IfcTypeObject", [
        opt("RepresentationMaps", ENTITIES_OF),
        opt("Tag", Text),
    ]),
    entity!("IfcElementType": "IfcTypeProduct", [opt("ElementType", Text)]),
    entity!("IfcBuildingElementType": "IfcElementType"),
    entity!("IfcBuildingElementProxyType": "IfcBuildingElementType", [req("PredefinedType", Enum)]),
    entity!("IfcWallType": "IfcBuildingElementType", [req("PredefinedType", Enum)]),
    entity!("IfcFurnishingElementType": "IfcElementType"),
    // Relationships
    entity!("IfcRelationship": "IfcRoot"),
    entity!("IfcRelDecomposes": "IfcRelationship"),
    entity!("IfcRelAggregates": "IfcRelDecomposes", [
        req("RelatingObject", Entity),
        req("RelatedObjects", ENTITIES_OF),
    ]),
    entity!("IfcRelAdheresToElement": "IfcRelDecomposes", [
        req("RelatingElement", Entity),
        req("RelatedSurfaceFeatures", ENTITIES_OF),
    ]),
    entity!("IfcRelConnects": "IfcRelationship"),
    entity!("IfcRelContainedInSpatialStructure": "IfcRelConnects", [
        req("RelatedElements", ENTITIES_OF),
        req("RelatingStructure", Entity),
    ]),
    entity!("IfcRelAssociates": "IfcRelationship", [req("RelatedObjects", ENTITIES_OF)]),
    entity!("IfcRelAssociatesMaterial": "IfcRelAssociates", [req("RelatingMaterial", Select)]),
    entity!("IfcRelAssociatesClassification": "IfcRelAssociates", [
        req("RelatingClassification", Select),
    ]),
    entity!("IfcRelDefines": "IfcRelationship"),
    entity!("IfcRelDefinesByProperties": "IfcRelDefines", [
        req("RelatedObjects", ENTITIES_OF),
        req("RelatingPropertyDefinition", Select),
    ]),
    entity!("IfcRelDefinesByType": "IfcRelDefines", [
        req("RelatedObjects", ENTITIES_OF),
        req("RelatingType", Entity),
    ]),
    // Properties
    entity!("IfcPropertyDefinition": "IfcRoot"),
    entity!("IfcPropertySetDefinition": "IfcPropertyDefinition"),
    entity!("IfcPropertySet": "IfcPropertySetDefinition", [req("HasProperties", ENTITIES_OF)]),
    entity!("IfcPropertyAbstraction"),
    entity!("IfcProperty": "IfcPropertyAbstraction", [
        req("Name", Text),
        opt("Description", Text),
    ]),
    entity!("IfcSimpleProperty": "IfcProperty"),
    entity!("IfcPropertySingleValue": "IfcSimpleProperty", [
        opt("NominalValue", Select),
        opt("Unit", Select),
    ]),
    entity!("IfcPropertyEnumeratedValue": "IfcSimpleProperty", [
        opt("EnumerationValues", SELECTS),
        opt("EnumerationReference", Entity),
    ]),
    entity!("IfcPropertyEnumeration": "IfcPropertyAbstraction", [
        req("Name", Text),
        req("EnumerationValues", SELECTS),
        opt("Unit", Select),
    ]),
    // Quantities
    entity!("IfcQuantitySet": "IfcPropertySetDefinition"),
    entity!("IfcElementQuantity": "IfcQuantitySet", [
        opt("MethodOfMeasurement", Text),
        req("Quantities", ENTITIES_OF),
    ]),
    entity!("IfcPhysicalQuantity", [req("Name", Text), opt("Description", Text)]),
    entity!("IfcPhysicalSimpleQuantity": "IfcPhysicalQuantity", [opt("Unit", Entity)]),
    entity!("IfcQuantityLength": "IfcPhysicalSimpleQuantity", [
        req("LengthValue", Real),
        opt("Formula", Text),
    ]),
    entity!("IfcQuantityArea": "IfcPhysicalSimpleQuantity", [
        req("AreaValue", Real),
        opt("Formula", Text),
    ]),
    entity!("IfcQuantityVolume": "IfcPhysicalSimpleQuantity", [
        req("VolumeValue", Real),
        opt("Formula", Text),
    ]),
    entity!("IfcQuantityWeight": "IfcPhysicalSimpleQuantity", [
        req("WeightValue", Real),
        opt("Formula", Text),
    ]),
    // Materials
    entity!("IfcMaterialDefinition"),
    entity!("IfcMaterial": "IfcMaterialDefinition", [
        req("Name", Text),
        opt("Description", Text),
        opt("Category", Text),
    ]),
    entity!("IfcMaterialLayer": "IfcMaterialDefinition", [
        opt("Material", Entity),
        req("LayerThickness", Real),
        opt("IsVentilated", Enum),
        opt("Name", Text),
        opt("Description", Text),
        opt("Category", Text),
        opt("Priority", Integer),
    ]),
    entity!("IfcMaterialLayerSet": "IfcMaterialDefinition", [
        req("MaterialLayers", ENTITIES_OF),
        opt("LayerSetName", Text),
        opt("Description", Text),
    ]),
    // Classification
    entity!("IfcExternalInformation"),
    entity!("IfcClassification": "IfcExternalInformation", [
        opt("Source", Text),
        opt("Edition", Text),
        opt("EditionDate", Text),
        req("Name", Text),
        opt("Description", Text),
        opt("Location", Text),
        opt("ReferenceTokens", TEXTS),
    ]),
    entity!("IfcExternalReference", [
        opt("Location", Text),
        opt("Identification", Text),
        opt("Name", Text),
    ]),
    entity!("IfcClassificationReference": "IfcExternalReference", [
        opt("ReferencedSource", Entity),
        opt("Description", Text),
        opt("Sort", Text),
    ]),
    // Owner history
    entity!("IfcOwnerHistory", [
        req("OwningUser", Entity),
        req("OwningApplication", Entity),
        opt("State", Enum),
        opt("ChangeAction", Enum),
        opt("LastModifiedDate", Integer),
        opt("LastModifyingUser", Entity),
        opt("LastModifyingApplication", Entity),
        req("CreationDate", Integer),
    ]),
    entity!("IfcPerson", [
        opt("Identification", Text),
        opt("FamilyName", Text),
        opt("GivenName", Text),
        opt("MiddleNames", TEXTS),
        opt("PrefixTitles", TEXTS),
        opt("SuffixTitles", TEXTS),
        opt("Roles", ENTITIES_OF),
        opt("Addresses", ENTITIES_OF),
    ]),
    entity!("IfcOrganization", [
        opt("Identification", Text),
        req("Name", Text),
        opt("Description", Text),
        opt("Roles", ENTITIES_OF),
        opt("Addresses", ENTITIES_OF),
    ]),
    entity!("IfcPersonAndOrganization", [
        req("ThePerson", Entity),
        req("TheOrganization", Entity),
        opt("Roles", ENTITIES_OF),
    ]),
    entity!("IfcApplication", [
        req("ApplicationDeveloper", Entity),
        req("Version", Text),
        req("ApplicationFullName", Text),
        req("ApplicationIdentifier", Text),
    ]),
    // Units
    entity!("IfcUnitAssignment", [req("Units", ENTITIES_OF)]),
    entity!("IfcNamedUnit", [req("Dimensions", Entity), req("UnitType", Enum)]),
    EntityDef {
        name: "IfcSIUnit",
        supertype: Some("IfcNamedUnit"),
        attributes: &[opt("Prefix", Enum), req("Name", Enum)],
        derived: &["Dimensions"],
    },
    // Georeferencing
    entity!("IfcCoordinateOperation", [
        req("SourceCRS", Select),
        req("TargetCRS", Entity),
    ]),
    entity!("IfcMapConversion": "IfcCoordinateOperation", [
        req("Eastings", Real),
        req("Northings", Real),
        req("OrthogonalHeight", Real),
        opt("XAxisAbscissa", Real),
        opt("XAxisOrdinate", Real),
        opt("Scale", Real),
    ]),
    entity!("IfcCoordinateReferenceSystem", [
        req("Name", Text),
        opt("Description", Text),
        opt("GeodeticDatum", Text),
        opt("VerticalDatum", Text),
    ]),
    entity!("IfcProjectedCRS": "IfcCoordinateReferenceSystem", [
        opt("MapProjection", Text),
        opt("MapZone", Text),
        opt("MapUnit", Entity),
    ]),
    // Geometry context and placement
    entity!("IfcRepresentationContext", [
        opt("ContextIdentifier", Text),
        opt("ContextType", Text),
    ]),
    entity!("IfcGeometricRepresentationContext": "IfcRepresentationContext", [
        req("CoordinateSpaceDimension", Integer),
        opt("Precision", Real),
        req("WorldCoordinateSystem", Entity),
        opt("TrueNorth", Entity),
    ]),
    EntityDef {
        name: "IfcGeometricRepresentationSubContext",
        supertype: Some("IfcGeometricRepresentationContext"),
        attributes: &[
            req("ParentContext", Entity),
            opt("TargetScale", Real),
            req("TargetView", Enum),
            opt("UserDefinedTargetView", Text),
        ],
        derived: &[
            "WorldCoordinateSystem",
            "CoordinateSpaceDimension",
            "TrueNorth",
            "Precision",
        ],
    },
    entity!("IfcRepresentationItem"),
    entity!("IfcGeometricRepresentationItem": "IfcRepresentationItem"),
    entity!("IfcPoint": "IfcGeometricRepresentationItem"),
    entity!("IfcCartesianPoint": "IfcPoint", [req("Coordinates", REALS)]),
    entity!("IfcDirection": "IfcGeometricRepresentationItem", [req("DirectionRatios", REALS)]),
    entity!("IfcPlacement": "IfcGeometricRepresentationItem", [req("Location", Entity)]),
    entity!("IfcAxis2Placement3D": "IfcPlacement", [
        opt("Axis", Entity),
        opt("RefDirection", Entity),
    ]),
    entity!("IfcCartesianTransformationOperator": "IfcGeometricRepresentationItem", [
        opt("Axis1", Entity),
        opt("Axis2", Entity),
        req("LocalOrigin", Entity),
        opt("Scale", Real),
    ]),
    entity!("IfcCartesianTransformationOperator3D": "IfcCartesianTransformationOperator", [
        opt("Axis3", Entity),
    ]),
    entity!("IfcObjectPlacement"),
    entity!("IfcLocalPlacement": "IfcObjectPlacement", [
        opt("PlacementRelTo", Entity),
        req("RelativePlacement", Entity),
    ]),
    // Representations
    entity!("IfcProductRepresentation", [
        opt("Name", Text),
        opt("Description", Text),
        req("Representations", ENTITIES_OF),
    ]),
    entity!("IfcProductDefinitionShape": "IfcProductRepresentation"),
    entity!("IfcRepresentation", [
        req("ContextOfItems", Entity),
        opt("RepresentationIdentifier", Text),
        opt("RepresentationType", Text),
        req("Items", ENTITIES_OF),
    ]),
    entity!("IfcShapeModel": "IfcRepresentation"),
    entity!("IfcShapeRepresentation": "IfcShapeModel"),
    entity!("IfcCartesianPointList": "IfcGeometricRepresentationItem"),
    entity!("IfcCartesianPointList3D": "IfcCartesianPointList", [req("CoordList", REAL_GRID)]),
    entity!("IfcTessellatedItem": "IfcGeometricRepresentationItem"),
    entity!("IfcTessellatedFaceSet": "IfcTessellatedItem", [req("Coordinates", Entity)]),
    entity!("IfcTriangulatedFaceSet": "IfcTessellatedFaceSet", [
        opt("Normals", REAL_GRID),
        opt("Closed", Boolean),
        req("CoordIndex", INTEGER_GRID),
        opt("PnIndex", INTEGERS),
    ]),
    // Boundary representation
    entity!("IfcSolidModel": "IfcGeometricRepresentationItem"),
    entity!("IfcManifoldSolidBrep": "IfcSolidModel", [req("Outer", Entity)]),
    entity!("IfcFacetedBrep": "IfcManifoldSolidBrep"),
    entity!("IfcTopologicalRepresentationItem": "IfcRepresentationItem"),
    entity!("IfcConnectedFaceSet": "IfcTopologicalRepresentationItem", [req("CfsFaces", ENTITIES_OF)]),
    entity!("IfcClosedShell": "IfcConnectedFaceSet"),
    entity!("IfcFace": "IfcTopologicalRepresentationItem", [req("Bounds", ENTITIES_OF)]),
    entity!("IfcFaceBound": "IfcTopologicalRepresentationItem", [
        req("Bound", Entity),
        req("Orientation", Boolean),
    ]),
    entity!("IfcFaceOuterBound": "IfcFaceBound"),
    entity!("IfcLoop": "IfcTopologicalRepresentationItem"),
    entity!("IfcPolyLoop": "IfcLoop", [req("Polygon", ENTITIES_OF)]),
    // Mapped items
    entity!("IfcRepresentationMap", [
        req("MappingOrigin", Select),
        req("MappedRepresentation", Entity),
    ]),
    entity!("IfcMappedItem": "IfcRepresentationItem", [
        req("MappingSource", Entity),
        req("MappingTarget", Entity),
    ]),
    // Presentation
    entity!("IfcStyledItem": "IfcRepresentationItem", [
        opt("Item", Entity),
        req("Styles", ENTITIES_OF),
        opt("Name", Text),
    ]),
    entity!("IfcPresentationStyle", [opt("Name", Text)]),
    entity!("IfcSurfaceStyle": "IfcPresentationStyle", [
        req("Side", Enum),
        req("Styles", ENTITIES_OF),
    ]),
    entity!("IfcPresentationItem"),
    entity!("IfcSurfaceStyleShading": "IfcPresentationItem", [
        req("SurfaceColour", Entity),
        opt("Transparency", Real),
    ]),
    entity!("IfcSurfaceStyleRendering": "IfcSurfaceStyleShading", [
        opt("DiffuseColour", Select),
        opt("TransmissionColour", Select),
        opt("DiffuseTransmissionColour", Select),
        opt("ReflectionColour", Select),
        opt("SpecularColour", Select),
        opt("SpecularHighlight", Select),
        req("ReflectanceMethod", Enum),
    ]),
    entity!("IfcPresentationStyleAssignment", [req("Styles", ENTITIES_OF)]),
    entity!("IfcColourSpecification": "IfcPresentationItem", [opt("Name", Text)]),
    entity!("IfcColourRgb": "IfcColourSpecification", [
        req("Red", Real),
        req("Green", Real),
        req("Blue", Real),
    ]),
    entity!("IfcPresentationLayerAssignment", [
        req("Name", Text),
        opt("Description", Text),
        req("AssignedItems", ENTITIES_OF),
        opt("Identifier", Text),
    ]),
];

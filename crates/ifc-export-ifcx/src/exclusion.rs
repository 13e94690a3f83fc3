// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attributes and enumeration tokens that never appear in IFCX output
//!
//! Identity, placement and representation attributes are carried by the
//! node path and the hierarchy instead; the `*Type` attributes are encoded
//! through the class code.

/// Attribute names dropped from `bsi::ifc::prop::*` attributes
pub const EXCLUDED_ATTRIBUTES: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "ObjectPlacement",
    "Representation",
    "ApplicableOccurrence",
    "HasPropertySets",
    "RepresentationMaps",
    "Tag",
    "ActionType",
    "CompositionType",
    "ConnectionType",
    "ConstructionType",
    "ContextType",
    "DefinitionType",
    "DurationType",
    "ElementType",
    "EventTriggerType",
    "InterferenceType",
    "ObjectType",
    "OperationType",
    "PartitioningType",
    "PredefinedType",
    "PrimaryMeasureType",
    "ProcessType",
    "ProfileType",
    "RecurrenceType",
    "RelatedConnectionType",
    "RelatedObjectsType",
    "RelatingConnectionType",
    "RelatingType",
    "RelationshipType",
    "RepresentationType",
    "ResourceType",
    "SecondaryMeasureType",
    "SectionType",
    "SequenceType",
    "SystemType",
    "TemplateType",
    "TheoryType",
    "TimeSeriesDataType",
    "UnitType",
    "UserDefinedEventTriggerType",
    "UserDefinedOperationType",
    "UserDefinedPartitioningType",
    "UserDefinedSequenceType",
    "UserDefinedType",
];

/// Enumeration tokens that carry no information
pub const EXCLUDED_ENUM_VALUES: &[&str] = &["NOTDEFINED", "USERDEFINED"];

pub fn is_excluded_attribute(name: &str) -> bool {
    EXCLUDED_ATTRIBUTES.contains(&name)
}

pub fn is_excluded_enum(token: &str) -> bool {
    EXCLUDED_ENUM_VALUES
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(token))
}

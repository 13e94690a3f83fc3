// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export options
//!
//! Every field has a default, so an options file only needs the keys it
//! changes:
//!
//! ```json
//! { "geometry": "none", "classifications": false, "author": "J. Doe" }
//! ```

use crate::error::Result;
use ifc_export_model::EntityType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How product shapes are exported
///
/// A scene may carry both shape kinds; the mode keeps one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryMode {
    /// Faceted boundary representations, tessellated items are dropped
    #[default]
    Brep,
    /// Triangulated face sets, brep topology is dropped
    Tessellation,
    /// No shape representations at all
    None,
}

impl GeometryMode {
    /// `RepresentationType` for shape representations that do not set one
    pub fn representation_type(&self) -> Option<&'static str> {
        match self {
            GeometryMode::Brep => Some("Brep"),
            GeometryMode::Tessellation => Some("Tessellation"),
            GeometryMode::None => None,
        }
    }
}

/// Options bag for one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub geometry: GeometryMode,
    /// `IfcPresentationLayerAssignment`
    pub layers: bool,
    /// Material definitions and their associations
    pub materials: bool,
    /// Styled items, surface styles and colours
    pub colors: bool,
    /// Classifications, references and their associations
    pub classifications: bool,
    /// Surface styles default to `BOTH` sides instead of `POSITIVE`
    pub double_sided_faces: bool,
    /// Type products and `IfcRelDefinesByType`
    pub types: bool,
    pub author: String,
    pub organization: String,
    /// Originating system written to the STEP header
    pub application: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            geometry: GeometryMode::Brep,
            layers: true,
            materials: true,
            colors: true,
            classifications: true,
            double_sided_faces: false,
            types: true,
            author: String::new(),
            organization: String::new(),
            application: format!("ifc-export {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ExportOptions {
    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Name of the option that drops instances of this type, if any
    pub fn dropped_by(&self, entity_type: &EntityType) -> Option<&'static str> {
        let is = |ancestor: &str| entity_type.is_subtype_of(ancestor);

        if !self.layers && is("IfcPresentationLayerAssignment") {
            return Some("layers");
        }
        if !self.materials && (is("IfcMaterialDefinition") || is("IfcRelAssociatesMaterial")) {
            return Some("materials");
        }
        if !self.colors
            && (is("IfcStyledItem")
                || is("IfcPresentationStyle")
                || is("IfcPresentationStyleAssignment")
                || is("IfcSurfaceStyleShading")
                || is("IfcColourSpecification"))
        {
            return Some("colors");
        }
        if !self.classifications
            && (is("IfcClassification")
                || is("IfcClassificationReference")
                || is("IfcRelAssociatesClassification"))
        {
            return Some("classifications");
        }
        if !self.types && (is("IfcTypeObject") || is("IfcRelDefinesByType")) {
            return Some("types");
        }
        let tessellated = is("IfcTessellatedItem") || is("IfcCartesianPointList");
        let brep = is("IfcManifoldSolidBrep")
            || is("IfcConnectedFaceSet")
            || is("IfcFace")
            || is("IfcFaceBound")
            || is("IfcLoop");
        match self.geometry {
            GeometryMode::None
                if tessellated
                    || brep
                    || is("IfcProductRepresentation")
                    || is("IfcRepresentation")
                    || is("IfcRepresentationMap")
                    || is("IfcMappedItem")
                    || is("IfcCartesianTransformationOperator")
                    || is("IfcStyledItem") =>
            {
                Some("geometry")
            }
            GeometryMode::Brep if tessellated => Some("tessellation"),
            GeometryMode::Tessellation if brep => Some("brep"),
            _ => None,
        }
    }

    /// `IfcSurfaceSide` token for styles that do not set one
    pub fn surface_side(&self) -> &'static str {
        if self.double_sided_faces {
            "BOTH"
        } else {
            "POSITIVE"
        }
    }
}

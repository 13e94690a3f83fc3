// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local placement to USD transform

use ifc_export_model::{EntityInstance, EntityResolver};
use nalgebra::{Matrix4, Point3, Vector3};

/// Resolve an `IfcLocalPlacement` to its relative transform
///
/// Only `RelativePlacement` is applied: `PlacementRelTo` is expressed by the
/// node hierarchy. A placement without a resolvable axis placement is the
/// identity.
pub fn local_transform(placement: &EntityInstance, resolver: &impl EntityResolver) -> Matrix4<f64> {
    resolver
        .resolve_attribute(placement, "RelativePlacement")
        .and_then(|axis| axis_transform(axis, resolver))
        .unwrap_or_else(Matrix4::identity)
}

/// Resolve an `IfcAxis2Placement3D` to a transformation matrix
fn axis_transform(placement: &EntityInstance, resolver: &impl EntityResolver) -> Option<Matrix4<f64>> {
    if !placement.is_a("IfcAxis2Placement3D") {
        return None;
    }

    let location = resolver
        .resolve_attribute(placement, "Location")
        .and_then(|p| ratios(p, "Coordinates"))
        .map(|c| Point3::new(c.x, c.y, c.z))
        .unwrap_or_else(Point3::origin);

    // Axis is Z, RefDirection is X
    let axis = resolver
        .resolve_attribute(placement, "Axis")
        .and_then(|d| ratios(d, "DirectionRatios"))
        .unwrap_or_else(|| Vector3::new(0.0, 0.0, 1.0));
    let ref_dir = resolver
        .resolve_attribute(placement, "RefDirection")
        .and_then(|d| ratios(d, "DirectionRatios"))
        .unwrap_or_else(|| Vector3::new(1.0, 0.0, 0.0));

    let z = axis.try_normalize(f64::EPSILON)?;
    let y = z.cross(&ref_dir).try_normalize(f64::EPSILON)?;
    let x = y.cross(&z).normalize();

    Some(Matrix4::new(
        x.x, y.x, z.x, location.x, x.y, y.y, z.y, location.y, x.z, y.z, z.z, location.z, 0.0,
        0.0, 0.0, 1.0,
    ))
}

fn ratios(instance: &EntityInstance, attribute: &str) -> Option<Vector3<f64>> {
    let list = instance.get(attribute)?.as_list()?;
    let component = |i: usize| list.get(i).and_then(|v| v.as_real()).unwrap_or(0.0);
    Some(Vector3::new(component(0), component(1), component(2)))
}

/// Row-major rows in the USD layout (translation in the last row)
pub fn usd_rows(matrix: &Matrix4<f64>) -> [[f64; 4]; 4] {
    let usd = matrix.transpose();
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = usd[(r, c)];
        }
    }
    rows
}

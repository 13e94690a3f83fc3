// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity lookup and reference resolution

use crate::{EntityGraph, EntityId, EntityInstance, Value};

/// Entity lookup by id
///
/// Encoder passes that only follow references take this trait instead of
/// the concrete graph. Implementations provide O(1) lookup.
///
/// # Example
///
/// ```ignore
/// use ifc_export_model::{EntityResolver, EntityGraph};
///
/// fn placement_of(resolver: &impl EntityResolver, wall: &EntityInstance) {
///     if let Some(placement) = wall.get("ObjectPlacement").and_then(|v| resolver.resolve_ref(v)) {
///         println!("placed by {}", placement.id());
///     }
/// }
/// ```
pub trait EntityResolver {
    /// Get instance by id
    fn get(&self, id: EntityId) -> Option<&EntityInstance>;

    /// Follow a reference value
    fn resolve_ref(&self, value: &Value) -> Option<&EntityInstance> {
        value.as_reference().and_then(|id| self.get(id))
    }

    /// Follow every reference in a list value, skipping anything unresolved
    fn resolve_ref_list(&self, value: &Value) -> Vec<&EntityInstance> {
        match value {
            Value::List(items) => items.iter().filter_map(|item| self.resolve_ref(item)).collect(),
            _ => Vec::new(),
        }
    }

    /// Follow a named reference attribute of `instance`
    fn resolve_attribute(&self, instance: &EntityInstance, name: &str) -> Option<&EntityInstance> {
        instance.get(name).and_then(|v| self.resolve_ref(v))
    }
}

impl EntityResolver for EntityGraph<'_> {
    fn get(&self, id: EntityId) -> Option<&EntityInstance> {
        EntityGraph::get(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    #[test]
    fn test_resolve_refs_through_trait() {
        let mut graph = EntityGraph::new(Registry::ifc4().unwrap());
        let a = graph
            .register("IfcCartesianPoint", [("Coordinates", Value::reals([0.0, 0.0, 0.0]))])
            .unwrap()
            .id();
        let b = graph
            .register("IfcCartesianPoint", [("Coordinates", Value::reals([1.0, 0.0, 0.0]))])
            .unwrap()
            .id();
        let placement = graph
            .register("IfcAxis2Placement3D", [("Location", Value::Reference(a))])
            .unwrap()
            .id();

        let resolver: &dyn EntityResolver = &graph;
        let placement = resolver.get(placement).unwrap();
        assert_eq!(resolver.resolve_attribute(placement, "Location").unwrap().id(), a);

        let list = Value::refs([a, b, EntityId(77)]);
        assert_eq!(resolver.resolve_ref_list(&list).len(), 2);
        assert!(resolver.resolve_ref(&Value::Integer(1)).is_none());
    }
}

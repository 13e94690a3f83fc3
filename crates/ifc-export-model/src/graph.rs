// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph for one export session
//!
//! The graph owns every instance created while walking a scene. Instance
//! ids are assigned sequentially from 1 at registration and never reused,
//! so `get` is a plain index into the instance vector.
//!
//! Encoders borrow the graph immutably while registration needs `&mut`,
//! which keeps the graph frozen for the whole encode pass.

use crate::identity::uuid5;
use crate::{EntityId, EntityType, ModelError, Registry, Result, Value};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// One instance of a registered entity type
#[derive(Debug)]
pub struct EntityInstance {
    id: EntityId,
    entity_type: Arc<EntityType>,
    /// One slot per effective attribute
    values: Vec<Value>,
    /// Memoised UUID5 per namespace
    uuids: Mutex<Vec<(String, Uuid)>>,
}

impl EntityInstance {
    /// STEP instance number
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Resolved type
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Canonical type name, e.g. "IfcWall"
    pub fn type_name(&self) -> &'static str {
        self.entity_type.name()
    }

    /// Attribute values in effective-list order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Attribute value by name; unknown names read as `None`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entity_type
            .attribute_index(name)
            .map(|i| &self.values[i])
    }

    /// Text attribute by name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Reference attribute by name
    pub fn reference(&self, name: &str) -> Option<EntityId> {
        self.get(name).and_then(Value::as_reference)
    }

    /// Every reference held in a list attribute
    pub fn references(&self, name: &str) -> Vec<EntityId> {
        self.get(name).map(Value::references).unwrap_or_default()
    }

    /// GlobalId text, if this is a rooted entity with one set
    pub fn global_id(&self) -> Option<&str> {
        self.text("GlobalId")
    }

    /// Name used when deriving UUID5 identities
    ///
    /// The GlobalId when set, otherwise `#<id>`.
    pub fn local_name(&self) -> String {
        match self.global_id() {
            Some(global_id) => global_id.to_string(),
            None => self.id.to_string(),
        }
    }

    /// UUID5 of this instance under `namespace`, computed once
    pub fn uuid5(&self, namespace: &str) -> Uuid {
        let mut cache = self.uuids.lock();
        if let Some((_, uuid)) = cache.iter().find(|(ns, _)| ns == namespace) {
            return *uuid;
        }
        let uuid = uuid5(namespace, &self.local_name());
        cache.push((namespace.to_string(), uuid));
        uuid
    }

    /// Whether this instance's type is `ancestor` or a subtype of it
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.entity_type.is_subtype_of(ancestor)
    }
}

/// Live collection of instances for one export session
#[derive(Debug)]
pub struct EntityGraph<'r> {
    registry: &'r Registry,
    instances: Vec<EntityInstance>,
}

impl<'r> EntityGraph<'r> {
    /// Create an empty graph over a registry
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            instances: Vec::new(),
        }
    }

    /// Registry the graph resolves types against
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Create and store a new instance
    ///
    /// Seed names must belong to the type's effective attribute list and
    /// seed values must fit their slots. On error nothing is stored and the
    /// next id is not consumed.
    pub fn register<I, K>(&mut self, type_name: &str, seed: I) -> Result<&EntityInstance>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let entity_type = self.registry.resolve(type_name)?;
        let mut values = vec![Value::Unset; entity_type.attributes().len()];

        for (name, value) in seed {
            let name = name.as_ref();
            let index = entity_type
                .attribute_index(name)
                .ok_or_else(|| ModelError::unknown_attribute(entity_type.name(), name))?;
            check_kind(&entity_type, index, &value)?;
            values[index] = value;
        }

        let id = EntityId(self.instances.len() as u32 + 1);
        log::trace!("Registered {} {}", id, entity_type.step_name());

        self.instances.push(EntityInstance {
            id,
            entity_type,
            values,
            uuids: Mutex::new(Vec::new()),
        });

        Ok(&self.instances[self.instances.len() - 1])
    }

    /// Replace one attribute value of an existing instance
    pub fn set_attribute(&mut self, id: EntityId, name: &str, value: Value) -> Result<()> {
        let instance = self
            .instances
            .get_mut(index_of(id))
            .ok_or(ModelError::UnknownEntity(id))?;

        let index = instance
            .entity_type
            .attribute_index(name)
            .ok_or_else(|| ModelError::unknown_attribute(instance.entity_type.name(), name))?;
        check_kind(&instance.entity_type, index, &value)?;

        instance.values[index] = value;
        instance.uuids.lock().clear();
        Ok(())
    }

    /// Instance by id
    pub fn get(&self, id: EntityId) -> Option<&EntityInstance> {
        self.instances.get(index_of(id))
    }

    /// Instances in registration order
    pub fn all(&self) -> std::slice::Iter<'_, EntityInstance> {
        self.instances.iter()
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// UUID5 of `instance` under `namespace`, memoised on the instance
    pub fn uuid5_for(&self, instance: &EntityInstance, namespace: &str) -> Uuid {
        instance.uuid5(namespace)
    }

    /// Check an instance is encodable
    ///
    /// Every required slot set, every value fits its slot, every real is
    /// finite and every reference resolves within this graph.
    pub fn validate(&self, instance: &EntityInstance) -> Result<()> {
        let entity_type = &instance.entity_type;

        for (index, (attr, value)) in entity_type
            .attributes()
            .iter()
            .zip(&instance.values)
            .enumerate()
        {
            if attr.is_required() && value.is_unset() {
                return Err(ModelError::MissingRequiredAttribute {
                    entity: instance.id,
                    attribute: attr.name.to_string(),
                });
            }

            check_kind(entity_type, index, value)?;

            if has_non_finite(value) {
                return Err(ModelError::NonFiniteReal {
                    entity_type: entity_type.name().to_string(),
                    attribute: attr.name.to_string(),
                });
            }

            if let Some(target) = value.references().into_iter().find(|r| self.get(*r).is_none()) {
                return Err(ModelError::DanglingReference {
                    entity: instance.id,
                    attribute: attr.name.to_string(),
                    target,
                });
            }
        }

        Ok(())
    }

    /// Instance counts keyed by canonical type name
    pub fn count_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for instance in &self.instances {
            *counts.entry(instance.type_name()).or_insert(0) += 1;
        }
        counts
    }

    /// Instances whose type is exactly `type_name` (case-insensitive)
    pub fn find_by_type(&self, type_name: &str) -> Vec<&EntityInstance> {
        self.instances
            .iter()
            .filter(|i| i.type_name().eq_ignore_ascii_case(type_name))
            .collect()
    }

    /// Instances whose type is `ancestor` or one of its subtypes
    pub fn find_by_supertype(&self, ancestor: &str) -> Vec<&EntityInstance> {
        self.instances.iter().filter(|i| i.is_a(ancestor)).collect()
    }
}

fn index_of(id: EntityId) -> usize {
    (id.0 as usize).wrapping_sub(1)
}

fn check_kind(entity_type: &EntityType, index: usize, value: &Value) -> Result<()> {
    let attr = &entity_type.attributes()[index];
    if !attr.kind.accepts(value) {
        return Err(ModelError::ValueKindMismatch {
            entity_type: entity_type.name().to_string(),
            attribute: attr.name.to_string(),
            expected: attr.kind.to_string(),
            actual: value.kind_name().to_string(),
        });
    }
    if let Some(token) = value.invalid_token() {
        return Err(ModelError::InvalidToken {
            entity_type: entity_type.name().to_string(),
            attribute: attr.name.to_string(),
            token: token.to_string(),
        });
    }
    Ok(())
}

fn has_non_finite(value: &Value) -> bool {
    match value {
        Value::Real(f) => !f.is_finite(),
        Value::List(items) => items.iter().any(has_non_finite),
        Value::Typed(_, inner) => has_non_finite(inner),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static Registry {
        Registry::ifc4().unwrap()
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut graph = EntityGraph::new(registry());
        for n in 0..5 {
            let point = graph
                .register("IfcCartesianPoint", [("Coordinates", Value::reals([n as f64, 0.0, 0.0]))])
                .unwrap();
            assert_eq!(point.id(), EntityId(n + 1));
        }
        let ids: Vec<_> = graph.all().map(|i| i.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_attribute_leaves_graph_unchanged() {
        let mut graph = EntityGraph::new(registry());
        graph
            .register("IfcWall", [("GlobalId", Value::text("2O2Fr$t4X7Zf8NOew3FLOH"))])
            .unwrap();

        let err = graph
            .register("IfcWall", [("Name", Value::text("W")), ("Colour", Value::text("red"))])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownAttribute {
                entity_type: "IfcWall".to_string(),
                attribute: "Colour".to_string(),
            }
        );
        assert_eq!(graph.len(), 1);

        let next = graph.register("IfcWall", Vec::<(&str, Value)>::new()).unwrap();
        assert_eq!(next.id(), EntityId(2));
    }

    #[test]
    fn test_unknown_type() {
        let mut graph = EntityGraph::new(registry());
        let err = graph.register("IfcUnicorn", Vec::<(&str, Value)>::new()).unwrap_err();
        assert_eq!(err, ModelError::UnknownType("IfcUnicorn".to_string()));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_kind_mismatch_on_register() {
        let mut graph = EntityGraph::new(registry());
        let err = graph
            .register("IfcColourRgb", [("Red", Value::Integer(1))])
            .unwrap_err();
        assert!(matches!(err, ModelError::ValueKindMismatch { .. }));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let mut graph = EntityGraph::new(registry());
        let err = graph
            .register("IfcWall", [("PredefinedType", Value::enumeration("NOT DEFINED"))])
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidToken {
                entity_type: "IfcWall".to_string(),
                attribute: "PredefinedType".to_string(),
                token: "NOT DEFINED".to_string(),
            }
        );
        assert!(graph.is_empty());

        let wall = graph.register("IfcWall", Vec::<(&str, Value)>::new()).unwrap().id();
        let err = graph
            .set_attribute(wall, "PredefinedType", Value::enumeration(""))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidToken { .. }));

        let property = graph
            .register("IfcPropertySingleValue", [("Name", Value::text("Width"))])
            .unwrap()
            .id();
        let err = graph
            .set_attribute(property, "NominalValue", Value::typed("IFC-LABEL", Value::text("x")))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidToken { token, .. } if token == "IFC-LABEL"));
    }

    #[test]
    fn test_set_attribute_fills_forward_reference() {
        let mut graph = EntityGraph::new(registry());
        let placement = graph.register("IfcLocalPlacement", Vec::<(&str, Value)>::new()).unwrap().id();
        let axis = graph.register("IfcAxis2Placement3D", Vec::<(&str, Value)>::new()).unwrap().id();

        graph
            .set_attribute(placement, "RelativePlacement", Value::Reference(axis))
            .unwrap();
        assert_eq!(
            graph.get(placement).unwrap().reference("RelativePlacement"),
            Some(axis)
        );

        assert_eq!(
            graph.set_attribute(EntityId(99), "Name", Value::Unset).unwrap_err(),
            ModelError::UnknownEntity(EntityId(99))
        );
    }

    #[test]
    fn test_validate_required_and_dangling() {
        let mut graph = EntityGraph::new(registry());
        let missing = graph.register("IfcWall", Vec::<(&str, Value)>::new()).unwrap().id();
        let err = graph.validate(graph.get(missing).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingRequiredAttribute {
                entity: missing,
                attribute: "GlobalId".to_string(),
            }
        );

        let dangling = graph
            .register(
                "IfcWall",
                [
                    ("GlobalId", Value::text("2O2Fr$t4X7Zf8NOew3FLOH")),
                    ("ObjectPlacement", Value::Reference(EntityId(40))),
                ],
            )
            .unwrap()
            .id();
        let err = graph.validate(graph.get(dangling).unwrap()).unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { target: EntityId(40), .. }));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut graph = EntityGraph::new(registry());
        let point = graph
            .register("IfcCartesianPoint", [("Coordinates", Value::reals([0.0, f64::NAN]))])
            .unwrap()
            .id();
        let err = graph.validate(graph.get(point).unwrap()).unwrap_err();
        assert!(matches!(err, ModelError::NonFiniteReal { .. }));
    }

    #[test]
    fn test_uuid5_uses_global_id_then_step_id() {
        let mut graph = EntityGraph::new(registry());
        let project = graph
            .register("IfcProject", [("GlobalId", Value::text("0$9GJWJub1qveC0mNeB3C1"))])
            .unwrap()
            .id();
        let point = graph
            .register("IfcCartesianPoint", [("Coordinates", Value::reals([0.0]))])
            .unwrap()
            .id();

        let project = graph.get(project).unwrap();
        assert_eq!(
            graph.uuid5_for(project, "IfcProject"),
            uuid5("IfcProject", "0$9GJWJub1qveC0mNeB3C1")
        );
        // Second call hits the cache and agrees
        assert_eq!(project.uuid5("IfcProject"), graph.uuid5_for(project, "IfcProject"));

        let point = graph.get(point).unwrap();
        assert_eq!(point.local_name(), "#2");
        assert_eq!(point.uuid5("IfcCartesianPoint"), uuid5("IfcCartesianPoint", "#2"));
    }

    #[test]
    fn test_counts_and_lookups() {
        let mut graph = EntityGraph::new(registry());
        graph.register("IfcWall", Vec::<(&str, Value)>::new()).unwrap();
        graph.register("IfcWall", Vec::<(&str, Value)>::new()).unwrap();
        graph.register("IfcSlab", Vec::<(&str, Value)>::new()).unwrap();

        let counts = graph.count_by_type();
        assert_eq!(counts.get("IfcWall"), Some(&2));
        assert_eq!(counts.get("IfcSlab"), Some(&1));
        assert_eq!(graph.find_by_type("IFCWALL").len(), 2);
        assert_eq!(graph.find_by_supertype("IfcBuildingElement").len(), 3);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene tree recovered from relationship instances
//!
//! A single read-only pass over the graph collects:
//!
//! - parent -> children edges from `IfcRelAggregates` and
//!   `IfcRelContainedInSpatialStructure`
//! - which product each `IfcLocalPlacement` positions
//! - which product each representation item (e.g. a triangulated face set)
//!   belongs to, following `Representation` -> `Representations` -> `Items`

use ifc_export_model::{EntityGraph, EntityId, EntityInstance, EntityResolver};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hierarchy {
    /// Children per parent, in relationship order, without duplicates
    pub children: BTreeMap<EntityId, Vec<EntityId>>,
    /// Placement -> the product it positions
    pub placed_products: FxHashMap<EntityId, EntityId>,
    /// Representation item -> the product whose shape contains it
    pub item_owners: FxHashMap<EntityId, EntityId>,
}

impl Hierarchy {
    /// Build the hierarchy of a graph
    pub fn build(graph: &EntityGraph<'_>) -> Self {
        let mut hierarchy = Self::default();

        for instance in graph.all() {
            match instance.type_name() {
                "IfcRelAggregates" => {
                    hierarchy.link(instance, graph, "RelatingObject", "RelatedObjects")
                }
                "IfcRelContainedInSpatialStructure" => {
                    hierarchy.link(instance, graph, "RelatingStructure", "RelatedElements")
                }
                _ if instance.is_a("IfcProduct") => hierarchy.record_product(instance, graph),
                _ => {}
            }
        }

        log::debug!(
            "Hierarchy: {} parents, {} placements, {} shape items",
            hierarchy.children.len(),
            hierarchy.placed_products.len(),
            hierarchy.item_owners.len()
        );
        hierarchy
    }

    /// Children of `parent`
    pub fn children_of(&self, parent: EntityId) -> &[EntityId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn product_placed_by(&self, placement: EntityId) -> Option<EntityId> {
        self.placed_products.get(&placement).copied()
    }

    pub fn owner_of_item(&self, item: EntityId) -> Option<EntityId> {
        self.item_owners.get(&item).copied()
    }

    fn link(
        &mut self,
        relationship: &EntityInstance,
        resolver: &impl EntityResolver,
        parent_attribute: &str,
        children_attribute: &str,
    ) {
        let Some(parent) = resolver.resolve_attribute(relationship, parent_attribute) else {
            return;
        };
        let Some(related) = relationship.get(children_attribute) else {
            return;
        };

        let children = self.children.entry(parent.id()).or_default();
        for child in resolver.resolve_ref_list(related) {
            if !children.contains(&child.id()) {
                children.push(child.id());
            }
        }
    }

    fn record_product(&mut self, product: &EntityInstance, resolver: &impl EntityResolver) {
        if let Some(placement) = product.reference("ObjectPlacement") {
            self.placed_products.entry(placement).or_insert(product.id());
        }

        let Some(shape) = resolver.resolve_attribute(product, "Representation") else {
            return;
        };
        let Some(representations) = shape.get("Representations") else {
            return;
        };
        for representation in resolver.resolve_ref_list(representations) {
            for item in representation.references("Items") {
                self.item_owners.entry(item).or_insert(product.id());
            }
        }
    }
}

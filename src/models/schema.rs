//! Aggregate schema model produced by one extraction run

use super::domain::Domain;
use super::item::Item;
use super::relationship::RelationshipClass;
use super::spatial_reference::SpatialReference;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Immutable result of an extraction run
///
/// Items keep catalog scan order, domains and spatial references keep the
/// order in which they were first referenced, relationship classes keep
/// relationship scan order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SchemaModel {
    /// Keyed by item UUID
    pub items: IndexMap<String, Item>,
    /// Keyed by domain name
    pub domains: IndexMap<String, Domain>,
    /// Keyed by SRID
    pub spatial_references: IndexMap<i32, SpatialReference>,
    pub relationship_classes: Vec<RelationshipClass>,
}

impl SchemaModel {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.domains.is_empty()
            && self.spatial_references.is_empty()
            && self.relationship_classes.is_empty()
    }

    pub fn feature_classes(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|item| item.is_feature_class())
    }

    pub fn tables(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|item| !item.is_feature_class())
    }
}

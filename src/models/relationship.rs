//! Relationship class model

use serde::{Deserialize, Serialize};

/// Key pair joining the two sides of a relationship
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipRule {
    pub origin_key: String,
    pub destination_key: String,
}

/// Relationship class joined from `GDB_ItemRelationships` and `GDB_Items`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipClass {
    pub item_uuid: String,
    pub name: String,
    pub origin_item_uuid: String,
    pub destination_item_uuid: String,
    pub origin_table_name: String,
    pub destination_table_name: String,
    /// e.g. `esriRelCardinalityOneToMany`; `Unknown` when absent
    pub cardinality: String,
    /// e.g. `esriRelTypeSimple`; `Unknown` when absent
    pub relationship_type: String,
    #[serde(default)]
    pub forward_path_label: String,
    #[serde(default)]
    pub backward_path_label: String,
    /// Empty when no known key shape matched
    #[serde(default)]
    pub rules: Vec<RelationshipRule>,
    /// Definition of the relationship item in `GDB_Items`
    #[serde(default)]
    pub definition: String,
    /// Definition stored on the `GDB_ItemRelationships` row itself
    #[serde(default)]
    pub item_relationship_definition: String,
}

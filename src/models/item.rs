//! Catalog item model (feature classes and plain tables)

use super::field::{Field, Subtype};
use serde::{Deserialize, Serialize};

/// Type GUID of plain tables in `GDB_Items.Type`
pub const TABLE_TYPE_GUID: &str = "{CD06BC1B-789D-4C51-AAFA-4875E4034352}";
/// Type GUID of relationship classes in `GDB_Items.Type`
pub const RELATIONSHIP_CLASS_TYPE_GUID: &str = "{B606A7E1-FA5B-439C-849C-6E9C2481537B}";
/// Type GUID of feature classes in `GDB_Items.Type`
///
/// Feature classes are recognised from their geometry markers, not from this
/// GUID; it is kept for callers that want to cross-check.
pub const FEATURE_CLASS_TYPE_GUID: &str = "{70737809-852C-4A03-9E22-2CECEA5B9BFA}";

/// Variant-specific part of an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    FeatureClass {
        geometry_column_name: String,
        geometry_type: String,
        /// 0 when the definition carries no parsable SRID
        srid: i32,
    },
    /// Plain table, or a relationship class item (its definition is table-shaped)
    Table {
        #[serde(default)]
        is_relationship_class: bool,
    },
}

/// A feature class or table reconstructed from `GDB_Items`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub item_uuid: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// Table holding the data; falls back to `name`
    pub physical_name: String,
    /// Raw definition XML
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub item_type_guid: String,
    #[serde(default)]
    pub dataset_name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<Subtype>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology_participation: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_rules: Option<Vec<String>>,
}

impl Item {
    pub fn new(item_uuid: String, name: String, kind: ItemKind) -> Self {
        Self {
            physical_name: name.clone(),
            item_uuid,
            name,
            path: String::new(),
            definition: String::new(),
            item_type_guid: String::new(),
            dataset_name: String::new(),
            kind,
            fields: Vec::new(),
            subtype_field_name: None,
            subtypes: None,
            topology_participation: None,
            attribute_rules: None,
        }
    }

    pub fn is_feature_class(&self) -> bool {
        matches!(self.kind, ItemKind::FeatureClass { .. })
    }

    pub fn is_relationship_class(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Table {
                is_relationship_class: true
            }
        )
    }

    /// SRID of a feature class, if it has a positive one
    pub fn srid(&self) -> Option<i32> {
        match self.kind {
            ItemKind::FeatureClass { srid, .. } if srid > 0 => Some(srid),
            _ => None,
        }
    }

    /// Distinct non-empty field domain names in field order
    pub fn domain_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            if field.has_domain() && !names.contains(&field.domain_name.as_str()) {
                names.push(&field.domain_name);
            }
        }
        names
    }
}

/// Case-insensitive comparison used for `GDB_Items.Type` GUIDs
pub fn type_guid_matches(value: &str, guid: &str) -> bool {
    value.trim().eq_ignore_ascii_case(guid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_flattened_with_tag() {
        let item = Item::new(
            "{1}".to_string(),
            "Parcels".to_string(),
            ItemKind::FeatureClass {
                geometry_column_name: "Shape".to_string(),
                geometry_type: "esriGeometryPolygon".to_string(),
                srid: 2056,
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "feature_class");
        assert_eq!(json["srid"], 2056);

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_srid_only_for_positive_feature_classes() {
        let table = Item::new(
            "{2}".to_string(),
            "Owners".to_string(),
            ItemKind::Table {
                is_relationship_class: false,
            },
        );
        assert_eq!(table.srid(), None);
        assert_eq!(table.physical_name, "Owners");
    }

    #[test]
    fn test_type_guid_comparison_ignores_case() {
        assert!(type_guid_matches(
            "{cd06bc1b-789d-4c51-aafa-4875e4034352}",
            TABLE_TYPE_GUID
        ));
        assert!(!type_guid_matches("", TABLE_TYPE_GUID));
    }
}

//! Field and subtype models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute field of a feature class or table
///
/// # Example
///
/// ```rust
/// use gdb_schema_sdk::models::Field;
///
/// let field = Field::new("NAME".to_string(), "esriFieldTypeString".to_string());
/// assert!(!field.has_domain());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Field {
    pub name: String,
    /// Esri field type (e.g. `esriFieldTypeString`)
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub alias_name: String,
    #[serde(default)]
    pub is_nullable: bool,
    /// Declared length; 0 when absent or unparsable
    #[serde(default)]
    pub length: i32,
    /// Default domain of the field; empty when none
    #[serde(default)]
    pub domain_name: String,
}

impl Field {
    pub fn new(name: String, field_type: String) -> Self {
        Self {
            name,
            field_type,
            ..Default::default()
        }
    }

    pub fn has_domain(&self) -> bool {
        !self.domain_name.is_empty()
    }
}

/// Per-subtype override of a field's default value and/or domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FieldDefault {
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub domain_name: String,
}

impl FieldDefault {
    /// An override carries information only if one of its parts is set
    pub fn is_meaningful(&self) -> bool {
        !self.default_value.is_empty() || !self.domain_name.is_empty()
    }
}

/// Named partition of an item's rows keyed by an integer code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Subtype {
    pub code: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Field name to override; a later entry for the same field replaces an earlier one
    #[serde(default)]
    pub field_defaults: BTreeMap<String, FieldDefault>,
}

impl Subtype {
    pub fn new(code: i32, name: String) -> Self {
        Self {
            code,
            name,
            ..Default::default()
        }
    }
}

//! Attribute domain model

use serde::{Deserialize, Serialize};

/// Kind of value constraint a domain expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DomainType {
    CodedValue,
    Range,
    #[default]
    Unknown,
}

impl DomainType {
    /// Interpret the declared domain-kind text from the domain catalog
    pub fn from_declared(declared: &str) -> Self {
        match declared.trim() {
            "CodedValue" => DomainType::CodedValue,
            "Range" => DomainType::Range,
            _ => DomainType::Unknown,
        }
    }
}

impl std::fmt::Display for DomainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainType::CodedValue => write!(f, "CodedValue"),
            DomainType::Range => write!(f, "Range"),
            DomainType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One entry of a coded-value domain; codes are kept as text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodedValue {
    pub code: String,
    pub name: String,
}

/// Bounds of a range domain, kept as text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeValue {
    pub min_value: String,
    pub max_value: String,
}

/// Attribute domain from `GDB_Domains`
///
/// Starts life as a stub holding only the name (registered when a field
/// references it) and is filled in by domain resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Esri field type the domain applies to
    #[serde(default)]
    pub field_type: String,
    #[serde(default)]
    pub domain_type: DomainType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coded_values: Option<Vec<CodedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_value: Option<RangeValue>,
    #[serde(default)]
    pub owner: String,
    /// Raw definition XML
    #[serde(default)]
    pub definition: String,
}

impl Domain {
    /// Unresolved entry carrying only the domain name
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

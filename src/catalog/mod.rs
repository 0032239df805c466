//! Catalog storage abstraction
//!
//! Defines the `CatalogStore` trait over the geodatabase system tables and
//! the raw row types it yields:
//! - `GDB_Items`: items with their definition XML (mandatory)
//! - `GDB_Domains`: attribute domains (optional)
//! - `GDB_SpatialRefs`: spatial reference systems (optional)
//! - `GDB_ItemRelationships`: relationship rows (optional)
//!
//! `SqliteCatalog` implements the trait for mobile geodatabase files.

pub mod reader;
pub mod sqlite;

pub use reader::{CatalogTables, scan_items, scan_relationships};
pub use sqlite::SqliteCatalog;

/// Geodatabase system tables read by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    Items,
    Domains,
    SpatialRefs,
    ItemRelationships,
}

impl CatalogTable {
    pub const ALL: [CatalogTable; 4] = [
        CatalogTable::Items,
        CatalogTable::Domains,
        CatalogTable::SpatialRefs,
        CatalogTable::ItemRelationships,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogTable::Items => "GDB_Items",
            CatalogTable::Domains => "GDB_Domains",
            CatalogTable::SpatialRefs => "GDB_SpatialRefs",
            CatalogTable::ItemRelationships => "GDB_ItemRelationships",
        }
    }

    /// Only the item catalog is required for a run
    pub fn is_mandatory(&self) -> bool {
        matches!(self, CatalogTable::Items)
    }
}

/// Column of `GDB_Domains` holding the domain kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKindColumn {
    /// `Type`, tried first
    Type,
    /// `DomainType`, used once `Type` turned out not to exist
    DomainType,
}

impl DomainKindColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            DomainKindColumn::Type => "Type",
            DomainKindColumn::DomainType => "DomainType",
        }
    }
}

/// Row of `GDB_Items`; NULL columns read as empty strings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRow {
    pub uuid: String,
    pub name: String,
    pub path: String,
    pub definition: String,
    pub type_guid: String,
    pub physical_name: String,
    pub dataset_name: String,
}

/// Row of `GDB_Domains`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainRow {
    pub domain_name: String,
    pub description: String,
    pub field_type: String,
    pub domain_type: String,
    pub definition: String,
    pub owner: String,
}

/// Row of `GDB_SpatialRefs`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpatialRefRow {
    pub srid: i32,
    pub name: String,
    pub wkt: String,
}

/// Row of `GDB_ItemRelationships`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationshipRow {
    pub uuid: String,
    pub origin_uuid: String,
    pub destination_uuid: String,
    pub name: String,
    pub definition: String,
}

/// Error type for catalog access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Cannot open catalog '{path}': {reason}")]
    Open { path: String, reason: String },
    #[error("No such column: {0}")]
    MissingColumn(String),
    #[error("Query error: {0}")]
    Query(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        match lowered.find("no such column:") {
            Some(pos) => {
                let column = message[pos + "no such column:".len()..]
                    .split_whitespace()
                    .next()
                    .unwrap_or_default();
                CatalogError::MissingColumn(column.to_string())
            }
            None => CatalogError::Query(message),
        }
    }
}

/// Read access to the geodatabase system tables
///
/// Implementations perform blocking I/O and define no timeout of their own.
pub trait CatalogStore {
    /// Check whether a system table exists
    fn has_table(&self, table: CatalogTable) -> Result<bool, CatalogError>;

    /// All rows of the item catalog, in storage order
    fn item_rows(&self) -> Result<Vec<ItemRow>, CatalogError>;

    /// Point lookup of one domain by name, reading its kind from `column`
    fn find_domain(
        &self,
        name: &str,
        column: DomainKindColumn,
    ) -> Result<Option<DomainRow>, CatalogError>;

    /// Point lookup of one spatial reference by exact SRID
    fn find_spatial_reference(&self, srid: i32) -> Result<Option<SpatialRefRow>, CatalogError>;

    /// All rows of the relationship catalog, in storage order
    fn relationship_rows(&self) -> Result<Vec<RelationshipRow>, CatalogError>;
}

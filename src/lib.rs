//! Geodatabase Schema SDK - reconstructs the schema of Esri mobile geodatabases
//!
//! Reads the SQLite system tables of a geodatabase (`GDB_Items`, `GDB_Domains`,
//! `GDB_SpatialRefs`, `GDB_ItemRelationships`) and the XML definitions they
//! carry, and builds a normalized `SchemaModel`:
//! - Feature classes and tables with their fields, subtypes, topology and
//!   attribute rule notes
//! - Coded value and range domains
//! - Spatial reference systems
//! - Relationship classes with their key rules
//!
//! Catalogs are opened read-only. Problems with individual entries are
//! collected as warnings instead of aborting the run.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod import;
pub mod models;
pub mod report;
#[cfg(feature = "server")]
pub mod server;
pub mod text;
pub mod xml;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogStore, SqliteCatalog};
pub use config::{BoundingBox, ConfigError, ExtractOptions, ServerConfig};
pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use import::{ExtractionReport, RunStatus, SchemaExtractor, extract_schema};
pub use report::render_text;
pub use xml::XmlError;

// Re-export models
pub use models::{
    CodedValue, Domain, DomainType, Field, FieldDefault, Item, ItemKind, RangeValue,
    RelationshipClass, RelationshipRule, SchemaModel, SpatialReference, Subtype,
};

//! Import functionality
//!
//! Reconstructs a `SchemaModel` from a geodatabase catalog in phases:
//! - Definitions: feature classes and tables from `GDB_Items`
//! - Domains: coded value and range domains from `GDB_Domains`
//! - Spatial references: SRS names and WKT from `GDB_SpatialRefs`
//! - Relationships: relationship classes from `GDB_ItemRelationships`
//!
//! `SchemaExtractor` runs the phases in order and collects warnings.

pub mod definition;
pub mod domains;
pub mod extractor;
pub mod relationships;
pub mod spatial_refs;

pub use definition::{ParsedDefinitions, parse_definitions, parse_item};
pub use domains::resolve_domains;
pub use extractor::{ExtractionReport, RunStatus, SchemaExtractor, extract_schema};
pub use relationships::resolve_relationships;
pub use spatial_refs::resolve_spatial_references;

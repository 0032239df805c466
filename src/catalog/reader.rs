//! Catalog reader: table probe and row scans
//!
//! Decides which system tables take part in a run and filters item rows
//! that cannot be classified before any XML is touched.

use super::{CatalogError, CatalogStore, CatalogTable, ItemRow, RelationshipRow};
use crate::diagnostics::{Diagnostics, WarningKind};
use tracing::debug;

/// Presence of each system table in the opened catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogTables {
    pub items: bool,
    pub domains: bool,
    pub spatial_refs: bool,
    pub relationships: bool,
}

impl CatalogTables {
    /// Probe every system table
    ///
    /// Each absent optional table is recorded as one `MissingTable` warning;
    /// the absence of the item catalog is left for the caller to treat as fatal.
    pub fn probe<S: CatalogStore + ?Sized>(
        store: &S,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, CatalogError> {
        let mut tables = CatalogTables::default();
        for table in CatalogTable::ALL {
            let present = store.has_table(table)?;
            if !present && !table.is_mandatory() {
                diagnostics.record(
                    WarningKind::MissingTable,
                    table.table_name(),
                    format!(
                        "Table '{}' not found; its contribution is skipped",
                        table.table_name()
                    ),
                );
            }
            tables.set(table, present);
        }
        Ok(tables)
    }

    fn set(&mut self, table: CatalogTable, present: bool) {
        match table {
            CatalogTable::Items => self.items = present,
            CatalogTable::Domains => self.domains = present,
            CatalogTable::SpatialRefs => self.spatial_refs = present,
            CatalogTable::ItemRelationships => self.relationships = present,
        }
    }

    pub fn contains(&self, table: CatalogTable) -> bool {
        match table {
            CatalogTable::Items => self.items,
            CatalogTable::Domains => self.domains,
            CatalogTable::SpatialRefs => self.spatial_refs,
            CatalogTable::ItemRelationships => self.relationships,
        }
    }
}

/// Scan the item catalog
///
/// Rows with a blank UUID or a blank definition cannot be classified and are
/// dropped without a warning. A blank physical name falls back to the item name.
pub fn scan_items<S: CatalogStore + ?Sized>(store: &S) -> Result<Vec<ItemRow>, CatalogError> {
    let rows = store.item_rows()?;
    let total = rows.len();
    let kept: Vec<ItemRow> = rows
        .into_iter()
        .filter(|row| !row.uuid.trim().is_empty() && !row.definition.trim().is_empty())
        .map(|mut row| {
            if row.physical_name.trim().is_empty() {
                row.physical_name = row.name.clone();
            }
            row
        })
        .collect();
    if kept.len() < total {
        debug!(
            "Dropped {} item row(s) without UUID or definition",
            total - kept.len()
        );
    }
    Ok(kept)
}

/// Scan the relationship catalog
pub fn scan_relationships<S: CatalogStore + ?Sized>(
    store: &S,
) -> Result<Vec<RelationshipRow>, CatalogError> {
    store.relationship_rows()
}

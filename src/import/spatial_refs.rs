//! Spatial reference resolution

use crate::catalog::{CatalogError, CatalogStore};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::models::SpatialReference;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Fill SRID stubs from `GDB_SpatialRefs`
///
/// Every stub is kept: an SRID without a catalog row keeps an empty name and
/// definition and is reported. When the table is absent the stubs are returned
/// untouched. A failing lookup aborts the phase.
pub fn resolve_spatial_references<S: CatalogStore + ?Sized>(
    store: &S,
    table_present: bool,
    stubs: IndexMap<i32, SpatialReference>,
    diagnostics: &mut Diagnostics,
) -> Result<IndexMap<i32, SpatialReference>, CatalogError> {
    if stubs.is_empty() || !table_present {
        return Ok(stubs);
    }

    let mut resolved = IndexMap::with_capacity(stubs.len());
    for (srid, mut reference) in stubs {
        match store.find_spatial_reference(srid)? {
            Some(row) => {
                debug!("Resolved SRID {} as '{}'", srid, row.name);
                reference.srs_name = row.name;
                reference.srs_definition = row.wkt;
            }
            None => diagnostics.record(
                WarningKind::SpatialReferenceNotFound,
                srid.to_string(),
                format!("SRID {srid} not found in GDB_SpatialRefs"),
            ),
        }
        resolved.insert(srid, reference);
    }

    info!(
        "Resolved {} of {} spatial reference(s)",
        resolved.values().filter(|r| r.is_resolved()).count(),
        resolved.len()
    );
    Ok(resolved)
}

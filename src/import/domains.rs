//! Domain resolution
//!
//! Each domain referenced by a field is looked up by name in `GDB_Domains`
//! and filled in from its row and definition XML. Catalogs disagree on the
//! name of the column holding the domain kind: `Type` is tried first and, once
//! the catalog reports it missing, `DomainType` is used for the rest of the run.

use crate::catalog::{CatalogError, CatalogStore, DomainKindColumn, DomainRow};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::models::{CodedValue, Domain, DomainType, RangeValue};
use crate::xml::{self, XmlError};
use indexmap::IndexMap;
use tracing::{debug, info};

const RANGE_TAGS: &[&str] = &["Range", "RangeDomain"];
const MIN_TAGS: &[&str] = &["MinValue", "Min"];
const MAX_TAGS: &[&str] = &["MaxValue", "Max"];

/// Resolve domain stubs against the domain catalog
///
/// Stubs are processed in reference order. A stub that cannot be found, or
/// whose row cannot be processed, is dropped with a warning. The stub that
/// triggers the `Type` to `DomainType` switch stays unresolved. When the
/// domain catalog is absent no domain survives.
pub fn resolve_domains<S: CatalogStore + ?Sized>(
    store: &S,
    table_present: bool,
    stubs: IndexMap<String, Domain>,
    diagnostics: &mut Diagnostics,
) -> IndexMap<String, Domain> {
    if stubs.is_empty() {
        return stubs;
    }
    if !table_present {
        info!(
            "Domain catalog absent; dropping {} domain reference(s)",
            stubs.len()
        );
        return IndexMap::new();
    }

    let mut column = DomainKindColumn::Type;
    let mut resolved = IndexMap::with_capacity(stubs.len());

    for (name, stub) in stubs {
        match store.find_domain(&name, column) {
            Ok(Some(row)) => match build_domain(stub, row) {
                Ok(domain) => {
                    debug!("Resolved domain '{}' as {}", name, domain.domain_type);
                    resolved.insert(name, domain);
                }
                Err(e) => diagnostics.record(
                    WarningKind::DomainResolution,
                    name.clone(),
                    format!("Error processing domain '{name}': {e}"),
                ),
            },
            Ok(None) => diagnostics.record(
                WarningKind::DomainNotFound,
                name.clone(),
                format!("Domain '{name}' not found in GDB_Domains"),
            ),
            Err(CatalogError::MissingColumn(missing))
                if column == DomainKindColumn::Type
                    && missing.eq_ignore_ascii_case(DomainKindColumn::Type.column_name()) =>
            {
                column = DomainKindColumn::DomainType;
                diagnostics.record(
                    WarningKind::DomainColumnFallback,
                    name.clone(),
                    format!(
                        "Column 'Type' not found in GDB_Domains; using 'DomainType' for the \
                         remaining domains. Domain '{name}' stays unresolved"
                    ),
                );
                resolved.insert(name, stub);
            }
            Err(e) => diagnostics.record(
                WarningKind::DomainResolution,
                name.clone(),
                format!("Error processing domain '{name}': {e}"),
            ),
        }
    }

    info!("Resolved {} domain(s)", resolved.len());
    resolved
}

/// Fill a stub from its catalog row
///
/// The definition decides the kind when it carries coded values or a range
/// element; otherwise the declared kind is kept.
pub fn build_domain(stub: Domain, row: DomainRow) -> Result<Domain, XmlError> {
    let declared = row.domain_type.trim().to_string();
    let mut domain = Domain {
        description: row.description,
        field_type: row.field_type,
        domain_type: DomainType::from_declared(&declared),
        owner: row.owner,
        definition: row.definition,
        ..stub
    };

    if domain.definition.trim().is_empty() {
        return Ok(domain);
    }

    let root = xml::parse(&domain.definition)?;
    if declared == "CodedValue" || root.contains("CodedValue") {
        domain.domain_type = DomainType::CodedValue;
        domain.coded_values = Some(
            root.find_all("CodedValue")
                .map(|value| CodedValue {
                    code: value.child_text_or_empty("Code"),
                    name: value.child_text_or_empty("Name"),
                })
                .collect(),
        );
    } else if declared == "Range" || root.find_of(RANGE_TAGS).is_some() {
        domain.domain_type = DomainType::Range;
        domain.range_value = root.find_of(RANGE_TAGS).map(|range| RangeValue {
            min_value: range.child_text_of(MIN_TAGS).unwrap_or_default(),
            max_value: range.child_text_of(MAX_TAGS).unwrap_or_default(),
        });
    }
    Ok(domain)
}

//! Extraction orchestrator
//!
//! Runs the phases in fixed order: table probe, item scan, definition
//! parsing, domain resolution, spatial reference resolution and relationship
//! resolution. Each phase hands its output to the next; the orchestrator owns
//! the warning list and converts failures into a run status.

use super::definition::parse_definitions;
use super::domains::resolve_domains;
use super::relationships::resolve_relationships;
use super::spatial_refs::resolve_spatial_references;
use crate::catalog::{
    CatalogStore, CatalogTable, CatalogTables, SqliteCatalog, scan_items, scan_relationships,
};
use crate::config::ExtractOptions;
use crate::diagnostics::{Diagnostics, Warning};
use crate::models::SchemaModel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// The run stopped early; the model holds whatever was built before
    Failed { message: String },
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Input path or label
    pub source: String,
    pub options: ExtractOptions,
    pub status: RunStatus,
    pub model: SchemaModel,
    pub warnings: Vec<Warning>,
}

impl ExtractionReport {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    fn failed(source: String, options: ExtractOptions, message: String) -> Self {
        Self {
            source,
            options,
            status: RunStatus::Failed { message },
            model: SchemaModel::default(),
            warnings: Vec::new(),
        }
    }
}

/// A failed run together with the model built so far
struct RunFailure {
    message: String,
    partial: SchemaModel,
}

impl RunFailure {
    fn new(message: impl Into<String>, partial: SchemaModel) -> Self {
        Self {
            message: message.into(),
            partial,
        }
    }
}

/// Schema extractor over any catalog store
pub struct SchemaExtractor<S> {
    store: S,
    options: ExtractOptions,
    source: String,
}

impl<S: CatalogStore> SchemaExtractor<S> {
    pub fn new(store: S, options: ExtractOptions) -> Self {
        Self {
            store,
            options,
            source: String::new(),
        }
    }

    /// Label the run with its input path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Run all phases
    ///
    /// Never fails: problems are recorded as warnings or turn into a
    /// `RunStatus::Failed` report. The store is only read, so running twice
    /// yields equal reports.
    pub fn run(&self) -> ExtractionReport {
        info!(
            "Extracting schema from '{}' (target SRS: {}, bbox: {})",
            self.source,
            self.options.target_srs,
            self.options
                .bbox
                .map(|b| b.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        let mut diagnostics = Diagnostics::new();
        let (status, model) = match self.run_phases(&mut diagnostics) {
            Ok(model) => {
                info!(
                    "Extraction complete: {} item(s), {} domain(s), {} spatial reference(s), {} relationship class(es), {} warning(s)",
                    model.items.len(),
                    model.domains.len(),
                    model.spatial_references.len(),
                    model.relationship_classes.len(),
                    diagnostics.warnings().len()
                );
                (RunStatus::Completed, model)
            }
            Err(failure) => {
                error!("Extraction failed: {}", failure.message);
                (
                    RunStatus::Failed {
                        message: failure.message,
                    },
                    failure.partial,
                )
            }
        };

        ExtractionReport {
            source: self.source.clone(),
            options: self.options.clone(),
            status,
            model,
            warnings: diagnostics.into_warnings(),
        }
    }

    fn run_phases(&self, diagnostics: &mut Diagnostics) -> Result<SchemaModel, RunFailure> {
        let tables = CatalogTables::probe(&self.store, diagnostics).map_err(|e| {
            RunFailure::new(format!("Cannot read catalog: {e}"), SchemaModel::default())
        })?;
        if !tables.contains(CatalogTable::Items) {
            return Err(RunFailure::new(
                "Required table 'GDB_Items' not found; not a geodatabase catalog",
                SchemaModel::default(),
            ));
        }

        let rows = scan_items(&self.store).map_err(|e| {
            RunFailure::new(format!("Cannot scan GDB_Items: {e}"), SchemaModel::default())
        })?;
        let parsed = parse_definitions(rows, diagnostics);
        let domains = resolve_domains(
            &self.store,
            tables.contains(CatalogTable::Domains),
            parsed.domain_stubs,
            diagnostics,
        );

        let mut model = SchemaModel {
            items: parsed.items,
            domains,
            spatial_references: parsed.srid_stubs,
            relationship_classes: Vec::new(),
        };

        match resolve_spatial_references(
            &self.store,
            tables.contains(CatalogTable::SpatialRefs),
            model.spatial_references.clone(),
            diagnostics,
        ) {
            Ok(resolved) => model.spatial_references = resolved,
            Err(e) => {
                return Err(RunFailure::new(
                    format!("Error resolving spatial references: {e}"),
                    model,
                ));
            }
        }

        if tables.contains(CatalogTable::ItemRelationships) {
            let rows = match scan_relationships(&self.store) {
                Ok(rows) => rows,
                Err(e) => {
                    return Err(RunFailure::new(
                        format!("Cannot scan GDB_ItemRelationships: {e}"),
                        model,
                    ));
                }
            };
            model.relationship_classes = resolve_relationships(rows, &model.items, diagnostics);
        }

        Ok(model)
    }
}

/// Open a geodatabase file read-only and extract its schema
///
/// The connection is closed when this returns.
pub fn extract_schema(path: impl AsRef<Path>, options: &ExtractOptions) -> ExtractionReport {
    let path = path.as_ref();
    let source = path.display().to_string();
    match SqliteCatalog::open_read_only(path) {
        Ok(store) => SchemaExtractor::new(store, options.clone())
            .with_source(source)
            .run(),
        Err(e) => {
            error!("{}", e);
            ExtractionReport::failed(source, options.clone(), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CatalogError, CatalogTable, DomainKindColumn, DomainRow, ItemRow, RelationshipRow,
        SpatialRefRow,
    };
    use crate::diagnostics::WarningKind;

    /// Store whose spatial reference lookups always fail
    struct FlakyStore;

    impl CatalogStore for FlakyStore {
        fn has_table(&self, _table: CatalogTable) -> Result<bool, CatalogError> {
            Ok(true)
        }

        fn item_rows(&self) -> Result<Vec<ItemRow>, CatalogError> {
            Ok(vec![ItemRow {
                uuid: "{P}".to_string(),
                name: "Points".to_string(),
                physical_name: "Points".to_string(),
                definition: "<R><GeometryType>Point</GeometryType><ShapeFieldName>Shape</ShapeFieldName>\
                             <WKID>4326</WKID></R>"
                    .to_string(),
                ..Default::default()
            }])
        }

        fn find_domain(
            &self,
            _name: &str,
            _column: DomainKindColumn,
        ) -> Result<Option<DomainRow>, CatalogError> {
            Ok(None)
        }

        fn find_spatial_reference(&self, _srid: i32) -> Result<Option<SpatialRefRow>, CatalogError> {
            Err(CatalogError::Query("database disk image is malformed".to_string()))
        }

        fn relationship_rows(&self) -> Result<Vec<RelationshipRow>, CatalogError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_unexpected_failure_keeps_partial_model() {
        let report = SchemaExtractor::new(FlakyStore, ExtractOptions::default()).run();

        assert!(matches!(report.status, RunStatus::Failed { .. }));
        assert_eq!(report.model.items.len(), 1);
        assert!(report.model.relationship_classes.is_empty());
        assert!(!report.model.spatial_references[&4326].is_resolved());
    }

    #[test]
    fn test_missing_file_fails_without_model() {
        let report = extract_schema("/nonexistent/dir/none.geodatabase", &ExtractOptions::default());
        assert!(matches!(report.status, RunStatus::Failed { .. }));
        assert!(report.model.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_items_table_is_mandatory() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE GDB_Domains (DomainName TEXT);").unwrap();
        let report =
            SchemaExtractor::new(SqliteCatalog::from_connection(conn), ExtractOptions::default()).run();

        assert!(!report.is_completed());
        assert!(report.model.is_empty());
        assert_eq!(
            report
                .warnings
                .iter()
                .filter(|w| w.kind == WarningKind::MissingTable)
                .count(),
            2
        );
    }
}

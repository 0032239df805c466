//! SQLite-backed catalog store for mobile geodatabases

use super::{
    CatalogError, CatalogStore, CatalogTable, DomainKindColumn, DomainRow, ItemRow,
    RelationshipRow, SpatialRefRow,
};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

const ITEMS_QUERY: &str =
    "SELECT UUID, Name, Path, Definition, Type, PhysicalName, DatasetName FROM GDB_Items";
const SPATIAL_REF_QUERY: &str = "SELECT SRID, SRName, SRTEXT FROM GDB_SpatialRefs WHERE SRID = ?1";
const RELATIONSHIPS_QUERY: &str = "SELECT UUID, OriginItemUUID, DestinationItemUUID, Name, Definition FROM GDB_ItemRelationships";

/// Catalog store over a read-only SQLite connection
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open a geodatabase file read-only
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| CatalogError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Opened catalog {} read-only", path.display());
        Ok(Self { conn })
    }

    /// Wrap an existing connection (used for in-memory catalogs)
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn domain_query(column: DomainKindColumn) -> String {
        format!(
            "SELECT DomainName, Description, FieldType, {} AS DomainType, Definition, Owner \
             FROM GDB_Domains WHERE DomainName = ?1",
            column.column_name()
        )
    }
}

/// Read a column as text, whatever its storage class; NULL reads as empty
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    })
}

impl CatalogStore for SqliteCatalog {
    fn has_table(&self, table: CatalogTable) -> Result<bool, CatalogError> {
        let found = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.table_name()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn item_rows(&self) -> Result<Vec<ItemRow>, CatalogError> {
        let mut stmt = self.conn.prepare(ITEMS_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok(ItemRow {
                uuid: text(row, 0)?,
                name: text(row, 1)?,
                path: text(row, 2)?,
                definition: text(row, 3)?,
                type_guid: text(row, 4)?,
                physical_name: text(row, 5)?,
                dataset_name: text(row, 6)?,
            })
        })?;
        let items = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn find_domain(
        &self,
        name: &str,
        column: DomainKindColumn,
    ) -> Result<Option<DomainRow>, CatalogError> {
        let mut stmt = self.conn.prepare(&Self::domain_query(column))?;
        let row = stmt
            .query_row([name], |row| {
                Ok(DomainRow {
                    domain_name: text(row, 0)?,
                    description: text(row, 1)?,
                    field_type: text(row, 2)?,
                    domain_type: text(row, 3)?,
                    definition: text(row, 4)?,
                    owner: text(row, 5)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    fn find_spatial_reference(&self, srid: i32) -> Result<Option<SpatialRefRow>, CatalogError> {
        let mut stmt = self.conn.prepare(SPATIAL_REF_QUERY)?;
        let row = stmt
            .query_row([srid], |row| {
                Ok(SpatialRefRow {
                    srid,
                    name: text(row, 1)?,
                    wkt: text(row, 2)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    fn relationship_rows(&self) -> Result<Vec<RelationshipRow>, CatalogError> {
        let mut stmt = self.conn.prepare(RELATIONSHIPS_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok(RelationshipRow {
                uuid: text(row, 0)?,
                origin_uuid: text(row, 1)?,
                destination_uuid: text(row, 2)?,
                name: text(row, 3)?,
                definition: text(row, 4)?,
            })
        })?;
        let relationships = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(relationships)
    }
}

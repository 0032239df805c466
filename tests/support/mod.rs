//! Fixture catalogs for integration tests
//!
//! Builds small mobile-geodatabase-shaped SQLite files in a temp directory.

#![allow(dead_code)]

use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TABLE_GUID: &str = "{CD06BC1B-789D-4C51-AAFA-4875E4034352}";
pub const RELATIONSHIP_GUID: &str = "{B606A7E1-FA5B-439C-849C-6E9C2481537B}";
pub const FEATURE_CLASS_GUID: &str = "{70737809-852C-4A03-9E22-2CECEA5B9BFA}";

const ITEMS_DDL: &str = "CREATE TABLE GDB_Items (ObjectID INTEGER PRIMARY KEY, UUID TEXT, \
    Type TEXT, Name TEXT, PhysicalName TEXT, Path TEXT, DatasetName TEXT, Definition TEXT)";
const DOMAINS_DDL: &str = "CREATE TABLE GDB_Domains (DomainName TEXT, Description TEXT, \
    FieldType TEXT, Type TEXT, Definition TEXT, Owner TEXT)";
const LEGACY_DOMAINS_DDL: &str = "CREATE TABLE GDB_Domains (DomainName TEXT, Description TEXT, \
    FieldType TEXT, DomainType TEXT, Definition TEXT, Owner TEXT)";
const SPATIAL_REFS_DDL: &str = "CREATE TABLE GDB_SpatialRefs (SRID INTEGER PRIMARY KEY, \
    SRName TEXT, SRTEXT TEXT)";
const RELATIONSHIPS_DDL: &str = "CREATE TABLE GDB_ItemRelationships (UUID TEXT, \
    OriginItemUUID TEXT, DestinationItemUUID TEXT, Name TEXT, Definition TEXT)";

/// A geodatabase file under construction
pub struct CatalogFixture {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl CatalogFixture {
    /// Empty database file without any system table
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.geodatabase");
        let conn = Connection::open(&path).unwrap();
        Self {
            _dir: dir,
            path,
            conn,
        }
    }

    /// Database with only the item catalog
    pub fn new() -> Self {
        Self::empty().with_ddl(ITEMS_DDL)
    }

    /// Database with every system table present
    pub fn complete() -> Self {
        Self::new()
            .with_domains()
            .with_spatial_refs()
            .with_relationships()
    }

    pub fn with_domains(self) -> Self {
        self.with_ddl(DOMAINS_DDL)
    }

    /// Domain catalog whose kind column is `DomainType` instead of `Type`
    pub fn with_legacy_domains(self) -> Self {
        self.with_ddl(LEGACY_DOMAINS_DDL)
    }

    pub fn with_spatial_refs(self) -> Self {
        self.with_ddl(SPATIAL_REFS_DDL)
    }

    pub fn with_relationships(self) -> Self {
        self.with_ddl(RELATIONSHIPS_DDL)
    }

    fn with_ddl(self, ddl: &str) -> Self {
        self.conn.execute_batch(ddl).unwrap();
        self
    }

    pub fn item(&self, uuid: &str, name: &str, type_guid: &str, definition: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO GDB_Items (UUID, Type, Name, PhysicalName, Path, DatasetName, Definition) \
                 VALUES (?1, ?2, ?3, NULL, ?4, NULL, ?5)",
                params![uuid, type_guid, name, format!("\\{name}"), definition],
            )
            .unwrap();
        self
    }

    /// Insert a domain row; the kind goes into whichever kind column exists
    pub fn domain(&self, name: &str, kind: &str, definition: &str) -> &Self {
        let kind_column = if self.has_column("GDB_Domains", "Type") {
            "Type"
        } else {
            "DomainType"
        };
        self.conn
            .execute(
                &format!(
                    "INSERT INTO GDB_Domains (DomainName, Description, FieldType, {kind_column}, \
                     Definition, Owner) VALUES (?1, ?2, 'esriFieldTypeString', ?3, ?4, 'gis')"
                ),
                params![name, format!("{name} description"), kind, definition],
            )
            .unwrap();
        self
    }

    pub fn spatial_ref(&self, srid: i32, name: &str, wkt: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO GDB_SpatialRefs (SRID, SRName, SRTEXT) VALUES (?1, ?2, ?3)",
                params![srid, name, wkt],
            )
            .unwrap();
        self
    }

    pub fn relationship(&self, uuid: &str, origin: &str, destination: &str, name: &str) -> &Self {
        self.conn
            .execute(
                "INSERT INTO GDB_ItemRelationships VALUES (?1, ?2, ?3, ?4, '<GPRelationshipInfo/>')",
                params![uuid, origin, destination, name],
            )
            .unwrap();
        self
    }

    fn has_column(&self, table: &str, column: &str) -> bool {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        names.iter().any(|n| n == column)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(&self.path).unwrap()
    }
}

/// Feature class definition with one string field
pub fn feature_class_xml(
    name: &str,
    geometry_type: &str,
    wkid: i32,
    field: &str,
    domain: Option<&str>,
) -> String {
    let domain = domain
        .map(|d| format!("<DomainName>{d}</DomainName>"))
        .unwrap_or_default();
    format!(
        r#"<DEFeatureClassInfo xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:typens="http://www.esri.com/schemas/ArcGIS/10.8" xsi:type="typens:DEFeatureClassInfo">
  <CatalogPath>\{name}</CatalogPath>
  <Name>{name}</Name>
  <HasOID>true</HasOID>
  <Fields xsi:type="typens:Fields">
    <FieldArray xsi:type="typens:ArrayOfField">
      <Field xsi:type="typens:Field">
        <Name>{field}</Name>
        <Type>esriFieldTypeString</Type>
        <IsNullable>true</IsNullable>
        <Length>50</Length>
        {domain}
      </Field>
    </FieldArray>
  </Fields>
  <ShapeType>{geometry_type}</ShapeType>
  <ShapeFieldName>Shape</ShapeFieldName>
  <SpatialReference xsi:type="typens:GeographicCoordinateSystem">
    <WKID>{wkid}</WKID>
  </SpatialReference>
</DEFeatureClassInfo>"#
    )
}

/// Table definition with an OBJECTID and one extra field
pub fn table_xml(name: &str, extra: &str) -> String {
    format!(
        r#"<DETableInfo xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:typens="http://www.esri.com/schemas/ArcGIS/10.8" xsi:type="typens:DETableInfo">
  <Name>{name}</Name>
  <Fields><FieldArray>
    <Field><Name>OBJECTID</Name><Type>esriFieldTypeOID</Type><IsNullable>false</IsNullable><Length>4</Length></Field>
    <Field><Name>GlobalID</Name><Type>esriFieldTypeGlobalID</Type><IsNullable>false</IsNullable><Length>38</Length></Field>
  </FieldArray></Fields>
  {extra}
</DETableInfo>"#
    )
}

/// One-to-many relationship class definition
pub fn relationship_xml(name: &str) -> String {
    format!(
        r#"<DERelationshipClassInfo xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:typens="http://www.esri.com/schemas/ArcGIS/10.8" xsi:type="typens:DERelationshipClassInfo">
  <Name>{name}</Name>
  <Cardinality>esriRelCardinalityOneToMany</Cardinality>
  <IsComposite>false</IsComposite>
  <ForwardPathLabel>Owners</ForwardPathLabel>
  <BackwardPathLabel>Parcels</BackwardPathLabel>
  <OriginPrimaryKey>GlobalID</OriginPrimaryKey>
  <OriginForeignKey>ParcelGlobalID</OriginForeignKey>
</DERelationshipClassInfo>"#
    )
}

/// Coded value domain definition
pub fn coded_domain_xml(name: &str, values: &[(&str, &str)]) -> String {
    let values: String = values
        .iter()
        .map(|(code, label)| {
            format!(
                r#"<CodedValue xsi:type="typens:CodedValue"><Name>{label}</Name><Code xsi:type="xs:string">{code}</Code></CodedValue>"#
            )
        })
        .collect();
    format!(
        r#"<GPCodedValueDomain2 xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:typens="http://www.esri.com/schemas/ArcGIS/10.8" xsi:type="typens:GPCodedValueDomain2">
  <DomainName>{name}</DomainName>
  <FieldType>esriFieldTypeString</FieldType>
  <CodedValues xsi:type="typens:ArrayOfCodedValue">{values}</CodedValues>
</GPCodedValueDomain2>"#
    )
}

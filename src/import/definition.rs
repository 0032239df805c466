//! Item definition parsing
//!
//! Turns `GDB_Items` rows into feature classes and tables. Each definition
//! document is classified first; fields, subtypes, topology membership and
//! attribute rules are then read from the same tree. Domains and SRIDs that
//! items refer to are collected as unresolved stubs for the later phases.

use crate::catalog::ItemRow;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::models::item::{
    FEATURE_CLASS_TYPE_GUID, RELATIONSHIP_CLASS_TYPE_GUID, TABLE_TYPE_GUID, type_guid_matches,
};
use crate::models::{Domain, Field, FieldDefault, Item, ItemKind, SpatialReference, Subtype};
use crate::text::{first_line, truncate};
use crate::xml::{self, XmlElement, XmlError};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Geometry type tags, most specific first
///
/// `ShapeType` and `ShapeFieldName` are what ArcGIS writes into
/// `DEFeatureClassInfo` documents, so both geometry tag sets are wider than
/// the two generic names alone.
pub const GEOMETRY_TYPE_TAGS: &[&str] = &["GeometryType", "ShapeType"];
/// Geometry column tags
pub const GEOMETRY_COLUMN_TAGS: &[&str] = &["ShapeField", "ShapeFieldName", "GeometryFieldName"];
/// Spatial reference identifier tags
pub const SRID_TAGS: &[&str] = &["WKID", "SRID"];
/// Element (or `xsi:type` suffix) marking a table definition
pub const TABLE_INFO_TAG: &str = "DETableInfo";
/// Field container; ESRI documents nest a `FieldArray` inside it
pub const FIELDS_TAG: &str = "Fields";
/// Field list used when a definition has no `Fields` container
pub const FIELD_ARRAY_TAG: &str = "FieldArray";

const SUBTYPE_FIELD_TAGS: &[&str] = &["SubtypeFieldName", "SubtypeField"];
const SUBTYPE_CONTAINER_TAGS: &[&str] = &["Subtypes", "SubtypeInfos"];
const SUBTYPE_TAGS: &[&str] = &["Subtype", "SubtypeInfo"];
const RULE_CONTAINER_TAGS: &[&str] = &["Rules", "AttributeRules"];
const RULE_TAGS: &[&str] = &["Rule", "AttributeRule"];
const RULE_NAME_TAGS: &[&str] = &["Name", "RuleName", "ID"];
const RULE_EXPRESSION_TAGS: &[&str] = &["Expression", "ArcadeExpression"];

const EXPRESSION_PREVIEW_CHARS: usize = 50;
const PARSE_MESSAGE_CHARS: usize = 200;

/// Output of the definition phase
#[derive(Debug, Clone, Default)]
pub struct ParsedDefinitions {
    /// Items keyed by UUID; a duplicate UUID replaces the earlier item in place
    pub items: IndexMap<String, Item>,
    /// Domain names referenced by fields, not yet resolved
    pub domain_stubs: IndexMap<String, Domain>,
    /// Positive SRIDs referenced by feature classes, not yet resolved
    pub srid_stubs: IndexMap<i32, SpatialReference>,
}

/// Parse all item rows
///
/// A row whose definition is not well-formed XML is skipped with an
/// `ItemParse` warning; rows that classify as neither feature class nor table
/// are skipped silently.
pub fn parse_definitions(rows: Vec<ItemRow>, diagnostics: &mut Diagnostics) -> ParsedDefinitions {
    let mut parsed = ParsedDefinitions::default();
    let mut unclassified = 0usize;

    for row in rows {
        match parse_item(&row) {
            Ok(Some(item)) => {
                for name in item.domain_names() {
                    parsed
                        .domain_stubs
                        .entry(name.to_string())
                        .or_insert_with(|| Domain::stub(name));
                }
                if let Some(srid) = item.srid() {
                    parsed
                        .srid_stubs
                        .entry(srid)
                        .or_insert_with(|| SpatialReference::stub(srid));
                }
                info!(
                    "Identified {}: {} (UUID: {})",
                    if item.is_feature_class() { "feature class" } else { "table" },
                    item.name,
                    item.item_uuid
                );
                parsed.items.insert(item.item_uuid.clone(), item);
            }
            Ok(None) => unclassified += 1,
            Err(e) => diagnostics.record(
                WarningKind::ItemParse,
                row.name.clone(),
                format!(
                    "Error parsing definition for item '{}' (UUID: {}): {}",
                    row.name,
                    row.uuid,
                    first_line(&e.to_string(), PARSE_MESSAGE_CHARS)
                ),
            ),
        }
    }

    info!(
        "Parsed {} item(s), {} domain reference(s), {} SRID reference(s); {} row(s) not classified",
        parsed.items.len(),
        parsed.domain_stubs.len(),
        parsed.srid_stubs.len(),
        unclassified
    );
    parsed
}

/// Parse one item row
///
/// Returns `Ok(None)` when the definition is well-formed but describes
/// neither a feature class nor a table.
pub fn parse_item(row: &ItemRow) -> Result<Option<Item>, XmlError> {
    let root = xml::parse(&row.definition)?;
    let Some(kind) = classify(&root, &row.type_guid) else {
        return Ok(None);
    };

    let mut item = Item::new(row.uuid.clone(), row.name.clone(), kind);
    item.path = row.path.clone();
    item.physical_name = row.physical_name.clone();
    item.definition = row.definition.clone();
    item.item_type_guid = row.type_guid.clone();
    item.dataset_name = row.dataset_name.clone();
    item.fields = extract_fields(&root);

    if let Some(subtype_field) = root
        .find_text_of(SUBTYPE_FIELD_TAGS)
        .filter(|name| !name.is_empty())
    {
        item.subtypes = extract_subtypes(&root);
        item.subtype_field_name = Some(subtype_field);
    }
    item.topology_participation = extract_topology(&root);
    item.attribute_rules = extract_attribute_rules(&root);

    Ok(Some(item))
}

/// Decide whether a definition is a feature class, a table, or neither
///
/// Feature classes need both a geometry type and a geometry column; the
/// SRID defaults to 0 when absent or not an integer.
pub fn classify(root: &XmlElement, type_guid: &str) -> Option<ItemKind> {
    let geometry_type = root.find_text_of(GEOMETRY_TYPE_TAGS).unwrap_or_default();
    let geometry_column = root.find_text_of(GEOMETRY_COLUMN_TAGS).unwrap_or_default();

    if !geometry_type.is_empty() && !geometry_column.is_empty() {
        let srid = root
            .find_text_of(SRID_TAGS)
            .and_then(|value| value.trim().parse::<i32>().ok())
            .unwrap_or(0);
        return Some(ItemKind::FeatureClass {
            geometry_column_name: geometry_column,
            geometry_type,
            srid,
        });
    }

    if type_guid_matches(type_guid, FEATURE_CLASS_TYPE_GUID) {
        debug!("Feature class type without geometry markers; trying table markers");
    }

    let is_relationship_class = type_guid_matches(type_guid, RELATIONSHIP_CLASS_TYPE_GUID);
    if is_relationship_class || type_guid_matches(type_guid, TABLE_TYPE_GUID) || has_table_marker(root)
    {
        return Some(ItemKind::Table {
            is_relationship_class,
        });
    }
    None
}

fn has_table_marker(root: &XmlElement) -> bool {
    root.contains(TABLE_INFO_TAG)
        || root
            .attribute("type")
            .is_some_and(|value| value.ends_with(TABLE_INFO_TAG))
}

/// Fields of the first field container, in document order
///
/// The first `Fields` element wins; its `Field` children are read directly or
/// through its `FieldArray` child. Index definitions further down carry their
/// own `Fields`/`FieldArray` lists and are never reached once the item's own
/// container is found.
fn extract_fields(root: &XmlElement) -> Vec<Field> {
    let container = match root.find(FIELDS_TAG) {
        Some(fields) => fields.child(FIELD_ARRAY_TAG).unwrap_or(fields),
        None => match root.find(FIELD_ARRAY_TAG) {
            Some(array) => array,
            None => return Vec::new(),
        },
    };
    container.elements_named(&["Field"]).map(parse_field).collect()
}

fn parse_field(element: &XmlElement) -> Field {
    let domain_name = element
        .descendants()
        .find(|e| e.name() == "DomainName")
        .or_else(|| element.child("Domain").and_then(|d| d.child("Name")))
        .map(XmlElement::value)
        .unwrap_or_default();

    Field {
        name: element.child_text_or_empty("Name"),
        field_type: element.child_text_or_empty("Type"),
        alias_name: element.child_text_or_empty("AliasName"),
        is_nullable: element
            .child("IsNullable")
            .is_some_and(|e| e.value().trim().eq_ignore_ascii_case("true")),
        length: element
            .child("Length")
            .and_then(|e| e.value().trim().parse::<i32>().ok())
            .unwrap_or(0),
        domain_name,
    }
}

/// Subtypes of an item; `None` when the definition has no subtype container
fn extract_subtypes(root: &XmlElement) -> Option<Vec<Subtype>> {
    let container = root.find_of(SUBTYPE_CONTAINER_TAGS)?;
    let subtypes = container
        .elements_named(SUBTYPE_TAGS)
        .filter_map(|element| {
            let Some(code) = element
                .child("SubtypeCode")
                .and_then(|e| e.value().trim().parse::<i32>().ok())
            else {
                debug!("Skipping subtype without an integer code");
                return None;
            };
            let mut subtype = Subtype::new(code, element.child_text_or_empty("SubtypeName"));
            subtype.description = element.child_text_or_empty("Description");
            if let Some(infos) = element.child("FieldInfos") {
                for info in infos.elements_named(&["SubtypeFieldInfo"]) {
                    let field_name = info.child_text_or_empty("FieldName");
                    if field_name.is_empty() {
                        continue;
                    }
                    let default = FieldDefault {
                        default_value: info.child_text_or_empty("DefaultValue"),
                        domain_name: info.child_text_or_empty("DomainName"),
                    };
                    if default.is_meaningful() {
                        subtype.field_defaults.insert(field_name, default);
                    }
                }
            }
            Some(subtype)
        })
        .collect();
    Some(subtypes)
}

/// Topology notes; membership and the `IsInTopology` flag are reported independently
fn extract_topology(root: &XmlElement) -> Option<Vec<String>> {
    let mut notes = Vec::new();
    if let Some(membership) = root.find("TopologyMembership") {
        let name = membership
            .child("TopologyName")
            .map(XmlElement::value)
            .unwrap_or_else(|| "Unnamed Topology".to_string());
        notes.push(format!("Participates in Topology: {name}"));
    }
    if root
        .find_all("IsInTopology")
        .any(|e| e.value().trim().eq_ignore_ascii_case("true"))
    {
        notes.push("Participates in an unnamed Topology (IsInTopology=true)".to_string());
    }
    (!notes.is_empty()).then_some(notes)
}

/// One descriptive line per attribute rule
fn extract_attribute_rules(root: &XmlElement) -> Option<Vec<String>> {
    let container = root.find_of(RULE_CONTAINER_TAGS)?;
    let mut notes: Vec<String> = Vec::new();
    for rule in container.elements_named(RULE_TAGS) {
        let name = rule
            .child_text_of(RULE_NAME_TAGS)
            .unwrap_or_else(|| format!("Unnamed Rule {}", notes.len() + 1));
        let rule_type = rule.child_text_or_empty("Type");
        let description = rule.child_text_or_empty("Description");
        let expression = rule.child_text_of(RULE_EXPRESSION_TAGS).unwrap_or_default();
        notes.push(describe_rule(&name, &rule_type, &description, &expression));
    }
    Some(notes)
}

/// `Rule: 'name' (Type: t), Desc: '...', Expr: '...'`, omitting empty segments
pub fn describe_rule(name: &str, rule_type: &str, description: &str, expression: &str) -> String {
    let mut note = format!("Rule: '{name}'");
    if !rule_type.trim().is_empty() {
        note.push_str(&format!(" (Type: {rule_type})"));
    }
    if !description.trim().is_empty() {
        note.push_str(&format!(", Desc: '{description}'"));
    }
    if !expression.trim().is_empty() {
        note.push_str(&format!(
            ", Expr: '{}'",
            truncate(expression, EXPRESSION_PREVIEW_CHARS)
        ));
    }
    note
}

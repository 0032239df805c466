//! Relationship class resolution
//!
//! Rows of `GDB_ItemRelationships` link a relationship class item to its
//! origin and destination items. All three must be present in the item map;
//! the descriptor itself is read from the relationship class item's definition.

use crate::catalog::RelationshipRow;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::models::{Item, RelationshipClass, RelationshipRule};
use crate::xml::{self, XmlElement, XmlError};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Relationship kind tags on the descriptor root, `Type` first
const RELATIONSHIP_TYPE_TAGS: &[&str] = &["Type", "RelationshipType"];
const UNKNOWN: &str = "Unknown";

/// Build relationship classes from relationship rows
///
/// Rows whose items cannot all be found, or whose relationship class
/// definition cannot be parsed, are skipped with a warning.
pub fn resolve_relationships(
    rows: Vec<RelationshipRow>,
    items: &IndexMap<String, Item>,
    diagnostics: &mut Diagnostics,
) -> Vec<RelationshipClass> {
    let mut classes = Vec::with_capacity(rows.len());

    for row in rows {
        let relationship_item = items.get(&row.uuid);
        let origin = items.get(&row.origin_uuid);
        let destination = items.get(&row.destination_uuid);

        let (Some(relationship_item), Some(origin), Some(destination)) =
            (relationship_item, origin, destination)
        else {
            let missing: Vec<String> = [
                (relationship_item.is_none(), "relationship item", &row.uuid),
                (origin.is_none(), "origin item", &row.origin_uuid),
                (destination.is_none(), "destination item", &row.destination_uuid),
            ]
            .into_iter()
            .filter(|(is_missing, _, _)| *is_missing)
            .map(|(_, role, uuid)| format!("{role} {uuid}"))
            .collect();
            diagnostics.record(
                WarningKind::RelationshipUnresolved,
                row.name.clone(),
                format!(
                    "Could not resolve relationship '{}' (UUID: {}): missing {}",
                    row.name,
                    row.uuid,
                    missing.join(", ")
                ),
            );
            continue;
        };

        match build_relationship(&row, relationship_item, origin, destination) {
            Ok(class) => {
                debug!(
                    "Relationship '{}': {} -> {}",
                    class.name, class.origin_table_name, class.destination_table_name
                );
                classes.push(class);
            }
            Err(e) => diagnostics.record(
                WarningKind::RelationshipParse,
                row.name.clone(),
                format!(
                    "Error parsing relationship class definition for '{}' (UUID: {}): {}",
                    relationship_item.name, row.uuid, e
                ),
            ),
        }
    }

    info!("Resolved {} relationship class(es)", classes.len());
    classes
}

fn build_relationship(
    row: &RelationshipRow,
    relationship_item: &Item,
    origin: &Item,
    destination: &Item,
) -> Result<RelationshipClass, XmlError> {
    let root = xml::parse(&relationship_item.definition)?;
    let text_or_unknown = |names: &[&str]| {
        root.find_text_of(names)
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    Ok(RelationshipClass {
        item_uuid: row.uuid.clone(),
        name: relationship_item.name.clone(),
        origin_item_uuid: row.origin_uuid.clone(),
        destination_item_uuid: row.destination_uuid.clone(),
        origin_table_name: origin.name.clone(),
        destination_table_name: destination.name.clone(),
        cardinality: text_or_unknown(&["Cardinality"]),
        relationship_type: relationship_type(&root),
        forward_path_label: root.find_text_of(&["ForwardPathLabel"]).unwrap_or_default(),
        backward_path_label: root.find_text_of(&["BackwardPathLabel"]).unwrap_or_default(),
        rules: key_rules(&root),
        definition: relationship_item.definition.clone(),
        item_relationship_definition: row.definition.clone(),
    })
}

/// Kind of the relationship class
///
/// `Type` is only read as a direct child of the descriptor so that a field's
/// `<Type>` in an attributed relationship is never taken for it. A nested
/// `RelationshipType` is accepted.
fn relationship_type(root: &XmlElement) -> String {
    root.child_text_of(RELATIONSHIP_TYPE_TAGS)
        .or_else(|| root.find_text_of(&["RelationshipType"]))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Key pairs of a relationship class
///
/// One-to-many descriptors name the origin primary key and origin foreign key,
/// either directly or as `Key` elements tagged with a `KeyRole` sibling.
/// Attributed (many-to-many) descriptors list class keys instead.
fn key_rules(root: &XmlElement) -> Vec<RelationshipRule> {
    if let Some(rule) = direct_key_rule(root).or_else(|| class_key_rule(root)) {
        return vec![rule];
    }
    debug!("No key rules found in relationship class definition");
    Vec::new()
}

fn direct_key_rule(root: &XmlElement) -> Option<RelationshipRule> {
    let origin_key = root
        .find("OriginPrimaryKey")
        .or_else(|| role_tagged_key(root, "Origin"))?;
    let destination_key = root
        .find("OriginForeignKey")
        .or_else(|| role_tagged_key(root, "Destination"))?;
    Some(RelationshipRule {
        origin_key: origin_key.value(),
        destination_key: destination_key.value(),
    })
}

/// First `Key` whose parent has a `KeyRole` child equal to `role`
fn role_tagged_key<'a>(root: &'a XmlElement, role: &str) -> Option<&'a XmlElement> {
    root.find_with_parent(|parent, element| {
        element.name() == "Key"
            && parent
                .child("KeyRole")
                .is_some_and(|key_role| key_role.value() == role)
    })
}

fn class_key_rule(root: &XmlElement) -> Option<RelationshipRule> {
    let origin_key = root
        .find("OriginClassKeys")
        .and_then(|keys| keys.find("ClassKeyName"))
        .map(XmlElement::value)
        .filter(|key| !key.is_empty())?;
    let destination_key = root
        .find_all("RelationshipClassKeys")
        .find(|keys| {
            keys.child("KeyRole")
                .is_some_and(|key_role| key_role.value() == "DestinationForeignKey")
        })
        .and_then(|keys| keys.child("ClassKeyName"))
        .map(XmlElement::value)
        .filter(|key| !key.is_empty())?;
    Some(RelationshipRule {
        origin_key,
        destination_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;

    fn table(uuid: &str, name: &str, definition: &str) -> Item {
        let mut item = Item::new(
            uuid.to_string(),
            name.to_string(),
            ItemKind::Table {
                is_relationship_class: false,
            },
        );
        item.definition = definition.to_string();
        item
    }

    fn items(entries: Vec<Item>) -> IndexMap<String, Item> {
        entries
            .into_iter()
            .map(|item| (item.item_uuid.clone(), item))
            .collect()
    }

    fn rel_row(uuid: &str, origin: &str, destination: &str) -> RelationshipRow {
        RelationshipRow {
            uuid: uuid.to_string(),
            origin_uuid: origin.to_string(),
            destination_uuid: destination.to_string(),
            name: "ParcelOwners".to_string(),
            definition: "<GPRelationship/>".to_string(),
        }
    }

    const ONE_TO_MANY: &str = "<DERelationshipClassInfo>\
        <Cardinality>esriRelCardinalityOneToMany</Cardinality>\
        <ForwardPathLabel>Owners</ForwardPathLabel><BackwardPathLabel>Parcel</BackwardPathLabel>\
        <OriginPrimaryKey>GlobalID</OriginPrimaryKey><OriginForeignKey>ParcelGUID</OriginForeignKey>\
        </DERelationshipClassInfo>";

    #[test]
    fn test_one_to_many_relationship() {
        let items = items(vec![
            table("{R}", "Parcel_Owner", ONE_TO_MANY),
            table("{O}", "Parcels", "<DETableInfo/>"),
            table("{D}", "Owners", "<DETableInfo/>"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let classes = resolve_relationships(vec![rel_row("{R}", "{O}", "{D}")], &items, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(classes.len(), 1);
        let class = &classes[0];
        assert_eq!(class.name, "Parcel_Owner");
        assert_eq!(class.origin_table_name, "Parcels");
        assert_eq!(class.destination_table_name, "Owners");
        assert_eq!(class.cardinality, "esriRelCardinalityOneToMany");
        assert_eq!(class.relationship_type, "Unknown");
        assert_eq!(class.forward_path_label, "Owners");
        assert_eq!(
            class.rules,
            vec![RelationshipRule {
                origin_key: "GlobalID".to_string(),
                destination_key: "ParcelGUID".to_string(),
            }]
        );
        assert_eq!(class.item_relationship_definition, "<GPRelationship/>");
    }

    #[test]
    fn test_role_tagged_keys() {
        let def = "<R><RelationshipType>esriRelTypeComposite</RelationshipType><Keys>\
            <RelationshipClassKey><KeyRole>Destination</KeyRole><Key>FK_ID</Key></RelationshipClassKey>\
            <RelationshipClassKey><KeyRole>Origin</KeyRole><Key>PK_ID</Key></RelationshipClassKey>\
            </Keys></R>";
        let root = xml::parse(def).unwrap();
        assert_eq!(
            key_rules(&root),
            vec![RelationshipRule {
                origin_key: "PK_ID".to_string(),
                destination_key: "FK_ID".to_string(),
            }]
        );
        assert_eq!(relationship_type(&root), "esriRelTypeComposite");
    }

    #[test]
    fn test_type_tag_wins_over_relationship_type() {
        let root = xml::parse(
            "<R><Type>esriRelTypeSimple</Type><RelationshipType>esriRelTypeComposite</RelationshipType></R>",
        )
        .unwrap();
        assert_eq!(relationship_type(&root), "esriRelTypeSimple");
    }

    #[test]
    fn test_field_type_is_not_relationship_type() {
        let root = xml::parse(
            "<R><Fields><FieldArray><Field><Name>Share</Name><Type>esriFieldTypeDouble</Type></Field>\
             </FieldArray></Fields></R>",
        )
        .unwrap();
        assert_eq!(relationship_type(&root), "Unknown");

        let nested = xml::parse("<R><Info><RelationshipType>esriRelTypeComposite</RelationshipType></Info></R>")
            .unwrap();
        assert_eq!(relationship_type(&nested), "esriRelTypeComposite");
    }

    #[test]
    fn test_attributed_relationship_keys() {
        let def = "<R><OriginClassKeys><RelationshipClassKey><ClassKeyName>ParcelID</ClassKeyName>\
            </RelationshipClassKey></OriginClassKeys>\
            <DestinationClassKeys>\
            <RelationshipClassKeys><KeyRole>DestinationPrimaryKey</KeyRole><ClassKeyName>OwnerID</ClassKeyName></RelationshipClassKeys>\
            <RelationshipClassKeys><KeyRole>DestinationForeignKey</KeyRole><ClassKeyName>OwnerRef</ClassKeyName></RelationshipClassKeys>\
            </DestinationClassKeys></R>";
        let root = xml::parse(def).unwrap();
        assert_eq!(
            key_rules(&root),
            vec![RelationshipRule {
                origin_key: "ParcelID".to_string(),
                destination_key: "OwnerRef".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_keys() {
        let root = xml::parse("<R><Cardinality>x</Cardinality></R>").unwrap();
        assert!(key_rules(&root).is_empty());
    }

    #[test]
    fn test_missing_destination_is_reported() {
        let items = items(vec![
            table("{R}", "Parcel_Owner", ONE_TO_MANY),
            table("{O}", "Parcels", "<DETableInfo/>"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let classes = resolve_relationships(vec![rel_row("{R}", "{O}", "{GONE}")], &items, &mut diagnostics);

        assert!(classes.is_empty());
        assert_eq!(diagnostics.count(WarningKind::RelationshipUnresolved), 1);
        let message = &diagnostics.warnings()[0].message;
        assert!(message.contains("destination item {GONE}"));
        assert!(!message.contains("origin item"));
    }

    #[test]
    fn test_unparsable_definition_is_reported() {
        let items = items(vec![
            table("{R}", "Broken", "<R><Cardinality>"),
            table("{O}", "Parcels", "<DETableInfo/>"),
            table("{D}", "Owners", "<DETableInfo/>"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let classes = resolve_relationships(vec![rel_row("{R}", "{O}", "{D}")], &items, &mut diagnostics);
        assert!(classes.is_empty());
        assert_eq!(diagnostics.count(WarningKind::RelationshipParse), 1);
    }
}

//! Text report over a finished extraction
//!
//! Produces the human-readable metadata log returned by the HTTP endpoint and
//! printed by `gdb-schema inspect`.

use crate::import::{ExtractionReport, RunStatus};
use crate::models::{Domain, DomainType, Item, ItemKind, RelationshipClass, SchemaModel};
use crate::text::truncate;

const ITEM_WKT_CHARS: usize = 60;
const SRS_WKT_CHARS: usize = 100;
const DOMAIN_XML_CHARS: usize = 60;

const CLOSING_NOTE: &str = "NOTE: Topology and Attribute Rules are ESRI-specific and generally not \
directly translatable to GeoPackage. This information is for awareness.";

/// Render a report as text
pub fn render_text(report: &ExtractionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Input GDB: {}\n", report.source));
    out.push_str(&format!("Target SRS: {}\n", report.options.target_srs));
    if let Some(bbox) = &report.options.bbox {
        out.push_str(&format!("Bounding Box (bbox): [{bbox}]\n"));
    }

    if let RunStatus::Failed { message } = &report.status {
        out.push_str(&format!("\nError: {message}\n"));
    }

    render_items(&mut out, &report.model);
    render_spatial_references(&mut out, &report.model);
    render_domains(&mut out, &report.model);
    render_relationships(&mut out, &report.model.relationship_classes);

    out.push_str("\n--- Warnings ---\n");
    if report.warnings.is_empty() {
        out.push_str("  None.\n");
    }
    for warning in &report.warnings {
        out.push_str(&format!("  - {}\n", warning.message));
    }

    out.push_str("\nFinished GDB metadata extraction attempt.\n");
    out.push_str(CLOSING_NOTE);
    out.push('\n');
    out
}

fn render_items(out: &mut String, model: &SchemaModel) {
    out.push_str("\n--- Extracted Item Information (Feature Classes & Tables) ---\n");
    if model.items.is_empty() {
        out.push_str("No feature classes or tables found/extracted.\n");
    }
    for item in model.items.values() {
        out.push_str(&format!(
            "  Name: {} (UUID: {}, Physical Table: {}, TypeGUID: {})\n",
            item.name, item.item_uuid, item.physical_name, item.item_type_guid
        ));
        let dataset = if item.dataset_name.is_empty() {
            "N/A"
        } else {
            item.dataset_name.as_str()
        };
        out.push_str(&format!("    Path: {}, Dataset: {}\n", item.path, dataset));

        if let ItemKind::FeatureClass {
            geometry_column_name,
            geometry_type,
            srid,
        } = &item.kind
        {
            out.push_str(&format!(
                "    Geometry Column: {geometry_column_name}, Type: {geometry_type}, SRID: {srid}\n"
            ));
            match model.spatial_references.get(srid) {
                Some(srs) => {
                    out.push_str(&format!("      SRS Name: {}\n", srs.srs_name));
                    out.push_str(&format!(
                        "      SRS Definition (WKT): {}\n",
                        truncate(&srs.srs_definition, ITEM_WKT_CHARS)
                    ));
                }
                None if *srid > 0 => out.push_str(&format!(
                    "      SRS Definition: SRID {srid} - Definition not found or GDB_SpatialRefs missing.\n"
                )),
                None => out.push_str("      SRS Definition: Not defined or SRID is 0.\n"),
            }
        }

        render_fields(out, item);
        render_subtypes(out, item);

        if let Some(notes) = item.topology_participation.as_ref().filter(|n| !n.is_empty()) {
            out.push_str("    Topology Participation:\n");
            for note in notes {
                out.push_str(&format!("      - {note}\n"));
            }
        }
        if let Some(rules) = item.attribute_rules.as_ref().filter(|r| !r.is_empty()) {
            out.push_str("    Attribute Rules (ESRI Specific - Informational Only):\n");
            for rule in rules {
                out.push_str(&format!("      - {rule}\n"));
            }
        }
    }
}

fn render_fields(out: &mut String, item: &Item) {
    out.push_str("    Fields:\n");
    if item.fields.is_empty() {
        out.push_str("      No fields extracted.\n");
    }
    for field in &item.fields {
        out.push_str(&format!(
            "      - {} (Type: {}, Nullable: {}, Length: {}, Alias: {})",
            field.name, field.field_type, field.is_nullable, field.length, field.alias_name
        ));
        if field.has_domain() {
            out.push_str(&format!(" -> Domain: {} (default)", field.domain_name));
        }
        out.push('\n');
    }
}

fn render_subtypes(out: &mut String, item: &Item) {
    let (Some(subtype_field), Some(subtypes)) = (&item.subtype_field_name, &item.subtypes) else {
        return;
    };
    if subtypes.is_empty() {
        return;
    }
    out.push_str(&format!("    Subtype Field: {subtype_field}\n"));
    out.push_str("    Subtypes:\n");
    for subtype in subtypes {
        out.push_str(&format!(
            "      - Code: {}, Name: '{}', Description: '{}'\n",
            subtype.code, subtype.name, subtype.description
        ));
        if subtype.field_defaults.is_empty() {
            continue;
        }
        out.push_str("        Field-specific Defaults/Domains for this Subtype:\n");
        for (field, default) in &subtype.field_defaults {
            let mut parts = Vec::new();
            if !default.default_value.is_empty() {
                parts.push(format!("Default: '{}'", default.default_value));
            }
            if !default.domain_name.is_empty() {
                parts.push(format!("Domain: '{}'", default.domain_name));
            }
            out.push_str(&format!("          - Field: {field} -> {}\n", parts.join(", ")));
        }
    }
}

fn render_spatial_references(out: &mut String, model: &SchemaModel) {
    out.push_str("\n--- Extracted Spatial Reference Information ---\n");
    if model.spatial_references.is_empty() {
        out.push_str("  No spatial reference systems found or extracted.\n");
    }
    for srs in model.spatial_references.values() {
        out.push_str(&format!("  SRID: {}, Name: {}\n", srs.srid, srs.srs_name));
        out.push_str(&format!(
            "    Definition (WKT): {}\n",
            truncate(&srs.srs_definition, SRS_WKT_CHARS)
        ));
    }
}

fn render_domains(out: &mut String, model: &SchemaModel) {
    out.push_str("\n--- Extracted Domain Information ---\n");
    if model.domains.is_empty() {
        out.push_str("  No domains found or extracted.\n");
    }
    for domain in model.domains.values() {
        render_domain(out, domain);
    }
}

fn render_domain(out: &mut String, domain: &Domain) {
    out.push_str(&format!(
        "  Domain Name: {} (Owner: {})\n",
        domain.name, domain.owner
    ));
    out.push_str(&format!("    Description: {}\n", domain.description));
    out.push_str(&format!(
        "    Applies to Field Type: {}, Domain Type: {}\n",
        domain.field_type, domain.domain_type
    ));
    match (domain.domain_type, &domain.coded_values, &domain.range_value) {
        (DomainType::CodedValue, Some(values), _) => {
            out.push_str("    Coded Values:\n");
            for value in values {
                out.push_str(&format!(
                    "      - Code: '{}', Name: '{}'\n",
                    value.code, value.name
                ));
            }
        }
        (DomainType::Range, _, Some(range)) => out.push_str(&format!(
            "    Range: Min = '{}', Max = '{}'\n",
            range.min_value, range.max_value
        )),
        _ if !domain.definition.is_empty() => out.push_str(&format!(
            "    Values: Could not parse values from Definition XML or type mismatch. XML: {}\n",
            truncate(&domain.definition, DOMAIN_XML_CHARS)
        )),
        _ => out.push_str(
            "    Values: No coded values or range found, or definition XML was empty/missing.\n",
        ),
    }
}

fn render_relationships(out: &mut String, classes: &[RelationshipClass]) {
    out.push_str("\n--- Extracted Relationship Class Information ---\n");
    if classes.is_empty() {
        out.push_str("  No relationship classes found or extracted.\n");
    }
    for rel in classes {
        out.push_str(&format!(
            "  Relationship Name: {} (UUID: {})\n",
            rel.name, rel.item_uuid
        ));
        out.push_str(&format!(
            "    Origin: {} (UUID: {})\n",
            rel.origin_table_name, rel.origin_item_uuid
        ));
        out.push_str(&format!(
            "    Destination: {} (UUID: {})\n",
            rel.destination_table_name, rel.destination_item_uuid
        ));
        out.push_str(&format!(
            "    Cardinality: {}, Type: {}\n",
            rel.cardinality, rel.relationship_type
        ));
        out.push_str(&format!(
            "    Labels: Forward='{}', Backward='{}'\n",
            rel.forward_path_label, rel.backward_path_label
        ));
        if rel.rules.is_empty() {
            out.push_str("    Rules (Keys): Not explicitly parsed or found in XML.\n");
            continue;
        }
        out.push_str("    Rules (Keys):\n");
        for rule in &rel.rules {
            out.push_str(&format!(
                "      - OriginKey: '{}', DestinationKey: '{}'\n",
                rule.origin_key, rule.destination_key
            ));
        }
    }
}

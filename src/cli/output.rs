//! Output formatting for CLI

use crate::cli::error::CliError;
use crate::import::{ExtractionReport, RunStatus};
use crate::report::render_text;

/// Output format of `inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full metadata log
    Text,
    /// Report as pretty-printed JSON
    Json,
    /// Counts and warnings only
    Summary,
}

/// Format a report in the requested format
pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Summary => format_summary(report),
    })
}

/// Format a report in compact mode
pub fn format_summary(report: &ExtractionReport) -> String {
    let mut output = String::new();
    let model = &report.model;

    if let RunStatus::Failed { message } = &report.status {
        output.push_str(&format!("\n❌ Extraction failed: {}\n", message));
    }

    if !report.warnings.is_empty() {
        output.push_str("\n⚠️  Warnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning.message));
        }
    }

    output.push_str(&format!(
        "\n✅ Extracted {} item(s) from {} ({} feature class(es), {} table(s)):\n",
        model.items.len(),
        report.source,
        model.feature_classes().count(),
        model.tables().count()
    ));
    for item in model.items.values() {
        let fields: Vec<String> = item
            .fields
            .iter()
            .map(|f| format!("{}:{}", f.name, f.field_type))
            .collect();
        let kind = if item.is_feature_class() {
            "feature class"
        } else if item.is_relationship_class() {
            "relationship class"
        } else {
            "table"
        };
        output.push_str(&format!("  {} ({})\n", item.name, kind));
        output.push_str(&format!("    Fields: {}\n", fields.join(", ")));
    }
    output.push_str(&format!(
        "  Domains: {}, Spatial references: {}, Relationship classes: {}\n",
        model.domains.len(),
        model.spatial_references.len(),
        model.relationship_classes.len()
    ));

    if report.warnings.is_empty() && report.is_completed() {
        output.push_str("\n✅ No warnings.\n");
    }

    output
}

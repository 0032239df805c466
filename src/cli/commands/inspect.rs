//! Inspect command implementation

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_report};
use crate::config::{BoundingBox, ExtractOptions};
use crate::import::{RunStatus, extract_schema};
use std::path::Path;

/// Parse the optional `--bbox` argument
fn parse_bbox(bbox: Option<&str>) -> Result<Option<BoundingBox>, CliError> {
    match bbox.map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(Some(raw.parse()?)),
        _ => Ok(None),
    }
}

/// Handle the inspect command
///
/// The report is printed even when the run failed; the failure is then
/// returned so the process exits non-zero.
pub fn handle_inspect(
    path: &Path,
    target_srs: &str,
    bbox: Option<&str>,
    format: OutputFormat,
) -> Result<(), CliError> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let options = ExtractOptions::new(target_srs, parse_bbox(bbox)?);

    let report = extract_schema(path, &options);
    println!("{}", format_report(&report, format)?);

    match report.status {
        RunStatus::Completed => Ok(()),
        RunStatus::Failed { message } => Err(CliError::ExtractionFailed(message)),
    }
}

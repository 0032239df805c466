//! Geodatabase upload endpoint

use crate::config::{BoundingBox, ExtractOptions};
use crate::diagnostics::Warning;
use crate::import::{RunStatus, extract_schema};
use crate::models::SchemaModel;
use crate::report::render_text;
use crate::server::{AppError, AppState};
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Response body of a processed upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Human-readable report
    pub metadata_log: String,
    pub status: RunStatus,
    pub schema: SchemaModel,
    pub warnings: Vec<Warning>,
}

/// Upload routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/convert/upload", post(upload_and_process))
        .route("/api/convert/UploadAndProcess", post(upload_and_process))
}

/// Form fields of an upload request
#[derive(Default)]
struct UploadForm {
    file_name: String,
    data: Option<Bytes>,
    target_srs: Option<String>,
    bbox: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().unwrap_or_default().to_string();
                    form.data = Some(field.bytes().await?);
                }
                "targetSrs" => form.target_srs = Some(field.text().await?),
                "bbox" => form.bbox = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Store the upload in a temp file, run an extraction over it and return the report
///
/// The temp file is removed on every path out of this handler.
async fn upload_and_process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConvertResponse>, AppError> {
    let form = UploadForm::read(multipart).await?;

    let data = form
        .data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file uploaded.".to_string()))?;

    if !state.config.is_allowed_file_name(&form.file_name) {
        warn!(
            "File with potentially unsupported extension uploaded: {}",
            form.file_name
        );
    }

    let bbox = match form.bbox.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<BoundingBox>().map_err(|e| {
            warn!("{}", e);
            AppError::BadRequest(
                "Invalid bounding box format. Expected 4 comma-separated numbers (minX,minY,maxX,maxY)."
                    .to_string(),
            )
        })?),
        _ => None,
    };
    let options = ExtractOptions::new(form.target_srs.as_deref().unwrap_or_default(), bbox);

    let prefix = format!("{}_", Uuid::new_v4());
    let suffix = Path::new(&form.file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let upload_dir = state.config.upload_dir.clone();
    let file_name = form.file_name;

    let mut report = tokio::task::spawn_blocking(move || -> std::io::Result<_> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);
        let mut temp = match &upload_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        temp.write_all(&data)?;
        temp.flush()?;
        info!(
            "Saved upload '{}' ({} bytes) to {}",
            file_name,
            data.len(),
            temp.path().display()
        );

        let mut report = extract_schema(temp.path(), &options);
        report.source = file_name;
        Ok(report)
    })
    .await
    .map_err(|e| AppError::Internal(format!("An error occurred: {}", e)))??;

    if report.source.is_empty() {
        report.source = "(unnamed upload)".to_string();
    }
    let metadata_log = render_text(&report);
    info!("Processed upload; report length {}", metadata_log.len());

    Ok(Json(ConvertResponse {
        metadata_log,
        status: report.status,
        schema: report.model,
        warnings: report.warnings,
    }))
}

//! Axum route handler for resume parsing.

use anyhow::anyhow;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::parsing::models::ResumeRecord;
use crate::state::AppState;

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    content: Bytes,
}

/// POST /parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeRecord>, AppError> {
    let request_id = Uuid::new_v4();
    parse_upload(&state, multipart)
        .instrument(info_span!("parse_resume", %request_id))
        .await
        .map(Json)
}

async fn parse_upload(state: &AppState, multipart: Multipart) -> Result<ResumeRecord, AppError> {
    let upload = read_upload(multipart).await?;
    if !is_pdf_filename(&upload.filename) {
        return Err(AppError::InvalidInput("File must be a PDF".to_string()));
    }
    info!(
        "Received {} ({} bytes)",
        upload.filename,
        upload.content.len()
    );

    let content = upload.content;
    let text = tokio::task::spawn_blocking(move || extract_text(&content))
        .await
        .map_err(|e| AppError::Internal(anyhow!("PDF extraction task failed: {e}")))??;

    let generated = state.generator.generate(&text).await;
    info!("Responding with {:?}-derived record", generated.source);
    Ok(generated.record)
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Could not read uploaded file", e))?;
        return Ok(Upload { filename, content });
    }
    Err(AppError::InvalidInput(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// Body-limit rejections surface as multipart errors; keep their 413.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Uploaded file is too large: {e}"))
    } else {
        AppError::InvalidInput(format!("{context}: {e}"))
    }
}

fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

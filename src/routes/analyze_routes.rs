use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::core::analyzer::analyze_file;
use crate::core::constants::{CSV_CONTENT_TYPE, UPLOAD_FIELD};
use crate::core::error::{AnalyzerError, Result};
use crate::core::record::FileMetadata;
use crate::core::retain::{discard, new_retained_path};
use crate::models::dto::AnalyzeResponse;
use crate::state::app_state::AppState;

/// =======================
/// ROUTER
/// =======================

pub fn analyze_routes(state: AppState) -> Router {
    let limit = state.max_upload_bytes;

    Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>> {
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let id = process_upload(&state, field).await?;
            return Ok(Json(AnalyzeResponse { id }));
        }
    }

    Err(AnalyzerError::InvalidInput(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

async fn process_upload(state: &AppState, field: Field<'_>) -> Result<i64> {
    let is_csv = field
        .content_type()
        .is_some_and(|ct| ct.eq_ignore_ascii_case(CSV_CONTENT_TYPE));
    let file_name = field.file_name().unwrap_or("unknown").to_string();
    let retained = new_retained_path(&state.retain_dir);

    let size = match persist_field(field, &retained, state.max_upload_bytes).await {
        Ok(size) => size,
        Err(e) => {
            discard_quietly(&retained);
            return Err(e);
        }
    };

    // emptiness is reported ahead of the content type
    if size == 0 {
        discard_quietly(&retained);
        return Err(AnalyzerError::InvalidInput(
            "Uploaded file is empty".to_string(),
        ));
    }

    if !is_csv {
        discard_quietly(&retained);
        return Err(AnalyzerError::InvalidInput(
            "Only CSV files are allowed".to_string(),
        ));
    }

    debug!("Retained {} ({} bytes) at {}", file_name, size, retained.display());

    let path = retained.clone();
    let result = tokio::task::spawn_blocking(move || analyze_file(path))
        .await
        .map_err(|e| AnalyzerError::Processing(format!("Analysis task failed: {e}")))
        .and_then(|r| r);

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            discard_quietly(&retained);
            return Err(e);
        }
    };

    let meta = FileMetadata {
        file_name,
        file_size_bytes: size,
        retained_file_path: retained.clone(),
    };

    let appended = state.store.lock().await.append(&result, &meta);
    let id = match appended {
        Ok(id) => id,
        Err(e) => {
            discard_quietly(&retained);
            return Err(e);
        }
    };

    info!(
        "Analysis {} for {}: {} records, {} missing, mean {}",
        id, meta.file_name, result.records_count, result.missing_count, result.mean
    );

    Ok(id)
}

/// Stream the upload to disk chunk by chunk; returns the byte count.
async fn persist_field(mut field: Field<'_>, path: &Path, limit: usize) -> Result<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| AnalyzerError::Processing(format!("Failed to save temp file: {e}")))?;

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(|e| upload_error(e, limit))? {
        file.write_all(&chunk)
            .await
            .map_err(|e| AnalyzerError::Processing(format!("Failed to save temp file: {e}")))?;
        size += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AnalyzerError::Processing(format!("Failed to save temp file: {e}")))?;

    Ok(size)
}

fn upload_error(err: axum::extract::multipart::MultipartError, limit: usize) -> AnalyzerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalyzerError::PayloadTooLarge { limit }
    } else {
        AnalyzerError::InvalidInput(format!("Malformed multipart body: {}", err.body_text()))
    }
}

fn discard_quietly(path: &Path) {
    if path.exists() {
        discard(path);
    }
}

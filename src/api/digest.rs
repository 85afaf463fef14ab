//! Digest, export and import endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::{success, ApiResult};
use crate::codec::{apply_import, parse_import, ExportFormat, ImportSummary};
use crate::errors::AppError;
use crate::models::Digest;
use crate::AppState;

/// GET /api/digest - The last seven days, as of now.
pub async fn get_digest(State(state): State<AppState>) -> ApiResult<Digest> {
    success(state.digest.snapshot(Utc::now()).await?)
}

/// GET /api/digest/export/:format - Download the digest as json, csv or html.
pub async fn export_digest(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, AppError> {
    let format = ExportFormat::from_str(&format).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown export format {:?}, expected json, csv or html",
            format
        ))
    })?;

    let digest = state.digest.snapshot(Utc::now()).await?;
    let body = format.render(&digest)?;
    tracing::info!(
        format = format.extension(),
        bytes = body.len(),
        "Digest exported"
    );

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/digest/import - Merge an exported JSON digest back in.
pub async fn import_digest(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ImportSummary> {
    let payload = parse_import(&body).map_err(|e| {
        tracing::warn!("Rejected import: {}", e);
        AppError::from(e)
    })?;

    success(apply_import(&state.store, payload).await?)
}

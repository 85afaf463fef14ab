//! Clip API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{success, ApiResult, ConfirmParams};
use crate::errors::AppError;
use crate::ledger::NewClip;
use crate::models::{ClipRecord, CreateClipParams};
use crate::AppState;

/// Content type served for session audio.
const AUDIO_CONTENT_TYPE: &str = "audio/webm";

#[derive(Debug, Serialize)]
pub struct RemoveClipResult {
    pub removed: bool,
}

/// GET /api/clips - List all clips, most recent first.
pub async fn list_clips(State(state): State<AppState>) -> ApiResult<Vec<ClipRecord>> {
    success(state.ledger.list_all().await?)
}

/// POST /api/clips - Save a finished capture. The body is the raw audio.
pub async fn create_clip(
    State(state): State<AppState>,
    Query(params): Query<CreateClipParams>,
    body: Bytes,
) -> ApiResult<ClipRecord> {
    let record = state
        .ledger
        .append(NewClip {
            tag: params.tag,
            note: params.note,
            duration_label: params.duration,
            audio: body,
        })
        .await?;

    success(record)
}

/// GET /api/clips/:id - Get a single clip.
pub async fn get_clip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ClipRecord> {
    match state.ledger.get(&id).await? {
        Some(clip) => success(clip),
        None => Err(AppError::NotFound(format!("Clip {} not found", id))),
    }
}

/// GET /api/clips/:id/audio - Stream the session audio for a clip.
pub async fn get_clip_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let audio = state.ledger.audio(&id).await.ok_or_else(|| {
        AppError::NotFound(format!("Audio for clip {} is not available in this session", id))
    })?;

    Ok(([(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)], audio).into_response())
}

/// DELETE /api/clips/:id?confirm=true - Remove a clip.
pub async fn delete_clip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(confirm): Query<ConfirmParams>,
) -> ApiResult<RemoveClipResult> {
    confirm.require("Deleting a clip")?;

    let removed = state.ledger.remove(&id).await?;
    success(RemoveClipResult { removed })
}

//! Settings API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{SaveSettingsRequest, SettingsRecord};
use crate::AppState;

/// GET /api/settings - Load class settings.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SettingsRecord> {
    success(state.settings.load().await?)
}

/// PUT /api/settings - Replace class settings.
pub async fn save_settings(
    State(state): State<AppState>,
    Json(request): Json<SaveSettingsRequest>,
) -> ApiResult<SettingsRecord> {
    let record = request.into_record();
    state.settings.save(&record).await?;
    success(record)
}

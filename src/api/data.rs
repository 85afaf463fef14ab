//! Whole-store maintenance endpoints.

use axum::extract::{Query, State};

use super::{success, ApiResult, ConfirmParams};
use crate::AppState;

/// DELETE /api/data?confirm=true - Clear all Carrot Console data.
pub async fn wipe_data(
    State(state): State<AppState>,
    Query(confirm): Query<ConfirmParams>,
) -> ApiResult<()> {
    confirm.require("Clearing all data")?;

    state.ledger.wipe().await?;
    success(())
}

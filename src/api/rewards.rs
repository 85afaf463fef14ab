//! Reward meter API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{AddCarrotsRequest, CarrotDelta, RewardView};
use crate::AppState;

/// GET /api/rewards - Current counters and meter fill.
pub async fn get_rewards(State(state): State<AppState>) -> ApiResult<RewardView> {
    success(state.rewards.state().await?.into())
}

/// POST /api/rewards/carrots - Award 1 or 5 carrots.
pub async fn add_carrots(
    State(state): State<AppState>,
    Json(request): Json<AddCarrotsRequest>,
) -> ApiResult<RewardView> {
    let delta = CarrotDelta::from_amount(request.amount).ok_or_else(|| {
        AppError::Validation(format!(
            "Carrot amount must be 1 or 5, got {}",
            request.amount
        ))
    })?;

    success(state.rewards.add_carrots(delta).await?.into())
}

/// POST /api/rewards/resets - Use a reset token.
pub async fn add_reset(State(state): State<AppState>) -> ApiResult<RewardView> {
    success(state.rewards.add_reset().await?.into())
}

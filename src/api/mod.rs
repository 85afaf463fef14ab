//! REST API module.
//!
//! The browser console and the recorder talk to the core through these routes.

mod clips;
mod data;
mod digest;
mod rewards;
mod settings;

pub use clips::*;
pub use data::*;
pub use digest::*;
pub use rewards::*;
pub use settings::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Query flag carried by destructive requests.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmParams {
    /// Refuse to go on unless the caller confirmed `action`.
    pub fn require(&self, action: &str) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::ConfirmationRequired(format!(
                "{} requires confirm=true",
                action
            )))
        }
    }
}

pub mod admin;
pub mod analytics;
pub mod health;
pub mod loans;
pub mod users;

use axum::Json;
use serde::Serialize;

/// Success envelope shared by the JSON handlers. Failures go through
/// `AppError`, which renders `{ "success": false, "error": ... }`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        })
    }
}

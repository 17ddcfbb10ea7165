use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Unauthorized(msg) => msg,
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error");
                "Internal server error".into()
            }
        };

        (status, Json(ErrorBody { success: false, error })).into_response()
    }
}

/// Message for a unique-constraint violation on an account identifier.
/// The handlers check for duplicates first; this covers concurrent signups.
fn duplicate_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_email_key" | "admins_email_key" => Some("Email already registered"),
        "users_mobile_number_key" | "admins_mobile_number_key" => {
            Some("Mobile number already registered")
        }
        "users_aadhar_key" => Some("Aadhar already registered"),
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                if let Some(msg) = db.constraint().and_then(duplicate_message) {
                    return AppError::BadRequest(msg.into());
                }
            }
        }
        AppError::Internal(e.into())
    }
}

// Repository functions return anyhow; recover the sqlx error underneath.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => sqlx_err.into(),
            Err(other) => AppError::Internal(other),
        }
    }
}

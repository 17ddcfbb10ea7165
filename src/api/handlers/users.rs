use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::credentials::{hash_password, is_aadhar, is_email, is_mobile, verify_password};
use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub aadhar: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Email, mobile number or Aadhaar number.
    pub identifier: String,
    pub password: String,
}

/// Shared format checks for user profile fields.
pub(crate) fn validate_profile(
    full_name: &str,
    email: &str,
    mobile_number: &str,
    aadhar: &str,
) -> Result<(), AppError> {
    if full_name.trim().is_empty() {
        return Err(AppError::BadRequest("Full name is required".into()));
    }
    if !is_email(email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    if !is_mobile(mobile_number) {
        return Err(AppError::BadRequest("Mobile number must be 10 digits".into()));
    }
    if !is_aadhar(aadhar) {
        return Err(AppError::BadRequest("Aadhar must be 12 digits".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup: register a new user
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    validate_profile(&body.full_name, &body.email, &body.mobile_number, &body.aadhar)?;
    if body.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    if user_repo::find_by_email(&state.db, &body.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    if user_repo::find_by_mobile(&state.db, &body.mobile_number).await?.is_some() {
        return Err(AppError::BadRequest("Mobile number already registered".into()));
    }
    if user_repo::find_by_aadhar(&state.db, &body.aadhar).await?.is_some() {
        return Err(AppError::BadRequest("Aadhar already registered".into()));
    }

    let user = user_repo::create_user(
        &state.db,
        body.full_name.trim(),
        &body.email,
        &body.mobile_number,
        &body.aadhar,
        &hash_password(&body.password),
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("User registered successfully", user),
    ))
}

/// POST /api/auth/login: login with email, mobile number or Aadhaar
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = user_repo::find_by_identifier(&state.db, body.identifier.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    if !verify_password(&body.password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "Login rejected: bad password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    Ok(ApiResponse::with_message("Login successful", user))
}

/// GET /api/users/{user_id}: user detail
pub async fn detail(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = user_repo::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::ok(user))
}

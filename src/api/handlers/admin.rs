use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use metrics::counter;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credentials::{hash_password, is_email, is_mobile, verify_password};
use crate::db::analytics_repo::{self, DisbursedVsRepaid, StatusCounts};
use crate::db::application_repo::{self, HistoryFilter};
use crate::db::{admin_repo, user_repo};
use crate::errors::AppError;
use crate::models::{Admin, ApplicationStatus, ApplicationWithApplicant, LoanApplication, User};
use crate::scoring::ApplicantAttributes;
use crate::AppState;

use super::users::validate_profile;
use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct AdminSignupRequest {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AdminQuery {
    pub admin_id: Uuid,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    /// Defaults to the requested loan amount.
    pub disbursed_amount: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub rejection_reason: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub aadhar: String,
    /// Left unchanged when absent or empty.
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    #[serde(flatten)]
    pub applications: StatusCounts,
    #[serde(flatten)]
    pub totals: DisbursedVsRepaid,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// Inclusive lower bound.
    Start,
    /// Exclusive upper bound.
    EndBefore,
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare `YYYY-MM-DD`.
///
/// End bounds are exclusive: a bare end date becomes midnight of the next
/// day, and a timestamp moves forward by one microsecond (Postgres
/// `timestamptz` precision) so the timestamp itself stays included.
fn parse_date_bound(raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|ts| ts.and_utc()));

    match (timestamp, bound) {
        (Ok(ts), Bound::Start) => Some(ts),
        (Ok(ts), Bound::EndBefore) => ts.checked_add_signed(Duration::microseconds(1)),
        (Err(_), _) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
            let day = match bound {
                Bound::Start => date,
                Bound::EndBefore => date.succ_opt()?,
            };
            Some(day.and_hms_opt(0, 0, 0)?.and_utc())
        }
    }
}

fn date_bound(raw: Option<&str>, bound: Bound) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Ok(None),
        Some(s) => parse_date_bound(s, bound)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {s}"))),
    }
}

/// An empty body approves the requested amount; anything else must parse.
fn parse_approve_body(body: &[u8]) -> Result<ApproveRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApproveRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid approval body: {e}")))
}

async fn require_admin(state: &AppState, admin_id: Uuid) -> Result<Admin, AppError> {
    admin_repo::get_admin(&state.db, admin_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".into()))
}

async fn require_pending(state: &AppState, id: Uuid) -> Result<LoanApplication, AppError> {
    let application = application_repo::get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    if !application.is_pending() {
        return Err(AppError::BadRequest("Application already processed".into()));
    }
    Ok(application)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// POST /api/admin/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<AdminSignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Admin>>), AppError> {
    if body.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("Full name is required".into()));
    }
    if !is_email(&body.email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    if !is_mobile(&body.mobile_number) {
        return Err(AppError::BadRequest("Mobile number must be 10 digits".into()));
    }
    if body.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    if admin_repo::find_by_email(&state.db, &body.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    if admin_repo::find_by_mobile(&state.db, &body.mobile_number).await?.is_some() {
        return Err(AppError::BadRequest("Mobile number already registered".into()));
    }

    let admin = admin_repo::create_admin(
        &state.db,
        body.full_name.trim(),
        &body.email,
        &body.mobile_number,
        &hash_password(&body.password),
    )
    .await?;

    tracing::info!(admin_id = %admin.id, "Admin registered");

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Admin registered successfully", admin),
    ))
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<AdminLoginRequest>,
) -> Result<Json<ApiResponse<Admin>>, AppError> {
    let admin = admin_repo::find_by_email(&state.db, body.email.trim())
        .await?
        .filter(|a| verify_password(&body.password, &a.password_hash))
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    Ok(ApiResponse::with_message("Login successful", admin))
}

// ---------------------------------------------------------------------------
// Review workflow
// ---------------------------------------------------------------------------

/// GET /api/admin/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let total_users = user_repo::count_users(&state.db).await?;
    let applications = analytics_repo::status_counts(&state.db).await?;
    let totals = analytics_repo::disbursed_vs_repaid(&state.db).await?;

    Ok(ApiResponse::ok(DashboardStats {
        total_users,
        applications,
        totals,
    }))
}

/// GET /api/admin/applications/pending: newest first
pub async fn pending(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ApplicationWithApplicant>>>, AppError> {
    let applications = application_repo::list_pending(&state.db).await?;
    Ok(ApiResponse::ok(applications))
}

/// POST /api/admin/applications/{id}/approve?admin_id=
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AdminQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<LoanApplication>>, AppError> {
    let body = parse_approve_body(&body)?;
    let application = require_pending(&state, id).await?;
    require_admin(&state, query.admin_id).await?;

    let disbursed_amount = match body.disbursed_amount {
        Some(amount) => amount,
        None => Decimal::from_f64(application.loan_amount)
            .map(|d| d.round_dp(2))
            .ok_or_else(|| AppError::BadRequest("Loan amount is not representable".into()))?,
    };
    if disbursed_amount.is_sign_negative() {
        return Err(AppError::BadRequest("Disbursed amount must not be negative".into()));
    }

    // The status guard in the UPDATE loses a concurrent race cleanly.
    let approved = application_repo::approve(&state.db, id, query.admin_id, disbursed_amount)
        .await?
        .ok_or_else(|| AppError::BadRequest("Application already processed".into()))?;

    counter!("applications_decided_total", "decision" => "approved").increment(1);
    tracing::info!(
        application_id = %id,
        admin_id = %query.admin_id,
        %disbursed_amount,
        "Application approved"
    );

    Ok(ApiResponse::with_message("Application approved successfully", approved))
}

/// POST /api/admin/applications/{id}/reject?admin_id=
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AdminQuery>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<ApiResponse<LoanApplication>>, AppError> {
    if body.rejection_reason.trim().is_empty() {
        return Err(AppError::BadRequest("Rejection reason is required".into()));
    }
    require_pending(&state, id).await?;
    require_admin(&state, query.admin_id).await?;

    let rejected =
        application_repo::reject(&state.db, id, query.admin_id, body.rejection_reason.trim())
            .await?
            .ok_or_else(|| AppError::BadRequest("Application already processed".into()))?;

    counter!("applications_decided_total", "decision" => "rejected").increment(1);
    tracing::info!(application_id = %id, admin_id = %query.admin_id, "Application rejected");

    Ok(ApiResponse::with_message("Application rejected", rejected))
}

/// GET /api/admin/applications/history?status=&start_date=&end_date=&search=
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ApplicationWithApplicant>>>, AppError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(s) => match ApplicationStatus::from_str(s) {
            Some(ApplicationStatus::Pending) | None => {
                return Err(AppError::BadRequest(format!("Invalid status filter: {s}")));
            }
            Some(status) => Some(status.as_str().to_string()),
        },
    };

    let filter = HistoryFilter {
        status,
        start: date_bound(query.start_date.as_deref(), Bound::Start)?,
        end_before: date_bound(query.end_date.as_deref(), Bound::EndBefore)?,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let applications = application_repo::list_history(&state.db, &filter).await?;
    Ok(ApiResponse::ok(applications))
}

// ---------------------------------------------------------------------------
// Application management
// ---------------------------------------------------------------------------

/// GET /api/admin/applications
pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LoanApplication>>>, AppError> {
    let applications = application_repo::list_all(&state.db).await?;
    Ok(ApiResponse::ok(applications))
}

/// PUT /api/admin/applications/{id}: replace attributes and rescore
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(attrs): Json<ApplicantAttributes>,
) -> Result<Json<ApiResponse<LoanApplication>>, AppError> {
    let score = state.scoring.evaluate(&attrs);
    let application = application_repo::update_attributes(&state.db, id, &attrs, &score)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    tracing::info!(application_id = %id, credit_score = score.credit_score, "Application updated");

    Ok(ApiResponse::with_message("Application updated successfully", application))
}

/// DELETE /api/admin/applications/{id}
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !application_repo::delete_application(&state.db, id).await? {
        return Err(AppError::NotFound("Application not found".into()));
    }

    tracing::info!(application_id = %id, "Application deleted");
    Ok(ApiResponse::with_message("Application deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = user_repo::list_users(&state.db).await?;
    Ok(ApiResponse::ok(users))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    validate_profile(&body.full_name, &body.email, &body.mobile_number, &body.aadhar)?;

    let taken_by_other = |found: Option<User>| found.is_some_and(|u| u.id != id);
    if taken_by_other(user_repo::find_by_email(&state.db, &body.email).await?) {
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    if taken_by_other(user_repo::find_by_mobile(&state.db, &body.mobile_number).await?) {
        return Err(AppError::BadRequest("Mobile number already registered".into()));
    }
    if taken_by_other(user_repo::find_by_aadhar(&state.db, &body.aadhar).await?) {
        return Err(AppError::BadRequest("Aadhar already registered".into()));
    }

    let password_hash = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(hash_password);

    let user = user_repo::update_user(
        &state.db,
        id,
        body.full_name.trim(),
        &body.email,
        &body.mobile_number,
        &body.aadhar,
        password_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::with_message("User updated successfully", user))
}

/// DELETE /api/admin/users/{id}: also removes the user's applications
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !user_repo::delete_user(&state.db, id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(ApiResponse::with_message("User deleted successfully", ()))
}

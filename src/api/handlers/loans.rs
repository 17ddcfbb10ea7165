use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{application_repo, user_repo};
use crate::errors::AppError;
use crate::models::LoanApplication;
use crate::scoring::improvement::{score_trend, suggest, ScoreTrend, Suggestion};
use crate::scoring::{ApplicantAttributes, ScoreResult};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ApplicantQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct Prediction {
    #[serde(flatten)]
    pub score: ScoreResult,
    pub loan_to_income_ratio: f64,
}

#[derive(Serialize)]
pub struct SubmittedApplication {
    pub application: LoanApplication,
    pub loan_to_income_ratio: f64,
}

#[derive(Serialize)]
pub struct ImprovementReport {
    /// Score of the latest application.
    pub credit_score: Option<i32>,
    pub total_applications: usize,
    pub suggestions: Vec<Suggestion>,
    pub trend: Option<ScoreTrend>,
}

async fn require_user(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    user_repo::get_user(&state.db, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/predict: score attributes without submitting an application
pub async fn predict(
    State(state): State<AppState>,
    Json(attrs): Json<ApplicantAttributes>,
) -> Json<ApiResponse<Prediction>> {
    let score = state.scoring.evaluate(&attrs);

    ApiResponse::ok(Prediction {
        score,
        loan_to_income_ratio: attrs.loan_to_income(),
    })
}

/// POST /api/loan/apply?user_id=: score and submit an application for review
pub async fn apply(
    State(state): State<AppState>,
    Query(query): Query<ApplicantQuery>,
    Json(attrs): Json<ApplicantAttributes>,
) -> Result<(StatusCode, Json<ApiResponse<SubmittedApplication>>), AppError> {
    require_user(&state, query.user_id).await?;

    if application_repo::find_identical(&state.db, query.user_id, &attrs)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Identical application already exists".into()));
    }

    let score = state.scoring.evaluate(&attrs);
    let application =
        application_repo::insert_application(&state.db, query.user_id, &attrs, &score).await?;

    counter!("applications_submitted_total").increment(1);
    tracing::info!(
        application_id = %application.id,
        user_id = %query.user_id,
        credit_score = score.credit_score,
        rating = %score.rating,
        method = %score.method,
        "Loan application submitted"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            "Application submitted successfully. Awaiting admin review.",
            SubmittedApplication {
                application,
                loan_to_income_ratio: attrs.loan_to_income(),
            },
        ),
    ))
}

/// GET /api/loan/applications/{user_id}: a user's applications, newest first
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<LoanApplication>>>, AppError> {
    require_user(&state, user_id).await?;
    let applications = application_repo::list_for_user(&state.db, user_id).await?;

    Ok(ApiResponse::ok(applications))
}

/// GET /api/credit/improvement/{user_id}: suggestions from the latest application
pub async fn improvement(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ImprovementReport>>, AppError> {
    require_user(&state, user_id).await?;

    // Newest first
    let applications = application_repo::list_for_user(&state.db, user_id).await?;
    let Some(latest) = applications.first() else {
        return Ok(Json(ApiResponse {
            success: false,
            message: Some("No loan application found. Please apply for a loan first.".into()),
            data: Some(ImprovementReport {
                credit_score: None,
                total_applications: 0,
                suggestions: Vec::new(),
                trend: None,
            }),
        }));
    };

    let attrs = latest.attributes()?;
    let scores: Vec<i32> = applications.iter().rev().map(|a| a.credit_score).collect();

    Ok(ApiResponse::with_message(
        "Credit improvement suggestions generated successfully",
        ImprovementReport {
            credit_score: Some(latest.credit_score),
            total_applications: applications.len(),
            suggestions: suggest(&attrs),
            trend: score_trend(&scores),
        },
    ))
}

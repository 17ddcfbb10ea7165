use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ApplicationWithApplicant, LoanApplication};
use crate::scoring::{ApplicantAttributes, ScoreResult};

const WITH_APPLICANT: &str = r#"
    SELECT a.*,
           COALESCE(u.full_name, 'Unknown') AS user_name,
           COALESCE(u.email, 'Unknown') AS user_email
    FROM loan_applications a
    LEFT JOIN users u ON u.id = a.user_id
"#;

/// Insert a scored application. New applications always start Pending.
pub async fn insert_application(
    pool: &PgPool,
    user_id: Uuid,
    attrs: &ApplicantAttributes,
    score: &ScoreResult,
) -> anyhow::Result<LoanApplication> {
    let application = sqlx::query_as::<_, LoanApplication>(
        r#"
        INSERT INTO loan_applications (
            user_id, age, income, loan_amount, loan_tenure_months,
            avg_dpd_per_delinquency, delinquency_ratio, credit_utilization_ratio,
            num_open_accounts, residence_type, loan_purpose, loan_type,
            default_probability, credit_score, rating, scoring_method
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(attrs.age)
    .bind(attrs.income)
    .bind(attrs.loan_amount)
    .bind(attrs.loan_tenure_months)
    .bind(attrs.avg_dpd_per_delinquency)
    .bind(attrs.delinquency_ratio)
    .bind(attrs.credit_utilization_ratio)
    .bind(attrs.num_open_accounts)
    .bind(attrs.residence_type.as_str())
    .bind(attrs.loan_purpose.as_str())
    .bind(attrs.loan_type.as_str())
    .bind(score.default_probability)
    .bind(score.credit_score)
    .bind(score.rating.as_str())
    .bind(score.method.as_str())
    .fetch_one(pool)
    .await?;

    Ok(application)
}

/// Find an application from `user_id` with exactly these attributes.
pub async fn find_identical(
    pool: &PgPool,
    user_id: Uuid,
    attrs: &ApplicantAttributes,
) -> anyhow::Result<Option<LoanApplication>> {
    let application = sqlx::query_as::<_, LoanApplication>(
        r#"
        SELECT * FROM loan_applications
        WHERE user_id = $1
          AND age = $2
          AND income = $3
          AND loan_amount = $4
          AND loan_tenure_months = $5
          AND avg_dpd_per_delinquency = $6
          AND delinquency_ratio = $7
          AND credit_utilization_ratio = $8
          AND num_open_accounts = $9
          AND residence_type = $10
          AND loan_purpose = $11
          AND loan_type = $12
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(attrs.age)
    .bind(attrs.income)
    .bind(attrs.loan_amount)
    .bind(attrs.loan_tenure_months)
    .bind(attrs.avg_dpd_per_delinquency)
    .bind(attrs.delinquency_ratio)
    .bind(attrs.credit_utilization_ratio)
    .bind(attrs.num_open_accounts)
    .bind(attrs.residence_type.as_str())
    .bind(attrs.loan_purpose.as_str())
    .bind(attrs.loan_type.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(application)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<LoanApplication>> {
    let application =
        sqlx::query_as::<_, LoanApplication>("SELECT * FROM loan_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(application)
}

/// All applications for a user, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<LoanApplication>> {
    let applications = sqlx::query_as::<_, LoanApplication>(
        "SELECT * FROM loan_applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(applications)
}

pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<LoanApplication>> {
    let applications = sqlx::query_as::<_, LoanApplication>(
        "SELECT * FROM loan_applications ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(applications)
}

/// Pending applications with applicant details, newest first.
pub async fn list_pending(pool: &PgPool) -> anyhow::Result<Vec<ApplicationWithApplicant>> {
    let sql = format!("{WITH_APPLICANT} WHERE a.status = 'Pending' ORDER BY a.created_at DESC");
    let applications = sqlx::query_as::<_, ApplicationWithApplicant>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(applications)
}

/// Filters for the processed-application history.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub status: Option<String>,
    /// Inclusive.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive.
    pub end_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the applicant's name, matched literally.
    pub search: Option<String>,
}

/// Approved and rejected applications matching `filter`, newest first.
pub async fn list_history(
    pool: &PgPool,
    filter: &HistoryFilter,
) -> anyhow::Result<Vec<ApplicationWithApplicant>> {
    let sql = format!(
        r#"{WITH_APPLICANT}
        WHERE a.status IN ('Approved', 'Rejected')
          AND ($1::text IS NULL OR a.status = $1)
          AND ($2::timestamptz IS NULL OR a.created_at >= $2)
          AND ($3::timestamptz IS NULL OR a.created_at < $3)
          AND ($4::text IS NULL OR strpos(lower(u.full_name), lower($4)) > 0)
        ORDER BY a.created_at DESC
        "#
    );

    let applications = sqlx::query_as::<_, ApplicationWithApplicant>(&sql)
        .bind(filter.status.as_deref())
        .bind(filter.start)
        .bind(filter.end_before)
        .bind(filter.search.as_deref())
        .fetch_all(pool)
        .await?;

    Ok(applications)
}

/// Approve a Pending application. Returns `None` if it was no longer Pending.
pub async fn approve(
    pool: &PgPool,
    id: Uuid,
    admin_id: Uuid,
    disbursed_amount: Decimal,
) -> anyhow::Result<Option<LoanApplication>> {
    let application = sqlx::query_as::<_, LoanApplication>(
        r#"
        UPDATE loan_applications
        SET status = 'Approved',
            approved_by = $2,
            approved_at = NOW(),
            disbursed_amount = $3
        WHERE id = $1 AND status = 'Pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(admin_id)
    .bind(disbursed_amount)
    .fetch_optional(pool)
    .await?;

    Ok(application)
}

/// Reject a Pending application. Returns `None` if it was no longer Pending.
pub async fn reject(
    pool: &PgPool,
    id: Uuid,
    admin_id: Uuid,
    rejection_reason: &str,
) -> anyhow::Result<Option<LoanApplication>> {
    let application = sqlx::query_as::<_, LoanApplication>(
        r#"
        UPDATE loan_applications
        SET status = 'Rejected',
            approved_by = $2,
            approved_at = NOW(),
            rejection_reason = $3
        WHERE id = $1 AND status = 'Pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(admin_id)
    .bind(rejection_reason)
    .fetch_optional(pool)
    .await?;

    Ok(application)
}

/// Replace the applicant attributes and their score. Status is unchanged.
pub async fn update_attributes(
    pool: &PgPool,
    id: Uuid,
    attrs: &ApplicantAttributes,
    score: &ScoreResult,
) -> anyhow::Result<Option<LoanApplication>> {
    let application = sqlx::query_as::<_, LoanApplication>(
        r#"
        UPDATE loan_applications
        SET age = $2,
            income = $3,
            loan_amount = $4,
            loan_tenure_months = $5,
            avg_dpd_per_delinquency = $6,
            delinquency_ratio = $7,
            credit_utilization_ratio = $8,
            num_open_accounts = $9,
            residence_type = $10,
            loan_purpose = $11,
            loan_type = $12,
            default_probability = $13,
            credit_score = $14,
            rating = $15,
            scoring_method = $16
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(attrs.age)
    .bind(attrs.income)
    .bind(attrs.loan_amount)
    .bind(attrs.loan_tenure_months)
    .bind(attrs.avg_dpd_per_delinquency)
    .bind(attrs.delinquency_ratio)
    .bind(attrs.credit_utilization_ratio)
    .bind(attrs.num_open_accounts)
    .bind(attrs.residence_type.as_str())
    .bind(attrs.loan_purpose.as_str())
    .bind(attrs.loan_type.as_str())
    .bind(score.default_probability)
    .bind(score.credit_score)
    .bind(score.rating.as_str())
    .bind(score.method.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(application)
}

pub async fn delete_application(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM loan_applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

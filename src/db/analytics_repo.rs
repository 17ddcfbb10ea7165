use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCounts {
    pub total_applications: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub pending_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlyDisbursement {
    pub year: i32,
    pub month: i32,
    pub count: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DisbursedVsRepaid {
    pub total_disbursed: Decimal,
    pub total_repaid: Decimal,
}

/// Low: score >= 750, medium: 500..750, high: < 500.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RiskDistribution {
    pub low_risk: i64,
    pub medium_risk: i64,
    pub high_risk: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActiveVsClosed {
    pub active: i64,
    pub closed: i64,
}

pub async fn status_counts(pool: &PgPool) -> anyhow::Result<StatusCounts> {
    let counts = sqlx::query_as::<_, StatusCounts>(
        r#"
        SELECT COUNT(*) AS total_applications,
               COUNT(*) FILTER (WHERE status = 'Approved') AS approved_count,
               COUNT(*) FILTER (WHERE status = 'Rejected') AS rejected_count,
               COUNT(*) FILTER (WHERE status = 'Pending') AS pending_count
        FROM loan_applications
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

/// Disbursed and repaid totals over approved applications.
pub async fn disbursed_vs_repaid(pool: &PgPool) -> anyhow::Result<DisbursedVsRepaid> {
    let totals = sqlx::query_as::<_, DisbursedVsRepaid>(
        r#"
        SELECT COALESCE(SUM(disbursed_amount), 0) AS total_disbursed,
               COALESCE(SUM(repaid_amount), 0) AS total_repaid
        FROM loan_applications
        WHERE status = 'Approved'
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(totals)
}

pub async fn monthly_disbursed(pool: &PgPool) -> anyhow::Result<Vec<MonthlyDisbursement>> {
    let rows = sqlx::query_as::<_, MonthlyDisbursement>(
        r#"
        SELECT EXTRACT(YEAR FROM approved_at)::int AS year,
               EXTRACT(MONTH FROM approved_at)::int AS month,
               COUNT(*) AS count,
               COALESCE(SUM(disbursed_amount), 0) AS amount
        FROM loan_applications
        WHERE status = 'Approved' AND approved_at IS NOT NULL
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn risk_distribution(pool: &PgPool) -> anyhow::Result<RiskDistribution> {
    let dist = sqlx::query_as::<_, RiskDistribution>(
        r#"
        SELECT COUNT(*) FILTER (WHERE credit_score >= 750) AS low_risk,
               COUNT(*) FILTER (WHERE credit_score >= 500 AND credit_score < 750) AS medium_risk,
               COUNT(*) FILTER (WHERE credit_score < 500) AS high_risk
        FROM loan_applications
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(dist)
}

/// Application counts per 100-point score bucket, lowest bucket first.
/// The last bucket is closed at 900.
pub async fn score_histogram(pool: &PgPool) -> anyhow::Result<Vec<(String, i64)>> {
    let (a, b, c, d, e, f): (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FILTER (WHERE credit_score >= 300 AND credit_score < 400),
               COUNT(*) FILTER (WHERE credit_score >= 400 AND credit_score < 500),
               COUNT(*) FILTER (WHERE credit_score >= 500 AND credit_score < 600),
               COUNT(*) FILTER (WHERE credit_score >= 600 AND credit_score < 700),
               COUNT(*) FILTER (WHERE credit_score >= 700 AND credit_score < 800),
               COUNT(*) FILTER (WHERE credit_score >= 800 AND credit_score <= 900)
        FROM loan_applications
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(vec![
        ("300-400".into(), a),
        ("400-500".into(), b),
        ("500-600".into(), c),
        ("600-700".into(), d),
        ("700-800".into(), e),
        ("800-900".into(), f),
    ])
}

/// Approved loans still being repaid vs fully repaid.
pub async fn active_vs_closed(pool: &PgPool) -> anyhow::Result<ActiveVsClosed> {
    let split = sqlx::query_as::<_, ActiveVsClosed>(
        r#"
        SELECT COUNT(*) FILTER (WHERE repaid_amount < disbursed_amount) AS active,
               COUNT(*) FILTER (WHERE repaid_amount >= disbursed_amount) AS closed
        FROM loan_applications
        WHERE status = 'Approved'
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(split)
}

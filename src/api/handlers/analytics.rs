use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::analytics_repo::{
    self, ActiveVsClosed, DisbursedVsRepaid, MonthlyDisbursement, RiskDistribution,
};
use crate::errors::AppError;
use crate::AppState;

use super::ApiResponse;

#[derive(Serialize)]
pub struct RepaymentSummary {
    pub total_disbursed: Decimal,
    pub total_repaid: Decimal,
    pub outstanding: Decimal,
}

impl From<DisbursedVsRepaid> for RepaymentSummary {
    /// Outstanding goes negative when repayments exceed disbursements.
    fn from(totals: DisbursedVsRepaid) -> Self {
        Self {
            outstanding: totals.total_disbursed - totals.total_repaid,
            total_disbursed: totals.total_disbursed,
            total_repaid: totals.total_repaid,
        }
    }
}

#[derive(Serialize)]
pub struct ScoreBucket {
    pub range: String,
    pub count: i64,
}

#[derive(Serialize)]
pub struct Insights {
    pub monthly_disbursed: Vec<MonthlyDisbursement>,
    pub disbursed_vs_repaid: RepaymentSummary,
    pub risk_distribution: RiskDistribution,
    pub credit_score_distribution: Vec<ScoreBucket>,
    pub active_vs_closed: ActiveVsClosed,
}

/// GET /api/admin/analytics/insights: portfolio aggregates for the admin dashboard
pub async fn insights(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Insights>>, AppError> {
    let monthly_disbursed = analytics_repo::monthly_disbursed(&state.db).await?;
    let totals = analytics_repo::disbursed_vs_repaid(&state.db).await?;
    let risk_distribution = analytics_repo::risk_distribution(&state.db).await?;
    let histogram = analytics_repo::score_histogram(&state.db).await?;
    let active_vs_closed = analytics_repo::active_vs_closed(&state.db).await?;

    Ok(ApiResponse::ok(Insights {
        monthly_disbursed,
        disbursed_vs_repaid: totals.into(),
        risk_distribution,
        credit_score_distribution: histogram
            .into_iter()
            .map(|(range, count)| ScoreBucket { range, count })
            .collect(),
        active_vs_closed,
    }))
}

use std::fmt;

use serde::{Deserialize, Serialize};

use super::attributes::{ApplicantAttributes, LoanType, ResidenceType};
use super::evaluator::{ScoreResult, ScoringMethod};
use super::rating::{credit_score_from_probability, BandPolicy, Rating};

/// Upper clamp for the heuristic default probability.
pub const MAX_DEFAULT_PROBABILITY: f64 = 0.99;

/// One independent input to the heuristic risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Age,
    LoanToIncome,
    DelinquencyRatio,
    CreditUtilization,
    DaysPastDue,
    OpenAccounts,
    ResidenceType,
    LoanType,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Age => "age",
            RiskFactor::LoanToIncome => "loan_to_income",
            RiskFactor::DelinquencyRatio => "delinquency_ratio",
            RiskFactor::CreditUtilization => "credit_utilization",
            RiskFactor::DaysPastDue => "days_past_due",
            RiskFactor::OpenAccounts => "open_accounts",
            RiskFactor::ResidenceType => "residence_type",
            RiskFactor::LoanType => "loan_type",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk points a single factor added for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorContribution {
    pub factor: RiskFactor,
    pub points: u32,
}

/// Per-factor breakdown of the heuristic risk score.
pub fn contributions(attrs: &ApplicantAttributes) -> [FactorContribution; 8] {
    let age = match attrs.age {
        a if a < 25 => 15,
        a if a < 35 => 10,
        a if a < 50 => 5,
        _ => 0,
    };

    let lti = attrs.loan_to_income();
    let loan_to_income = if lti > 5.0 {
        25
    } else if lti > 3.0 {
        15
    } else if lti > 2.0 {
        10
    } else {
        0
    };

    let delinquency = banded(attrs.delinquency_ratio, [(50.0, 30), (30.0, 20), (10.0, 10)]);
    let utilization = banded(attrs.credit_utilization_ratio, [(80.0, 20), (50.0, 10), (30.0, 5)]);
    let dpd = banded(attrs.avg_dpd_per_delinquency, [(30.0, 25), (15.0, 15), (5.0, 8)]);

    let open_accounts = if attrs.num_open_accounts > 3 {
        10
    } else if attrs.num_open_accounts < 2 {
        5
    } else {
        0
    };

    let residence = match attrs.residence_type {
        ResidenceType::Rented => 10,
        ResidenceType::Mortgage => 5,
        ResidenceType::Owned => 0,
    };

    let loan_type = match attrs.loan_type {
        LoanType::Unsecured => 15,
        LoanType::Secured => 0,
    };

    [
        FactorContribution { factor: RiskFactor::Age, points: age },
        FactorContribution { factor: RiskFactor::LoanToIncome, points: loan_to_income },
        FactorContribution { factor: RiskFactor::DelinquencyRatio, points: delinquency },
        FactorContribution { factor: RiskFactor::CreditUtilization, points: utilization },
        FactorContribution { factor: RiskFactor::DaysPastDue, points: dpd },
        FactorContribution { factor: RiskFactor::OpenAccounts, points: open_accounts },
        FactorContribution { factor: RiskFactor::ResidenceType, points: residence },
        FactorContribution { factor: RiskFactor::LoanType, points: loan_type },
    ]
}

/// First band whose lower bound `value` strictly exceeds; bands are descending.
fn banded(value: f64, bands: [(f64, u32); 3]) -> u32 {
    bands
        .iter()
        .find(|(floor, _)| value > *floor)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Sum of all factor contributions.
pub fn risk_score(attrs: &ApplicantAttributes) -> u32 {
    contributions(attrs).iter().map(|c| c.points).sum()
}

/// Deterministic fallback scorer.
pub fn evaluate(attrs: &ApplicantAttributes) -> ScoreResult {
    let risk = risk_score(attrs);
    let default_probability = (f64::from(risk) / 100.0).min(MAX_DEFAULT_PROBABILITY);
    let credit_score = credit_score_from_probability(default_probability);

    // p is clamped to [0, 0.99], so the score always lands in [306, 900].
    let rating = BandPolicy::Bounded
        .rate(credit_score)
        .unwrap_or(Rating::Poor);

    ScoreResult {
        default_probability,
        credit_score,
        rating,
        method: ScoringMethod::Heuristic,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

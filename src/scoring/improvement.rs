use serde::Serialize;

use super::attributes::ApplicantAttributes;
use super::heuristic::{contributions, RiskFactor};

/// Score movement smaller than this is reported as stable.
const TREND_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn from_points(points: u32) -> Self {
        match points {
            p if p >= 20 => Priority::High,
            p if p >= 10 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub category: RiskFactor,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    /// Risk points this factor currently adds.
    pub risk_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreTrend {
    pub first_score: i32,
    pub latest_score: i32,
    pub change: i32,
    pub direction: TrendDirection,
}

/// Actionable suggestions for the factors that currently add risk, worst first.
///
/// Age and residence type add risk too but are not something the applicant
/// can act on, so they produce no suggestion.
pub fn suggest(attrs: &ApplicantAttributes) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = contributions(attrs)
        .iter()
        .filter(|c| c.points > 0)
        .filter_map(|c| {
            let (title, message) = advice(c.factor, attrs)?;
            Some(Suggestion {
                category: c.factor,
                priority: Priority::from_points(c.points),
                title: title.to_string(),
                message,
                risk_points: c.points,
            })
        })
        .collect();

    out.sort_by(|a, b| b.risk_points.cmp(&a.risk_points));
    out
}

fn advice(factor: RiskFactor, attrs: &ApplicantAttributes) -> Option<(&'static str, String)> {
    let advice = match factor {
        RiskFactor::CreditUtilization => (
            "Reduce credit utilization",
            format!(
                "You are using {:.0}% of your available credit. Keeping utilization below 30% removes this penalty.",
                attrs.credit_utilization_ratio
            ),
        ),
        RiskFactor::DelinquencyRatio => (
            "Lower your delinquency ratio",
            format!(
                "{:.0}% of your repayments were late. Clearing overdue accounts and paying on time brings this under 10%.",
                attrs.delinquency_ratio
            ),
        ),
        RiskFactor::DaysPastDue => (
            "Pay sooner when you fall behind",
            format!(
                "Late payments average {:.0} days past due. Settling within 5 days removes this penalty.",
                attrs.avg_dpd_per_delinquency
            ),
        ),
        RiskFactor::LoanToIncome => (
            "Request a smaller loan",
            format!(
                "The loan is {:.1}x your annual income. Amounts up to 2x income carry no extra risk.",
                attrs.loan_to_income()
            ),
        ),
        RiskFactor::OpenAccounts if attrs.num_open_accounts > 3 => (
            "Consolidate open accounts",
            format!(
                "You hold {} open credit accounts. Closing or consolidating down to 2-3 lowers your risk.",
                attrs.num_open_accounts
            ),
        ),
        RiskFactor::OpenAccounts => (
            "Build a credit history",
            "A thin credit file adds risk. Keeping 2-3 accounts in good standing helps.".to_string(),
        ),
        RiskFactor::LoanType => (
            "Consider a secured loan",
            "Unsecured loans carry extra risk. Offering collateral removes this penalty.".to_string(),
        ),
        RiskFactor::Age | RiskFactor::ResidenceType => return None,
    };

    Some(advice)
}

/// Trend across scores ordered oldest to newest. `None` with fewer than two.
pub fn score_trend(scores: &[i32]) -> Option<ScoreTrend> {
    let (&first_score, &latest_score) = (scores.first()?, scores.last()?);
    if scores.len() < 2 {
        return None;
    }

    let change = latest_score - first_score;
    let direction = if change >= TREND_THRESHOLD {
        TrendDirection::Improving
    } else if change <= -TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    Some(ScoreTrend {
        first_score,
        latest_score,
        change,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::attributes::{LoanPurpose, LoanType, ResidenceType};

    fn clean() -> ApplicantAttributes {
        ApplicantAttributes {
            age: 55,
            income: 1_000_000.0,
            loan_amount: 500_000.0,
            loan_tenure_months: 24,
            avg_dpd_per_delinquency: 0.0,
            delinquency_ratio: 0.0,
            credit_utilization_ratio: 10.0,
            num_open_accounts: 2,
            residence_type: ResidenceType::Owned,
            loan_purpose: LoanPurpose::Home,
            loan_type: LoanType::Secured,
        }
    }

    #[test]
    fn test_no_suggestions_for_clean_profile() {
        assert!(suggest(&clean()).is_empty());
    }

    #[test]
    fn test_non_actionable_factors_are_skipped() {
        let mut attrs = clean();
        attrs.age = 21;
        attrs.residence_type = ResidenceType::Rented;
        assert!(suggest(&attrs).is_empty());
    }

    #[test]
    fn test_suggestions_sorted_by_risk() {
        let mut attrs = clean();
        attrs.credit_utilization_ratio = 85.0; // 20
        attrs.avg_dpd_per_delinquency = 7.0; // 8
        attrs.loan_type = LoanType::Unsecured; // 15

        let suggestions = suggest(&attrs);
        let categories: Vec<RiskFactor> = suggestions.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![RiskFactor::CreditUtilization, RiskFactor::LoanType, RiskFactor::DaysPastDue]
        );
        assert_eq!(suggestions[0].priority, Priority::High);
        assert_eq!(suggestions[1].priority, Priority::Medium);
        assert_eq!(suggestions[2].priority, Priority::Low);
        assert!(suggestions[0].message.contains("85%"));
    }

    #[test]
    fn test_open_accounts_advice_depends_on_direction() {
        let mut attrs = clean();
        attrs.num_open_accounts = 1;
        assert_eq!(suggest(&attrs)[0].title, "Build a credit history");

        attrs.num_open_accounts = 6;
        assert_eq!(suggest(&attrs)[0].title, "Consolidate open accounts");
    }

    #[test]
    fn test_score_trend() {
        assert_eq!(score_trend(&[]), None);
        assert_eq!(score_trend(&[700]), None);

        let up = score_trend(&[600, 650, 720]).unwrap();
        assert_eq!(up.change, 120);
        assert_eq!(up.direction, TrendDirection::Improving);

        assert_eq!(score_trend(&[720, 600]).unwrap().direction, TrendDirection::Declining);
        assert_eq!(score_trend(&[700, 705]).unwrap().direction, TrendDirection::Stable);
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::{ApplicantAttributes, LoanPurpose, LoanType, ResidenceType};

/// Database row for the loan_applications table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanApplication {
    pub id: Uuid,
    pub user_id: Uuid,

    pub age: i32,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: i32,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub num_open_accounts: i32,
    pub residence_type: String,
    pub loan_purpose: String,
    pub loan_type: String,

    pub default_probability: f64,
    pub credit_score: i32,
    pub rating: String,
    pub scoring_method: String,

    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub disbursed_amount: Option<Decimal>,
    pub repaid_amount: Decimal,
    pub rejection_reason: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl LoanApplication {
    /// Rebuild the evaluator input from the stored row.
    pub fn attributes(&self) -> anyhow::Result<ApplicantAttributes> {
        let residence_type = ResidenceType::from_str(&self.residence_type)
            .ok_or_else(|| anyhow::anyhow!("unknown residence type: {}", self.residence_type))?;
        let loan_type = LoanType::from_str(&self.loan_type)
            .ok_or_else(|| anyhow::anyhow!("unknown loan type: {}", self.loan_type))?;

        Ok(ApplicantAttributes {
            age: self.age,
            income: self.income,
            loan_amount: self.loan_amount,
            loan_tenure_months: self.loan_tenure_months,
            avg_dpd_per_delinquency: self.avg_dpd_per_delinquency,
            delinquency_ratio: self.delinquency_ratio,
            credit_utilization_ratio: self.credit_utilization_ratio,
            num_open_accounts: self.num_open_accounts,
            residence_type,
            loan_purpose: LoanPurpose::from(self.loan_purpose.clone()),
            loan_type,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending.as_str()
    }
}

/// Application row joined with the applicant's name and email.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationWithApplicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: LoanApplication,
    pub user_name: String,
    pub user_email: String,
}

/// Review state of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(ApplicationStatus::Pending),
            "Approved" => Some(ApplicationStatus::Approved),
            "Rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

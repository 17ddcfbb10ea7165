use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categorical inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Owned,
    Rented,
    Mortgage,
}

impl ResidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidenceType::Owned => "Owned",
            ResidenceType::Rented => "Rented",
            ResidenceType::Mortgage => "Mortgage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "owned" => Some(ResidenceType::Owned),
            "rented" => Some(ResidenceType::Rented),
            "mortgage" => Some(ResidenceType::Mortgage),
            _ => None,
        }
    }
}

impl fmt::Display for ResidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    Secured,
    Unsecured,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Secured => "Secured",
            LoanType::Unsecured => "Unsecured",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "secured" => Some(LoanType::Secured),
            "unsecured" => Some(LoanType::Unsecured),
            _ => None,
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loan purpose is free text. Well-known purposes get their own variant so the
/// model features can one-hot encode them; anything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanPurpose {
    Education,
    Home,
    Personal,
    Auto,
    Medical,
    Business,
    Other(String),
}

impl LoanPurpose {
    pub fn as_str(&self) -> &str {
        match self {
            LoanPurpose::Education => "Education",
            LoanPurpose::Home => "Home",
            LoanPurpose::Personal => "Personal",
            LoanPurpose::Auto => "Auto",
            LoanPurpose::Medical => "Medical",
            LoanPurpose::Business => "Business",
            LoanPurpose::Other(s) => s,
        }
    }
}

impl From<String> for LoanPurpose {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Education" => LoanPurpose::Education,
            "Home" => LoanPurpose::Home,
            "Personal" => LoanPurpose::Personal,
            "Auto" => LoanPurpose::Auto,
            "Medical" => LoanPurpose::Medical,
            "Business" => LoanPurpose::Business,
            _ => LoanPurpose::Other(s),
        }
    }
}

impl From<&str> for LoanPurpose {
    fn from(s: &str) -> Self {
        LoanPurpose::from(s.to_string())
    }
}

impl From<LoanPurpose> for String {
    fn from(p: LoanPurpose) -> Self {
        match p {
            LoanPurpose::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicantAttributes: evaluator input
// ---------------------------------------------------------------------------

/// Everything the evaluator needs to score one loan application.
///
/// Ratios (`delinquency_ratio`, `credit_utilization_ratio`) are percentages in
/// the 0–100 range. Domain validation is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantAttributes {
    pub age: i32,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: i32,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: f64,
    pub credit_utilization_ratio: f64,
    pub num_open_accounts: i32,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl ApplicantAttributes {
    /// Loan amount over income; zero when income is not positive.
    pub fn loan_to_income(&self) -> f64 {
        if self.income > 0.0 {
            self.loan_amount / self.income
        } else {
            0.0
        }
    }
}

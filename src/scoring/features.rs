use super::attributes::{ApplicantAttributes, LoanPurpose, LoanType, ResidenceType};
use super::model::{Scaler, ScoringError};

/// Declares the feature record together with its column-name lookup so the
/// two can never drift apart.
macro_rules! feature_record {
    ($($field:ident => $column:literal),+ $(,)?) => {
        /// Fixed-schema model input, one field per column the classifier may ask for.
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct FeatureVector {
            $(pub $field: f64,)+
        }

        impl FeatureVector {
            /// Column names in declaration order.
            pub const COLUMNS: &'static [&'static str] = &[$($column),+];

            pub fn get(&self, column: &str) -> Option<f64> {
                match column {
                    $($column => Some(self.$field),)+
                    _ => None,
                }
            }

            fn get_mut(&mut self, column: &str) -> Option<&mut f64> {
                match column {
                    $($column => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

feature_record! {
    age => "age",
    income => "income",
    loan_amount => "loan_amount",
    loan_tenure_months => "loan_tenure_months",
    number_of_open_accounts => "number_of_open_accounts",
    credit_utilization_ratio => "credit_utilization_ratio",
    loan_to_income => "loan_to_income",
    delinquency_ratio => "delinquency_ratio",
    avg_dpd_per_delinquency => "avg_dpd_per_delinquency",
    residence_type_owned => "residence_type_Owned",
    residence_type_rented => "residence_type_Rented",
    residence_type_mortgage => "residence_type_Mortgage",
    loan_purpose_education => "loan_purpose_Education",
    loan_purpose_home => "loan_purpose_Home",
    loan_purpose_personal => "loan_purpose_Personal",
    loan_type_secured => "loan_type_Secured",
    loan_type_unsecured => "loan_type_Unsecured",
    number_of_dependants => "number_of_dependants",
    years_at_current_address => "years_at_current_address",
    zipcode => "zipcode",
    sanction_amount => "sanction_amount",
    processing_fee => "processing_fee",
    gst => "gst",
    net_disbursement => "net_disbursement",
    principal_outstanding => "principal_outstanding",
    bank_balance_at_application => "bank_balance_at_application",
    number_of_closed_accounts => "number_of_closed_accounts",
    enquiry_count => "enquiry_count",
}

// Placeholders for bureau fields the application form does not collect.
const DEFAULT_DEPENDANTS: f64 = 2.0;
const DEFAULT_YEARS_AT_ADDRESS: f64 = 3.0;
const DEFAULT_ZIPCODE: f64 = 110_001.0;
const DEFAULT_CLOSED_ACCOUNTS: f64 = 2.0;
const DEFAULT_ENQUIRY_COUNT: f64 = 1.0;
const PROCESSING_FEE_RATE: f64 = 0.02;
const GST_RATE: f64 = 0.18;

fn one_hot(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

impl FeatureVector {
    pub fn from_attributes(attrs: &ApplicantAttributes) -> Self {
        let loan_amount = attrs.loan_amount;
        let processing_fee = loan_amount * PROCESSING_FEE_RATE;

        Self {
            age: f64::from(attrs.age),
            income: attrs.income,
            loan_amount,
            loan_tenure_months: f64::from(attrs.loan_tenure_months),
            number_of_open_accounts: f64::from(attrs.num_open_accounts),
            credit_utilization_ratio: attrs.credit_utilization_ratio,
            loan_to_income: attrs.loan_to_income(),
            delinquency_ratio: attrs.delinquency_ratio,
            avg_dpd_per_delinquency: attrs.avg_dpd_per_delinquency,

            residence_type_owned: one_hot(attrs.residence_type == ResidenceType::Owned),
            residence_type_rented: one_hot(attrs.residence_type == ResidenceType::Rented),
            residence_type_mortgage: one_hot(attrs.residence_type == ResidenceType::Mortgage),
            loan_purpose_education: one_hot(attrs.loan_purpose == LoanPurpose::Education),
            loan_purpose_home: one_hot(attrs.loan_purpose == LoanPurpose::Home),
            loan_purpose_personal: one_hot(attrs.loan_purpose == LoanPurpose::Personal),
            loan_type_secured: one_hot(attrs.loan_type == LoanType::Secured),
            loan_type_unsecured: one_hot(attrs.loan_type == LoanType::Unsecured),

            number_of_dependants: DEFAULT_DEPENDANTS,
            years_at_current_address: DEFAULT_YEARS_AT_ADDRESS,
            zipcode: DEFAULT_ZIPCODE,
            sanction_amount: loan_amount,
            processing_fee,
            gst: processing_fee * GST_RATE,
            net_disbursement: loan_amount * 0.98,
            principal_outstanding: loan_amount * 0.5,
            bank_balance_at_application: attrs.income * 0.3,
            number_of_closed_accounts: DEFAULT_CLOSED_ACCOUNTS,
            enquiry_count: DEFAULT_ENQUIRY_COUNT,
        }
    }

    /// Values for `columns`, in that order.
    pub fn select(&self, columns: &[String]) -> Result<Vec<f64>, ScoringError> {
        columns
            .iter()
            .map(|c| self.get(c).ok_or_else(|| ScoringError::UnknownColumn(c.clone())))
            .collect()
    }

    /// Rescale `columns` in place.
    pub fn apply_scaler(&mut self, scaler: &Scaler, columns: &[String]) -> Result<(), ScoringError> {
        let raw = self.select(columns)?;
        let scaled = scaler.transform(&raw)?;

        for (column, value) in columns.iter().zip(scaled) {
            if let Some(slot) = self.get_mut(column) {
                *slot = value;
            }
        }

        Ok(())
    }
}

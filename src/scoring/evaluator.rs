use std::fmt;
use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use super::attributes::ApplicantAttributes;
use super::features::FeatureVector;
use super::heuristic;
use super::model::{ModelBundle, ScoringError};
use super::rating::{credit_score_from_probability, BandPolicy, Rating};

/// Which computation produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    Model,
    Heuristic,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Model => "model",
            ScoringMethod::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub default_probability: f64,
    pub credit_score: i32,
    pub rating: Rating,
    pub method: ScoringMethod,
}

/// Owns the optional classifier bundle. Shared read-only across requests.
#[derive(Debug, Default)]
pub struct ScoringContext {
    bundle: Option<ModelBundle>,
}

impl ScoringContext {
    pub fn heuristic_only() -> Self {
        Self { bundle: None }
    }

    pub fn with_model(bundle: ModelBundle) -> Self {
        Self {
            bundle: Some(bundle),
        }
    }

    /// Load a bundle from disk. A missing or broken bundle is not fatal: the
    /// context falls back to heuristic-only scoring.
    pub fn load(path: &Path) -> Self {
        match ModelBundle::load(path) {
            Ok(bundle) => {
                tracing::info!(
                    path = %path.display(),
                    classifier = bundle.classifier_name(),
                    features = bundle.features().len(),
                    "Credit model loaded"
                );
                Self::with_model(bundle)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not load credit model, using heuristic scoring"
                );
                Self::heuristic_only()
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.usable_bundle().is_some()
    }

    fn usable_bundle(&self) -> Option<&ModelBundle> {
        self.bundle.as_ref().filter(|b| !b.features().is_empty())
    }

    /// Score one applicant. Never fails: model errors fall back to the
    /// heuristic scorer.
    pub fn evaluate(&self, attrs: &ApplicantAttributes) -> ScoreResult {
        let started = Instant::now();

        let result = match self.usable_bundle() {
            Some(bundle) => match evaluate_with_model(bundle, attrs) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "Model prediction failed, using heuristic fallback");
                    counter!("model_fallbacks_total").increment(1);
                    heuristic::evaluate(attrs)
                }
            },
            None => heuristic::evaluate(attrs),
        };

        counter!("credit_predictions_total", "method" => result.method.as_str()).increment(1);
        histogram!("scoring_latency_seconds").record(started.elapsed().as_secs_f64());

        result
    }
}

/// Model-backed scoring. Uses the threshold band table.
pub fn evaluate_with_model(
    bundle: &ModelBundle,
    attrs: &ApplicantAttributes,
) -> Result<ScoreResult, ScoringError> {
    let features = FeatureVector::from_attributes(attrs);
    let default_probability = bundle.predict(&features)?;
    let credit_score = credit_score_from_probability(default_probability);
    let rating = BandPolicy::Threshold
        .rate(credit_score)
        .unwrap_or(Rating::Poor);

    Ok(ScoreResult {
        default_probability,
        credit_score,
        rating,
        method: ScoringMethod::Model,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::attributes::{LoanPurpose, LoanType, ResidenceType};
    use crate::scoring::model::{Classifier, LogisticRegression, Scaler};

    struct Failing;

    impl Classifier for Failing {
        fn positive_probability(&self, _row: &[f64]) -> Result<f64, ScoringError> {
            Err(ScoringError::Classifier("boom".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn positive_probability(&self, _row: &[f64]) -> Result<f64, ScoringError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn applicant() -> ApplicantAttributes {
        ApplicantAttributes {
            age: 45,
            income: 1_200_000.0,
            loan_amount: 3_000_000.0,
            loan_tenure_months: 120,
            avg_dpd_per_delinquency: 10.0,
            delinquency_ratio: 20.0,
            credit_utilization_ratio: 60.0,
            num_open_accounts: 4,
            residence_type: ResidenceType::Mortgage,
            loan_purpose: LoanPurpose::Home,
            loan_type: LoanType::Secured,
        }
    }

    fn features(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_heuristic_only_context() {
        let ctx = ScoringContext::heuristic_only();
        assert!(!ctx.has_model());
        assert_eq!(ctx.evaluate(&applicant()), heuristic::evaluate(&applicant()));
    }

    #[test]
    fn test_failing_model_falls_back_to_heuristic() {
        let ctx = ScoringContext::with_model(ModelBundle::new(Failing, features(&["age"])));
        assert!(ctx.has_model());
        assert_eq!(ctx.evaluate(&applicant()), heuristic::evaluate(&applicant()));
    }

    #[test]
    fn test_unknown_column_falls_back_to_heuristic() {
        let model = LogisticRegression {
            coefficients: vec![0.1],
            intercept: 0.0,
        };
        let ctx = ScoringContext::with_model(ModelBundle::new(model, features(&["credit_history"])));
        let result = ctx.evaluate(&applicant());
        assert_eq!(result.method, ScoringMethod::Heuristic);
        assert_eq!(result, heuristic::evaluate(&applicant()));
    }

    #[test]
    fn test_bad_scaler_falls_back_to_heuristic() {
        let bundle = ModelBundle::new(Fixed(0.2), features(&["age", "income"])).with_scaler(
            Scaler::Standard {
                mean: vec![0.0],
                scale: vec![1.0],
            },
            features(&["age", "income"]),
        );
        let ctx = ScoringContext::with_model(bundle);
        assert_eq!(ctx.evaluate(&applicant()).method, ScoringMethod::Heuristic);
    }

    #[test]
    fn test_out_of_range_probability_falls_back() {
        let ctx = ScoringContext::with_model(ModelBundle::new(Fixed(f64::NAN), features(&["age"])));
        assert_eq!(ctx.evaluate(&applicant()).method, ScoringMethod::Heuristic);

        let ctx = ScoringContext::with_model(ModelBundle::new(Fixed(1.5), features(&["age"])));
        assert_eq!(ctx.evaluate(&applicant()).method, ScoringMethod::Heuristic);
    }

    #[test]
    fn test_empty_feature_list_means_no_model() {
        let ctx = ScoringContext::with_model(ModelBundle::new(Fixed(0.5), Vec::new()));
        assert!(!ctx.has_model());
        assert_eq!(ctx.evaluate(&applicant()).method, ScoringMethod::Heuristic);
    }

    #[test]
    fn test_model_path_uses_classifier_probability() {
        let ctx = ScoringContext::with_model(ModelBundle::new(Fixed(0.25), features(&["age"])));
        let result = ctx.evaluate(&applicant());
        assert_eq!(result.method, ScoringMethod::Model);
        assert_eq!(result.default_probability, 0.25);
        assert_eq!(result.credit_score, 750);
        assert_eq!(result.rating, Rating::Excellent);
    }

    #[test]
    fn test_model_path_bands() {
        let cases = [(0.0, 900, Rating::Excellent), (0.4, 660, Rating::Good), (0.6, 540, Rating::Average), (0.9, 360, Rating::Poor), (1.0, 300, Rating::Poor)];
        for (p, score, rating) in cases {
            let ctx = ScoringContext::with_model(ModelBundle::new(Fixed(p), features(&["age"])));
            let result = ctx.evaluate(&applicant());
            assert_eq!(result.credit_score, score, "p={p}");
            assert_eq!(result.rating, rating, "p={p}");
        }
    }

    #[test]
    fn test_logistic_model_with_scaler() {
        // logit = -2 + 4 * scaled_age; age 45 scaled over [20, 70] -> 0.5 -> logit 0
        let model = LogisticRegression {
            coefficients: vec![4.0, 0.0],
            intercept: -2.0,
        };
        let bundle = ModelBundle::new(model, features(&["age", "loan_type_Secured"])).with_scaler(
            Scaler::MinMax {
                data_min: vec![20.0],
                data_max: vec![70.0],
            },
            features(&["age"]),
        );

        let result = ScoringContext::with_model(bundle).evaluate(&applicant());
        assert_eq!(result.method, ScoringMethod::Model);
        assert!((result.default_probability - 0.5).abs() < 1e-12);
        assert_eq!(result.credit_score, 600);
        assert_eq!(result.rating, Rating::Average);
    }

    #[test]
    fn test_load_missing_bundle_is_heuristic_only() {
        let ctx = ScoringContext::load(Path::new("/nonexistent/model_data.json"));
        assert!(!ctx.has_model());
    }
}

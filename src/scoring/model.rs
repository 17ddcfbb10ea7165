use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::features::FeatureVector;

/// Anything that can go wrong on the model-backed scoring path.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to read model bundle: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model bundle: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model bundle lists no features")]
    EmptyFeatureList,

    #[error("unknown feature column: {0}")]
    UnknownColumn(String),

    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("classifier returned invalid probability {0}")]
    InvalidProbability(f64),

    #[error("classifier error: {0}")]
    Classifier(String),
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// A pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Probability of the positive (default) class for one feature row.
    fn positive_probability(&self, row: &[f64]) -> Result<f64, ScoringError>;

    fn name(&self) -> &str;
}

/// Fitted logistic regression: `p = sigmoid(intercept + coefficients · row)`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Classifier for LogisticRegression {
    fn positive_probability(&self, row: &[f64]) -> Result<f64, ScoringError> {
        if row.len() != self.coefficients.len() {
            return Err(ScoringError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }

        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>();

        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

// ---------------------------------------------------------------------------
// Scaler
// ---------------------------------------------------------------------------

/// Pre-fitted column rescaling, applied before the classifier sees a row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - min) / (max - min)`; constant columns map to `x - min`.
    MinMax { data_min: Vec<f64>, data_max: Vec<f64> },
    /// `(x - mean) / scale`; zero scale is treated as 1.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScoringError> {
        let (offsets, divisors): (&[f64], Vec<f64>) = match self {
            Scaler::MinMax { data_min, data_max } => {
                check_len(data_max.len(), data_min.len())?;
                let ranges = data_min
                    .iter()
                    .zip(data_max)
                    .map(|(lo, hi)| hi - lo)
                    .collect();
                (data_min.as_slice(), ranges)
            }
            Scaler::Standard { mean, scale } => {
                check_len(scale.len(), mean.len())?;
                (mean.as_slice(), scale.clone())
            }
        };

        check_len(offsets.len(), values.len())?;

        Ok(values
            .iter()
            .zip(offsets)
            .zip(divisors)
            .map(|((x, offset), divisor)| {
                let divisor = if divisor == 0.0 { 1.0 } else { divisor };
                (x - offset) / divisor
            })
            .collect())
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), ScoringError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScoringError::ShapeMismatch { expected, actual })
    }
}

// ---------------------------------------------------------------------------
// ModelBundle
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ModelSpec {
    LogisticRegression(LogisticRegression),
}

#[derive(Deserialize)]
struct BundleFile {
    model: ModelSpec,
    #[serde(default)]
    scaler: Option<Scaler>,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    cols_to_scale: Vec<String>,
}

/// Classifier plus the preprocessing it was trained with.
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    scaler: Option<Scaler>,
    features: Vec<String>,
    cols_to_scale: Vec<String>,
}

impl ModelBundle {
    pub fn new(classifier: impl Classifier + 'static, features: Vec<String>) -> Self {
        Self {
            classifier: Box::new(classifier),
            scaler: None,
            features,
            cols_to_scale: Vec::new(),
        }
    }

    pub fn with_scaler(mut self, scaler: Scaler, cols_to_scale: Vec<String>) -> Self {
        self.scaler = Some(scaler);
        self.cols_to_scale = cols_to_scale;
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ScoringError> {
        let file: BundleFile = serde_json::from_str(raw)?;
        if file.features.is_empty() {
            return Err(ScoringError::EmptyFeatureList);
        }

        let ModelSpec::LogisticRegression(model) = file.model;
        let mut bundle = Self::new(model, file.features);
        if let Some(scaler) = file.scaler {
            bundle = bundle.with_scaler(scaler, file.cols_to_scale);
        }

        Ok(bundle)
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Scale, select and classify. Returns the default probability.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let mut features = *features;

        if let Some(scaler) = &self.scaler {
            if !self.cols_to_scale.is_empty() {
                features.apply_scaler(scaler, &self.cols_to_scale)?;
            }
        }

        let row = features.select(&self.features)?;
        let p = self.classifier.positive_probability(&row)?;

        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ScoringError::InvalidProbability(p));
        }

        Ok(p)
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("classifier", &self.classifier.name())
            .field("scaler", &self.scaler)
            .field("features", &self.features.len())
            .field("cols_to_scale", &self.cols_to_scale.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_regression_zero_logit() {
        let model = LogisticRegression {
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        };
        let p = model.positive_probability(&[2.0, 2.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_regression_shape_mismatch() {
        let model = LogisticRegression {
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let err = model.positive_probability(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ScoringError::ShapeMismatch { expected: 1, actual: 2 }));
    }

    #[test]
    fn test_min_max_scaler() {
        let scaler = Scaler::MinMax {
            data_min: vec![0.0, 10.0, 5.0],
            data_max: vec![10.0, 20.0, 5.0],
        };
        let out = scaler.transform(&[5.0, 20.0, 7.0]).unwrap();
        assert_eq!(out, vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_standard_scaler() {
        let scaler = Scaler::Standard {
            mean: vec![100.0, 1.0],
            scale: vec![50.0, 0.0],
        };
        let out = scaler.transform(&[200.0, 3.0]).unwrap();
        assert_eq!(out, vec![2.0, 2.0]);
    }

    #[test]
    fn test_scaler_shape_mismatch() {
        let scaler = Scaler::Standard {
            mean: vec![0.0],
            scale: vec![1.0],
        };
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_bundle_from_json() {
        let raw = r#"{
            "model": { "type": "logistic_regression", "coefficients": [0.5, -0.25], "intercept": -1.0 },
            "scaler": { "type": "min_max", "data_min": [18.0], "data_max": [70.0] },
            "features": ["age", "loan_to_income"],
            "cols_to_scale": ["age"]
        }"#;

        let bundle = ModelBundle::from_json(raw).unwrap();
        assert_eq!(bundle.features(), ["age", "loan_to_income"]);
        assert_eq!(bundle.classifier_name(), "logistic_regression");
    }

    #[test]
    fn test_bundle_without_features_is_rejected() {
        let raw = r#"{
            "model": { "type": "logistic_regression", "coefficients": [], "intercept": 0.0 },
            "features": []
        }"#;
        assert!(matches!(
            ModelBundle::from_json(raw),
            Err(ScoringError::EmptyFeatureList)
        ));
    }

    #[test]
    fn test_bundle_missing_file() {
        let err = ModelBundle::load(Path::new("/nonexistent/model_data.json")).unwrap_err();
        assert!(matches!(err, ScoringError::Io(_)));
    }
}

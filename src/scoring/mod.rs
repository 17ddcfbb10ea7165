pub mod attributes;
pub mod evaluator;
pub mod features;
pub mod heuristic;
pub mod improvement;
pub mod model;
pub mod rating;

pub use attributes::{ApplicantAttributes, LoanPurpose, LoanType, ResidenceType};
pub use evaluator::{evaluate_with_model, ScoreResult, ScoringContext, ScoringMethod};
pub use features::FeatureVector;
pub use model::{Classifier, LogisticRegression, ModelBundle, Scaler, ScoringError};
pub use rating::{BandPolicy, Rating};

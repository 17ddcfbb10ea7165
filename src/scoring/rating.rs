use std::fmt;

use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i32 = 300;
pub const SCALE_LENGTH: i32 = 600;
pub const MAX_SCORE: i32 = BASE_SCORE + SCALE_LENGTH;

/// Qualitative credit band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Average => "Average",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Poor" => Some(Rating::Poor),
            "Average" => Some(Rating::Average),
            "Good" => Some(Rating::Good),
            "Excellent" => Some(Rating::Excellent),
            _ => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score-to-rating tables. The heuristic and model paths each keep their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPolicy {
    /// Closed ranges inside [300, 900]; scores outside have no rating.
    Bounded,
    /// Descending cut points; every score gets a rating.
    Threshold,
}

impl BandPolicy {
    pub fn rate(self, score: i32) -> Option<Rating> {
        match self {
            BandPolicy::Bounded => match score {
                300..=499 => Some(Rating::Poor),
                500..=649 => Some(Rating::Average),
                650..=749 => Some(Rating::Good),
                750..=900 => Some(Rating::Excellent),
                _ => None,
            },
            BandPolicy::Threshold => Some(if score >= 750 {
                Rating::Excellent
            } else if score >= 650 {
                Rating::Good
            } else if score >= 500 {
                Rating::Average
            } else {
                Rating::Poor
            }),
        }
    }
}

/// Map a default probability onto the 300–900 scale. Truncates toward zero.
pub fn credit_score_from_probability(default_probability: f64) -> i32 {
    let non_default = 1.0 - default_probability;
    (f64::from(BASE_SCORE) + non_default * f64::from(SCALE_LENGTH)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_mapping() {
        assert_eq!(credit_score_from_probability(0.0), 900);
        assert_eq!(credit_score_from_probability(0.10), 840);
        assert_eq!(credit_score_from_probability(0.99), 306);
        assert_eq!(credit_score_from_probability(1.0), 300);
    }

    #[test]
    fn test_score_mapping_truncates() {
        // 300 + 0.6549 * 600 = 692.94
        assert_eq!(credit_score_from_probability(0.3451), 692);
    }

    #[test]
    fn test_bounded_bands() {
        let p = BandPolicy::Bounded;
        assert_eq!(p.rate(300), Some(Rating::Poor));
        assert_eq!(p.rate(499), Some(Rating::Poor));
        assert_eq!(p.rate(500), Some(Rating::Average));
        assert_eq!(p.rate(649), Some(Rating::Average));
        assert_eq!(p.rate(650), Some(Rating::Good));
        assert_eq!(p.rate(749), Some(Rating::Good));
        assert_eq!(p.rate(750), Some(Rating::Excellent));
        assert_eq!(p.rate(900), Some(Rating::Excellent));
        assert_eq!(p.rate(299), None);
        assert_eq!(p.rate(901), None);
    }

    #[test]
    fn test_threshold_bands() {
        let p = BandPolicy::Threshold;
        assert_eq!(p.rate(120), Some(Rating::Poor));
        assert_eq!(p.rate(500), Some(Rating::Average));
        assert_eq!(p.rate(650), Some(Rating::Good));
        assert_eq!(p.rate(750), Some(Rating::Excellent));
        assert_eq!(p.rate(1200), Some(Rating::Excellent));
    }

    #[test]
    fn test_policies_agree_inside_scale() {
        for score in BASE_SCORE..=MAX_SCORE {
            assert_eq!(
                BandPolicy::Bounded.rate(score),
                BandPolicy::Threshold.rate(score),
                "score {score}"
            );
        }
    }

    #[test]
    fn test_rating_monotone() {
        let mut prev = Rating::Poor;
        for score in BASE_SCORE..=MAX_SCORE {
            let r = BandPolicy::Bounded.rate(score).unwrap();
            assert!(r >= prev, "rating dropped at {score}");
            prev = r;
        }
    }
}

use serde::{Deserialize, Serialize};

use super::{ScoreCategory, ScoringError};

/// Per-category contribution weights for the composite score.
///
/// The engine does not require the weights to sum to 1; callers normally pass
/// a normalized set such as [`WeightConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub complexity: f64,
    pub patient: f64,
    pub site: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            complexity: 0.4,
            patient: 0.3,
            site: 0.3,
        }
    }
}

impl WeightConfig {
    pub fn weight_for(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Complexity => self.complexity,
            ScoreCategory::PatientBurden => self.patient,
            ScoreCategory::SiteBurden => self.site,
        }
    }

    /// Rejects negative, NaN, and infinite weights.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for category in ScoreCategory::ALL {
            let value = self.weight_for(category);
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidWeight { category, value });
            }
        }
        Ok(())
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            complexity: self.complexity * factor,
            patient: self.patient * factor,
            site: self.site * factor,
        }
    }

    pub fn sum(&self) -> f64 {
        self.complexity + self.patient + self.site
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_normalized() {
        let weights = WeightConfig::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn unnormalized_weights_are_accepted() {
        let weights = WeightConfig {
            complexity: 2.0,
            patient: 0.0,
            site: 5.5,
        };
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn negative_weight_names_its_category() {
        let weights = WeightConfig {
            patient: -0.1,
            ..WeightConfig::default()
        };

        match weights.validate() {
            Err(ScoringError::InvalidWeight { category, value }) => {
                assert_eq!(category, ScoreCategory::PatientBurden);
                assert_eq!(value, -0.1);
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let weights = WeightConfig {
                site: bad,
                ..WeightConfig::default()
            };
            assert!(matches!(
                weights.validate(),
                Err(ScoringError::InvalidWeight {
                    category: ScoreCategory::SiteBurden,
                    ..
                })
            ));
        }
    }

    #[test]
    fn scaling_multiplies_every_component() {
        let doubled = WeightConfig::default().scaled(2.0);
        assert_eq!(doubled.complexity, 0.8);
        assert_eq!(doubled.patient, 0.6);
        assert_eq!(doubled.site, 0.6);
    }
}

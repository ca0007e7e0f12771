//! Protocol Complexity Score engine.
//!
//! Three sub-scores (design complexity, patient burden, site burden) are each
//! normalized against fixed reference ceilings and then combined with a
//! caller-supplied [`WeightConfig`]. The engine is a pure function: it holds no
//! state, performs no I/O, and never clamps. Values are rounded to two decimal
//! places exactly once, when the [`ScoreResult`] is built.

mod benchmark;
mod rounding;
mod rules;
pub mod simulation;
mod weights;

pub use benchmark::{BenchmarkComparison, BENCHMARK_SCORE, ELEVATED_THRESHOLD};
pub use simulation::{simulate, ProtocolAdjustments, SimulationOutcome};
pub use weights::WeightConfig;

pub(crate) use rounding::round_dp;
pub(crate) use rules::validate_record;

use crate::protocols::ProtocolRecord;
use rules::SubScores;
use serde::{Deserialize, Serialize};
use std::fmt;

const DISPLAY_PLACES: u32 = 2;

/// Scoring categories in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    #[serde(rename = "Complexity")]
    Complexity,
    #[serde(rename = "Patient Burden")]
    PatientBurden,
    #[serde(rename = "Site Burden")]
    SiteBurden,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 3] = [
        ScoreCategory::Complexity,
        ScoreCategory::PatientBurden,
        ScoreCategory::SiteBurden,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoreCategory::Complexity => "Complexity",
            ScoreCategory::PatientBurden => "Patient Burden",
            ScoreCategory::SiteBurden => "Site Burden",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category sub-scores, serialized as a map keyed by category label in
/// Complexity, Patient Burden, Site Burden order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "Complexity")]
    pub complexity: f64,
    #[serde(rename = "Patient Burden")]
    pub patient_burden: f64,
    #[serde(rename = "Site Burden")]
    pub site_burden: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Complexity => self.complexity,
            ScoreCategory::PatientBurden => self.patient_burden,
            ScoreCategory::SiteBurden => self.site_burden,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreCategory, f64)> + '_ {
        ScoreCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

/// Composite score plus per-category breakdown, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    #[serde(skip)]
    unrounded: Unrounded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Unrounded {
    sub_scores: SubScores,
    total: f64,
}

impl ScoreResult {
    fn from_unrounded(sub_scores: SubScores, total: f64) -> Self {
        Self {
            total: round_dp(total, DISPLAY_PLACES),
            breakdown: ScoreBreakdown {
                complexity: round_dp(sub_scores.complexity, DISPLAY_PLACES),
                patient_burden: round_dp(sub_scores.patient_burden, DISPLAY_PLACES),
                site_burden: round_dp(sub_scores.site_burden, DISPLAY_PLACES),
            },
            unrounded: Unrounded { sub_scores, total },
        }
    }

    /// Full-precision composite, before display rounding.
    pub fn unrounded_total(&self) -> f64 {
        self.unrounded.total
    }

    /// Full-precision sub-score for `category`.
    pub fn unrounded_sub_score(&self, category: ScoreCategory) -> f64 {
        let scores = &self.unrounded.sub_scores;
        match category {
            ScoreCategory::Complexity => scores.complexity,
            ScoreCategory::PatientBurden => scores.patient_burden,
            ScoreCategory::SiteBurden => scores.site_burden,
        }
    }

    pub fn benchmark(&self) -> BenchmarkComparison {
        BenchmarkComparison::for_score(self)
    }
}

/// Input rejected by the engine, either up front or because the arithmetic overflowed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("weight for {category} must be finite and non-negative, got {value}")]
    InvalidWeight { category: ScoreCategory, value: f64 },
    #[error("metric {field} must be finite and non-negative, got {value}")]
    InvalidMetric { field: &'static str, value: f64 },
    #[error("{component} score is not finite, got {value}")]
    NonFiniteScore { component: &'static str, value: f64 },
}

/// Computes the Protocol Complexity Score of `record` under `weights`.
pub fn calculate_pcs(
    record: &ProtocolRecord,
    weights: &WeightConfig,
) -> Result<ScoreResult, ScoringError> {
    weights.validate()?;
    validate_record(record)?;

    let sub_scores = rules::sub_scores(record);
    let total = sub_scores.complexity * weights.complexity
        + sub_scores.patient_burden * weights.patient
        + sub_scores.site_burden * weights.site;

    // Finite inputs near f64::MAX can still overflow.
    let components = [
        (ScoreCategory::Complexity.label(), sub_scores.complexity),
        (ScoreCategory::PatientBurden.label(), sub_scores.patient_burden),
        (ScoreCategory::SiteBurden.label(), sub_scores.site_burden),
        ("Total", total),
    ];
    for (component, value) in components {
        if !value.is_finite() {
            return Err(ScoringError::NonFiniteScore { component, value });
        }
    }

    Ok(ScoreResult::from_unrounded(sub_scores, total))
}

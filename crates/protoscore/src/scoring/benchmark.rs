use serde::Serialize;

use super::{round_dp, ScoreResult};

/// Portfolio benchmark a draft protocol is compared against.
pub const BENCHMARK_SCORE: f64 = 50.0;
/// Composite scores above this are flagged as elevated complexity.
pub const ELEVATED_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub benchmark: f64,
    pub delta: f64,
    pub elevated: bool,
}

impl BenchmarkComparison {
    pub fn for_score(score: &ScoreResult) -> Self {
        Self {
            benchmark: BENCHMARK_SCORE,
            delta: round_dp(score.unrounded_total() - BENCHMARK_SCORE, 2),
            elevated: score.total > ELEVATED_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::protocols::{InMemoryProtocolCatalog, ProtocolId, ProtocolRepository};
    use crate::scoring::{calculate_pcs, WeightConfig};

    fn benchmark_for(id: &str) -> super::BenchmarkComparison {
        let record = InMemoryProtocolCatalog::reference()
            .get_by_id(&ProtocolId::from(id))
            .expect("reference protocol present");
        calculate_pcs(&record, &WeightConfig::default())
            .expect("scores")
            .benchmark()
    }

    #[test]
    fn phase_three_sits_above_benchmark_but_not_elevated() {
        let comparison = benchmark_for("ONC-001-PhaseIII");
        assert!((comparison.delta - 18.17).abs() < 1e-9);
        assert!(!comparison.elevated);
    }

    #[test]
    fn car_t_protocol_is_elevated() {
        let comparison = benchmark_for("HEM-009-PhaseI");
        assert!((comparison.delta - 31.95).abs() < 1e-9);
        assert!(comparison.elevated);
    }

    #[test]
    fn phase_two_sits_below_benchmark() {
        let comparison = benchmark_for("ONC-234-PhaseII");
        assert!((comparison.delta + 12.8).abs() < 1e-9);
        assert!(!comparison.elevated);
    }
}

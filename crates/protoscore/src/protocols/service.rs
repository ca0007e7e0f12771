use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{ProtocolId, ProtocolRecord, ProtocolSummary};
use super::repository::{ProtocolRepository, RepositoryError};
use crate::scoring::{
    calculate_pcs, simulate, BenchmarkComparison, ProtocolAdjustments, ScoreResult,
    ScoringError, SimulationOutcome, WeightConfig,
};

/// Service composing the protocol catalog with the scoring engine.
///
/// The configured default weights are an explicit value owned by the service;
/// every call may override them without affecting other callers.
pub struct ProtocolScoringService<R> {
    repository: Arc<R>,
    default_weights: WeightConfig,
}

/// Score of one catalog protocol, with the context a dashboard shows next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolAssessment {
    pub protocol_id: ProtocolId,
    pub name: String,
    pub phase: String,
    pub therapeutic_area: String,
    pub weights: WeightConfig,
    pub score: ScoreResult,
    pub benchmark: BenchmarkComparison,
    pub rwd_insights: Vec<String>,
}

/// What-if outcome for one catalog protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolSimulation {
    pub protocol_id: ProtocolId,
    pub weights: WeightConfig,
    pub adjustments: ProtocolAdjustments,
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
}

impl<R> ProtocolScoringService<R>
where
    R: ProtocolRepository + 'static,
{
    pub fn new(repository: Arc<R>, default_weights: WeightConfig) -> Self {
        Self {
            repository,
            default_weights,
        }
    }

    pub fn default_weights(&self) -> WeightConfig {
        self.default_weights
    }

    pub fn list(&self) -> Result<Vec<ProtocolSummary>, ScoringServiceError> {
        let records = self.repository.load_all()?;
        Ok(records.iter().map(ProtocolRecord::summary).collect())
    }

    pub fn get(&self, protocol_id: &ProtocolId) -> Result<ProtocolRecord, ScoringServiceError> {
        self.repository.get_by_id(protocol_id).map_err(|err| {
            if matches!(err, RepositoryError::NotFound(_)) {
                warn!(%protocol_id, "protocol lookup missed");
            }
            ScoringServiceError::from(err)
        })
    }

    /// Score a catalog protocol, using the service defaults when `weights` is `None`.
    pub fn assess(
        &self,
        protocol_id: &ProtocolId,
        weights: Option<WeightConfig>,
    ) -> Result<ProtocolAssessment, ScoringServiceError> {
        let weights = weights.unwrap_or(self.default_weights);
        let record = self.get(protocol_id)?;
        let score = calculate_pcs(&record, &weights)?;
        let benchmark = score.benchmark();

        debug!(%protocol_id, total = score.total, elevated = benchmark.elevated, "protocol scored");

        Ok(ProtocolAssessment {
            protocol_id: record.id,
            name: record.name,
            phase: record.phase,
            therapeutic_area: record.therapeutic_area,
            weights,
            score,
            benchmark,
            rwd_insights: record.rwd_insights,
        })
    }

    /// Rescore an adjusted copy of a catalog protocol. The catalog is never written.
    pub fn simulate(
        &self,
        protocol_id: &ProtocolId,
        adjustments: ProtocolAdjustments,
        weights: Option<WeightConfig>,
    ) -> Result<ProtocolSimulation, ScoringServiceError> {
        let weights = weights.unwrap_or(self.default_weights);
        let record = self.get(protocol_id)?;
        let outcome = simulate(&record, &adjustments, &weights)?;

        info!(
            %protocol_id,
            baseline = outcome.baseline.total,
            simulated = outcome.simulated.total,
            delta = outcome.delta,
            "what-if simulation complete"
        );

        Ok(ProtocolSimulation {
            protocol_id: record.id,
            weights,
            adjustments,
            outcome,
        })
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

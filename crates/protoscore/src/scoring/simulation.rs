//! What-if recomputation over a copy of a protocol record.
//!
//! Adjustments are applied to a fresh clone; the source record and any score
//! already computed from it are never touched.

use serde::{Deserialize, Serialize};

use super::{calculate_pcs, round_dp, ScoreResult, ScoringError, WeightConfig};
use crate::protocols::ProtocolRecord;

const DELTA_PLACES: u32 = 1;

/// Overrides for the formula drivers. Unset fields keep the source value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolAdjustments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ie_criteria_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_visits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invasive_procedures: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_hours_per_patient: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points_per_visit: Option<f64>,
}

impl ProtocolAdjustments {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns an adjusted deep copy of `record`.
    pub fn apply(&self, record: &ProtocolRecord) -> ProtocolRecord {
        let mut adjusted = record.clone();

        if let Some(count) = self.ie_criteria_count {
            adjusted.complexity_metrics.ie_criteria_count = count;
        }
        if let Some(count) = self.endpoints_count {
            adjusted.complexity_metrics.endpoints_count = count;
        }
        if let Some(visits) = self.total_visits {
            adjusted.patient_burden.total_visits = visits;
        }
        if let Some(procedures) = self.invasive_procedures {
            adjusted.patient_burden.invasive_procedures = procedures;
        }
        if let Some(hours) = self.staff_hours_per_patient {
            adjusted.site_burden.staff_hours_per_patient = hours;
        }
        if let Some(points) = self.data_points_per_visit {
            adjusted.site_burden.data_points_per_visit = points;
        }

        adjusted
    }
}

/// Baseline and simulated scores side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub baseline: ScoreResult,
    pub simulated: ScoreResult,
    /// Simulated minus baseline composite, one decimal place.
    pub delta: f64,
    pub simulated_record: ProtocolRecord,
}

pub fn simulate(
    record: &ProtocolRecord,
    adjustments: &ProtocolAdjustments,
    weights: &WeightConfig,
) -> Result<SimulationOutcome, ScoringError> {
    let baseline = calculate_pcs(record, weights)?;
    let simulated_record = adjustments.apply(record);
    let simulated = calculate_pcs(&simulated_record, weights)?;
    let delta = round_dp(
        simulated.unrounded_total() - baseline.unrounded_total(),
        DELTA_PLACES,
    );

    Ok(SimulationOutcome {
        baseline,
        simulated,
        delta,
        simulated_record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{InMemoryProtocolCatalog, ProtocolId, ProtocolRepository};

    fn onc_001() -> ProtocolRecord {
        InMemoryProtocolCatalog::reference()
            .get_by_id(&ProtocolId::from("ONC-001-PhaseIII"))
            .expect("reference protocol present")
    }

    #[test]
    fn empty_adjustments_leave_score_unchanged() {
        let record = onc_001();
        let outcome = simulate(
            &record,
            &ProtocolAdjustments::default(),
            &WeightConfig::default(),
        )
        .expect("simulation runs");

        assert!(ProtocolAdjustments::default().is_empty());
        assert_eq!(outcome.baseline, outcome.simulated);
        assert_eq!(outcome.delta, 0.0);
        assert_eq!(outcome.simulated_record, record);
    }

    #[test]
    fn fewer_biopsies_lower_the_patient_burden() {
        let record = onc_001();
        let adjustments = ProtocolAdjustments {
            invasive_procedures: Some(2.0),
            ..ProtocolAdjustments::default()
        };

        let outcome =
            simulate(&record, &adjustments, &WeightConfig::default()).expect("simulation runs");

        // 4 -> 2 biopsies removes 20 points of patient burden, 6 of composite.
        assert!((outcome.simulated.breakdown.patient_burden - 52.0).abs() < 1e-9);
        assert!((outcome.simulated.total - 62.17).abs() < 1e-9);
        assert!((outcome.delta + 6.0).abs() < 1e-9);
        assert_eq!(outcome.simulated_record.patient_burden.invasive_procedures, 2.0);
    }

    #[test]
    fn source_record_is_not_aliased() {
        let record = onc_001();
        let snapshot = record.clone();
        let adjustments = ProtocolAdjustments {
            invasive_procedures: Some(0.0),
            total_visits: Some(40.0),
            ..ProtocolAdjustments::default()
        };

        let mut adjusted = adjustments.apply(&record);
        adjusted.rwd_insights.clear();

        assert_eq!(record, snapshot);
        assert_eq!(record.patient_burden.invasive_procedures, 4.0);
        assert_eq!(record.rwd_insights.len(), 2);
    }

    #[test]
    fn negative_override_is_rejected() {
        let adjustments = ProtocolAdjustments {
            total_visits: Some(-1.0),
            ..ProtocolAdjustments::default()
        };

        let err = simulate(&onc_001(), &adjustments, &WeightConfig::default())
            .expect_err("negative visits rejected");
        assert!(matches!(
            err,
            ScoringError::InvalidMetric {
                field: "patient_burden.total_visits",
                ..
            }
        ));
    }

    #[test]
    fn adjustments_deserialize_from_partial_payload() {
        let adjustments: ProtocolAdjustments =
            serde_json::from_str(r#"{"invasive_procedures": 2, "total_visits": 18}"#)
                .expect("partial payload parses");

        assert_eq!(adjustments.invasive_procedures, Some(2.0));
        assert_eq!(adjustments.total_visits, Some(18.0));
        assert!(adjustments.ie_criteria_count.is_none());
    }
}

use crate::protocols::ProtocolRecord;

use super::ScoringError;

// Reference ceilings for an assumed worst-case protocol. Inputs above a ceiling
// push the sub-score proportionally past 100; nothing is clamped here.
pub(crate) const IE_CRITERIA_CEILING: f64 = 50.0;
pub(crate) const ENDPOINTS_CEILING: f64 = 20.0;
pub(crate) const TOTAL_VISITS_CEILING: f64 = 30.0;
pub(crate) const INVASIVE_PROCEDURES_CEILING: f64 = 6.0;
pub(crate) const STAFF_HOURS_CEILING: f64 = 200.0;
pub(crate) const DATA_POINTS_CEILING: f64 = 150.0;

/// Unrounded category sub-scores on the nominal 0-100 band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SubScores {
    pub complexity: f64,
    pub patient_burden: f64,
    pub site_burden: f64,
}

pub(crate) fn sub_scores(record: &ProtocolRecord) -> SubScores {
    let design = &record.complexity_metrics;
    let patient = &record.patient_burden;
    let site = &record.site_burden;

    let complexity = ((f64::from(design.ie_criteria_count) / IE_CRITERIA_CEILING) * 0.5
        + (f64::from(design.endpoints_count) / ENDPOINTS_CEILING) * 0.5)
        * 100.0;

    let patient_burden = ((patient.total_visits / TOTAL_VISITS_CEILING) * 0.4
        + (patient.invasive_procedures / INVASIVE_PROCEDURES_CEILING) * 0.6)
        * 100.0;

    let site_burden = ((site.staff_hours_per_patient / STAFF_HOURS_CEILING) * 0.5
        + (site.data_points_per_visit / DATA_POINTS_CEILING) * 0.5)
        * 100.0;

    SubScores {
        complexity,
        patient_burden,
        site_burden,
    }
}

/// Checks every fractional metric is finite and non-negative. Counts are unsigned.
pub(crate) fn validate_record(record: &ProtocolRecord) -> Result<(), ScoringError> {
    let patient = &record.patient_burden;
    let site = &record.site_burden;

    let fields = [
        ("patient_burden.total_visits", patient.total_visits),
        (
            "patient_burden.invasive_procedures",
            patient.invasive_procedures,
        ),
        (
            "patient_burden.patient_reported_outcomes",
            patient.patient_reported_outcomes,
        ),
        (
            "patient_burden.hospitalization_days",
            patient.hospitalization_days,
        ),
        (
            "site_burden.staff_hours_per_patient",
            site.staff_hours_per_patient,
        ),
        ("site_burden.data_points_per_visit", site.data_points_per_visit),
        ("site_burden.sample_shipments", site.sample_shipments),
    ];

    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ScoringError::InvalidMetric { field, value });
        }
    }

    Ok(())
}

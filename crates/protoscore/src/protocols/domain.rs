use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable catalog key for a protocol draft. Never reused within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolId(pub String);

impl ProtocolId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProtocolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One clinical-trial protocol draft as held by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRecord {
    pub id: ProtocolId,
    pub name: String,
    pub phase: String,
    pub therapeutic_area: String,
    pub complexity_metrics: ComplexityMetrics,
    pub patient_burden: PatientBurden,
    pub site_burden: SiteBurden,
    /// Advisory real-world-data risk notes, displayed verbatim.
    #[serde(default)]
    pub rwd_insights: Vec<String>,
}

impl ProtocolRecord {
    pub fn summary(&self) -> ProtocolSummary {
        ProtocolSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            phase: self.phase.clone(),
            therapeutic_area: self.therapeutic_area.clone(),
        }
    }
}

/// Design-complexity drivers. Only the I/E criteria and endpoint counts feed the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub ie_criteria_count: u32,
    pub endpoints_count: u32,
    pub sites_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendments_predicted: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries_count: Option<u32>,
}

/// Per-participant burden of the schedule of assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientBurden {
    pub total_visits: f64,
    /// Biopsies and comparable invasive procedures.
    pub invasive_procedures: f64,
    pub patient_reported_outcomes: f64,
    pub hospitalization_days: f64,
}

/// Operational load placed on investigator sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBurden {
    pub staff_hours_per_patient: f64,
    pub data_points_per_visit: f64,
    pub sample_shipments: f64,
}

/// Lightweight listing entry used by protocol pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSummary {
    pub id: ProtocolId,
    pub name: String,
    pub phase: String,
    pub therapeutic_area: String,
}

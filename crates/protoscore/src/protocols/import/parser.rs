use super::super::domain::{
    ComplexityMetrics, PatientBurden, ProtocolId, ProtocolRecord, SiteBurden,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;

const INSIGHT_SEPARATOR: char = '|';

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ProtocolRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<CatalogRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    phase: String,
    therapeutic_area: String,
    ie_criteria_count: u32,
    endpoints_count: u32,
    sites_count: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amendments_predicted: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    countries_count: Option<u32>,
    total_visits: f64,
    invasive_procedures: f64,
    patient_reported_outcomes: f64,
    hospitalization_days: f64,
    staff_hours_per_patient: f64,
    data_points_per_visit: f64,
    sample_shipments: f64,
    #[serde(default)]
    rwd_insights: String,
}

impl CatalogRow {
    fn into_record(self) -> ProtocolRecord {
        let rwd_insights = self
            .rwd_insights
            .split(INSIGHT_SEPARATOR)
            .map(str::trim)
            .filter(|insight| !insight.is_empty())
            .map(str::to_string)
            .collect();

        ProtocolRecord {
            id: ProtocolId(self.id),
            name: self.name,
            phase: self.phase,
            therapeutic_area: self.therapeutic_area,
            complexity_metrics: ComplexityMetrics {
                ie_criteria_count: self.ie_criteria_count,
                endpoints_count: self.endpoints_count,
                sites_count: self.sites_count,
                amendments_predicted: self.amendments_predicted,
                countries_count: self.countries_count,
            },
            patient_burden: PatientBurden {
                total_visits: self.total_visits,
                invasive_procedures: self.invasive_procedures,
                patient_reported_outcomes: self.patient_reported_outcomes,
                hospitalization_days: self.hospitalization_days,
            },
            site_burden: SiteBurden {
                staff_hours_per_patient: self.staff_hours_per_patient,
                data_points_per_visit: self.data_points_per_visit,
                sample_shipments: self.sample_shipments,
            },
            rwd_insights,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse::<u32>().map_err(serde::de::Error::custom))
        .transpose()
}

use std::collections::HashMap;

use super::domain::{ComplexityMetrics, PatientBurden, ProtocolId, ProtocolRecord, SiteBurden};
use super::repository::{ProtocolRepository, RepositoryError};
use crate::scoring::validate_record;

/// Read-only catalog held in memory, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProtocolCatalog {
    records: Vec<ProtocolRecord>,
    index: HashMap<ProtocolId, usize>,
}

impl InMemoryProtocolCatalog {
    /// Builds a catalog, rejecting duplicate ids and records with invalid metrics.
    pub fn from_records(records: Vec<ProtocolRecord>) -> Result<Self, RepositoryError> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            validate_record(record).map_err(|source| RepositoryError::InvalidRecord {
                id: record.id.clone(),
                source,
            })?;

            if index.insert(record.id.clone(), position).is_some() {
                return Err(RepositoryError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self { records, index })
    }

    /// The three oncology and hematology drafts shipped with the product demo.
    pub fn reference() -> Self {
        let records = reference_records();
        let index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id.clone(), position))
            .collect();
        Self { records, index }
    }

    pub fn records(&self) -> &[ProtocolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProtocolRepository for InMemoryProtocolCatalog {
    fn load_all(&self) -> Result<Vec<ProtocolRecord>, RepositoryError> {
        Ok(self.records.clone())
    }

    fn get_by_id(&self, id: &ProtocolId) -> Result<ProtocolRecord, RepositoryError> {
        self.index
            .get(id)
            .and_then(|position| self.records.get(*position))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }
}

fn reference_records() -> Vec<ProtocolRecord> {
    vec![
        ProtocolRecord {
            id: ProtocolId::from("ONC-001-PhaseIII"),
            name: "NSCLC Chemo-Immunotherapy Combo".to_string(),
            phase: "III".to_string(),
            therapeutic_area: "Oncology".to_string(),
            complexity_metrics: ComplexityMetrics {
                ie_criteria_count: 38,
                endpoints_count: 12,
                sites_count: 120,
                amendments_predicted: Some(3),
                countries_count: None,
            },
            patient_burden: PatientBurden {
                total_visits: 24.0,
                invasive_procedures: 4.0,
                patient_reported_outcomes: 15.0,
                hospitalization_days: 2.0,
            },
            site_burden: SiteBurden {
                staff_hours_per_patient: 145.0,
                data_points_per_visit: 85.0,
                sample_shipments: 12.0,
            },
            rwd_insights: vec![
                "ECOG 0 requirement excludes 42% of eligible population.".to_string(),
                "Biopsy at Wk 6 has a 28% refusal rate historically.".to_string(),
            ],
        },
        ProtocolRecord {
            id: ProtocolId::from("ONC-234-PhaseII"),
            name: "HER2+ Breast Cancer Targeted".to_string(),
            phase: "II".to_string(),
            therapeutic_area: "Oncology".to_string(),
            complexity_metrics: ComplexityMetrics {
                ie_criteria_count: 24,
                endpoints_count: 6,
                sites_count: 45,
                amendments_predicted: Some(1),
                countries_count: None,
            },
            patient_burden: PatientBurden {
                total_visits: 14.0,
                invasive_procedures: 2.0,
                patient_reported_outcomes: 8.0,
                hospitalization_days: 0.0,
            },
            site_burden: SiteBurden {
                staff_hours_per_patient: 80.0,
                data_points_per_visit: 40.0,
                sample_shipments: 6.0,
            },
            rwd_insights: vec!["Prior line therapy limit excludes 18% of patients.".to_string()],
        },
        ProtocolRecord {
            id: ProtocolId::from("HEM-009-PhaseI"),
            name: "Novel CAR-T for Multiple Myeloma".to_string(),
            phase: "I".to_string(),
            therapeutic_area: "Hematology".to_string(),
            complexity_metrics: ComplexityMetrics {
                ie_criteria_count: 18,
                endpoints_count: 8,
                sites_count: 5,
                amendments_predicted: None,
                countries_count: Some(1),
            },
            patient_burden: PatientBurden {
                total_visits: 45.0,
                invasive_procedures: 6.0,
                patient_reported_outcomes: 20.0,
                hospitalization_days: 14.0,
            },
            site_burden: SiteBurden {
                staff_hours_per_patient: 250.0,
                data_points_per_visit: 120.0,
                sample_shipments: 30.0,
            },
            rwd_insights: vec![
                "14-day hospitalization requirement limits site feasibility to major academic centers only."
                    .to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_catalog_preserves_order() {
        let catalog = InMemoryProtocolCatalog::reference();
        let ids: Vec<_> = catalog
            .load_all()
            .expect("in-memory load succeeds")
            .into_iter()
            .map(|record| record.id.0)
            .collect();

        assert_eq!(
            ids,
            vec!["ONC-001-PhaseIII", "ONC-234-PhaseII", "HEM-009-PhaseI"]
        );
    }

    #[test]
    fn reference_records_pass_validation() {
        let catalog = InMemoryProtocolCatalog::from_records(reference_records())
            .expect("reference records are valid and unique");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn lookup_is_idempotent() {
        let catalog = InMemoryProtocolCatalog::reference();
        let id = ProtocolId::from("ONC-234-PhaseII");

        let first = catalog.get_by_id(&id).expect("present");
        let second = catalog.get_by_id(&id).expect("present");
        assert_eq!(first, second);
        assert_eq!(first.name, "HER2+ Breast Cancer Targeted");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalog = InMemoryProtocolCatalog::reference();
        let err = catalog
            .get_by_id(&ProtocolId::from("NONEXISTENT-ID"))
            .expect_err("missing id");

        match err {
            RepositoryError::NotFound(id) => assert_eq!(id.as_str(), "NONEXISTENT-ID"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records = reference_records();
        let duplicate = records[0].clone();
        records.push(duplicate);

        let err = InMemoryProtocolCatalog::from_records(records).expect_err("duplicate id");
        assert!(
            matches!(err, RepositoryError::DuplicateId(ref id) if id.as_str() == "ONC-001-PhaseIII")
        );
    }

    #[test]
    fn invalid_metrics_are_rejected_at_load() {
        let mut records = reference_records();
        records[1].site_burden.data_points_per_visit = f64::INFINITY;

        let err = InMemoryProtocolCatalog::from_records(records).expect_err("invalid metric");
        assert!(
            matches!(err, RepositoryError::InvalidRecord { ref id, .. } if id.as_str() == "ONC-234-PhaseII")
        );
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let catalog = InMemoryProtocolCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog
            .get_by_id(&ProtocolId::from("ONC-001-PhaseIII"))
            .is_err());
    }
}

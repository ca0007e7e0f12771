//! Protocol catalog, file importers, and the scoring service exposed over HTTP.

mod catalog;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::InMemoryProtocolCatalog;
pub use domain::{
    ComplexityMetrics, PatientBurden, ProtocolId, ProtocolRecord, ProtocolSummary, SiteBurden,
};
pub use import::{CatalogImportError, CatalogImporter};
pub use repository::{ProtocolRepository, RepositoryError};
pub use router::protocol_router;
pub use service::{
    ProtocolAssessment, ProtocolScoringService, ProtocolSimulation, ScoringServiceError,
};

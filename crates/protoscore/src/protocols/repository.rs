use super::domain::{ProtocolId, ProtocolRecord};
use crate::scoring::ScoringError;

/// Catalog abstraction so a file or database source can replace the reference list.
///
/// Both operations are side-effect free; repeated lookups of the same id return
/// value-equal records.
pub trait ProtocolRepository: Send + Sync {
    /// Every record, in catalog order.
    fn load_all(&self) -> Result<Vec<ProtocolRecord>, RepositoryError>;
    /// The unique record for `id`, or [`RepositoryError::NotFound`].
    fn get_by_id(&self, id: &ProtocolId) -> Result<ProtocolRecord, RepositoryError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("protocol {0} not found")]
    NotFound(ProtocolId),
    #[error("protocol {0} appears more than once in the catalog")]
    DuplicateId(ProtocolId),
    #[error("protocol {id} has invalid metrics: {source}")]
    InvalidRecord {
        id: ProtocolId,
        #[source]
        source: ScoringError,
    },
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

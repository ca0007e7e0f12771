mod parser;

use super::catalog::InMemoryProtocolCatalog;
use super::domain::ProtocolRecord;
use super::repository::RepositoryError;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    UnsupportedFormat(String),
    Catalog(RepositoryError),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read protocol catalog: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid protocol JSON: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid protocol CSV data: {}", err),
            CatalogImportError::UnsupportedFormat(extension) => write!(
                f,
                "unsupported catalog format '{}': expected .json or .csv",
                extension
            ),
            CatalogImportError::Catalog(err) => {
                write!(f, "could not build protocol catalog: {}", err)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::UnsupportedFormat(_) => None,
            CatalogImportError::Catalog(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for CatalogImportError {
    fn from(err: RepositoryError) -> Self {
        Self::Catalog(err)
    }
}

/// Loads protocol catalogs exported as JSON arrays or flat CSV sheets.
pub struct CatalogImporter;

impl CatalogImporter {
    /// Picks the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<InMemoryProtocolCatalog, CatalogImportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !matches!(extension.as_str(), "json" | "csv") {
            return Err(CatalogImportError::UnsupportedFormat(extension));
        }

        let file = std::fs::File::open(path)?;
        let catalog = if extension == "json" {
            Self::from_json_reader(file)?
        } else {
            Self::from_csv_reader(file)?
        };

        info!(path = %path.display(), protocols = catalog.len(), "protocol catalog imported");
        Ok(catalog)
    }

    pub fn from_json_reader<R: Read>(
        reader: R,
    ) -> Result<InMemoryProtocolCatalog, CatalogImportError> {
        let records: Vec<ProtocolRecord> = serde_json::from_reader(reader)?;
        Ok(InMemoryProtocolCatalog::from_records(records)?)
    }

    pub fn from_csv_reader<R: Read>(
        reader: R,
    ) -> Result<InMemoryProtocolCatalog, CatalogImportError> {
        let records = parser::parse_records(reader)?;
        Ok(InMemoryProtocolCatalog::from_records(records)?)
    }
}

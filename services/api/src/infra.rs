use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use protoscore::config::ScoringConfig;
use protoscore::error::AppError;
use protoscore::protocols::{CatalogImporter, InMemoryProtocolCatalog};
use protoscore::scoring::WeightConfig;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-invocation weight overrides. Unset weights fall back to the configured defaults.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct WeightArgs {
    /// Weight of the design-complexity sub-score
    #[arg(long, value_parser = parse_weight)]
    pub(crate) complexity_weight: Option<f64>,
    /// Weight of the patient-burden sub-score
    #[arg(long, value_parser = parse_weight)]
    pub(crate) patient_weight: Option<f64>,
    /// Weight of the site-burden sub-score
    #[arg(long, value_parser = parse_weight)]
    pub(crate) site_weight: Option<f64>,
}

impl WeightArgs {
    pub(crate) fn resolve(&self, defaults: WeightConfig) -> WeightConfig {
        WeightConfig {
            complexity: self.complexity_weight.unwrap_or(defaults.complexity),
            patient: self.patient_weight.unwrap_or(defaults.patient),
            site: self.site_weight.unwrap_or(defaults.site),
        }
    }
}

pub(crate) fn parse_weight(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a weight ({err})"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("weight '{raw}' must be finite and non-negative"))
    }
}

/// Loads the catalog from `override_path`, then the configured path, then the reference list.
pub(crate) fn load_catalog(
    config: &ScoringConfig,
    override_path: Option<&Path>,
) -> Result<InMemoryProtocolCatalog, AppError> {
    let path: Option<PathBuf> = override_path
        .map(Path::to_path_buf)
        .or_else(|| config.catalog_path.clone());

    match path {
        Some(path) => Ok(CatalogImporter::from_path(path)?),
        None => {
            info!("no catalog path configured, using reference protocols");
            Ok(InMemoryProtocolCatalog::reference())
        }
    }
}

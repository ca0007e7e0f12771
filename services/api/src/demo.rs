use crate::infra::{load_catalog, WeightArgs};
use clap::Args;
use protoscore::config::AppConfig;
use protoscore::error::AppError;
use protoscore::protocols::{
    InMemoryProtocolCatalog, ProtocolAssessment, ProtocolId, ProtocolRecord,
    ProtocolScoringService, ProtocolSimulation,
};
use protoscore::scoring::{ProtocolAdjustments, ScoreResult, WeightConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// JSON or CSV catalog to load instead of PCS_CATALOG_PATH / the reference protocols
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Protocol identifier, e.g. ONC-001-PhaseIII
    pub(crate) protocol_id: String,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Protocol identifier, e.g. ONC-001-PhaseIII
    pub(crate) protocol_id: String,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Protocol identifier, e.g. ONC-001-PhaseIII
    pub(crate) protocol_id: String,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    /// Override the inclusion/exclusion criteria count
    #[arg(long)]
    pub(crate) ie_criteria_count: Option<u32>,
    /// Override the endpoint count
    #[arg(long)]
    pub(crate) endpoints_count: Option<u32>,
    /// Override the total visit count
    #[arg(long)]
    pub(crate) total_visits: Option<f64>,
    /// Override the number of biopsies and other invasive procedures
    #[arg(long)]
    pub(crate) invasive_procedures: Option<f64>,
    /// Override site staff hours per patient
    #[arg(long)]
    pub(crate) staff_hours_per_patient: Option<f64>,
    /// Override data points captured per visit
    #[arg(long)]
    pub(crate) data_points_per_visit: Option<f64>,
    /// Print the simulation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl SimulateArgs {
    fn adjustments(&self) -> ProtocolAdjustments {
        ProtocolAdjustments {
            ie_criteria_count: self.ie_criteria_count,
            endpoints_count: self.endpoints_count,
            total_visits: self.total_visits,
            invasive_procedures: self.invasive_procedures,
            staff_hours_per_patient: self.staff_hours_per_patient,
            data_points_per_visit: self.data_points_per_visit,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    #[command(flatten)]
    pub(crate) weights: WeightArgs,
    /// Number of invasive procedures removed in the what-if step
    #[arg(long, default_value_t = 2.0)]
    pub(crate) biopsy_reduction: f64,
}

struct CliContext {
    service: ProtocolScoringService<InMemoryProtocolCatalog>,
}

impl CliContext {
    fn load(catalog: &CatalogArgs) -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        let records = load_catalog(&config.scoring, catalog.catalog.as_deref())?;
        let service =
            ProtocolScoringService::new(Arc::new(records), config.scoring.default_weights);
        Ok(Self { service })
    }

    fn weights(&self, args: &WeightArgs) -> WeightConfig {
        args.resolve(self.service.default_weights())
    }
}

pub(crate) fn run_protocol_list(args: CatalogArgs) -> Result<(), AppError> {
    let context = CliContext::load(&args)?;
    let summaries = context.service.list()?;

    println!("Protocol catalog ({} drafts)", summaries.len());
    for summary in summaries {
        println!(
            "- {} | {} | Phase {} | {}",
            summary.id, summary.name, summary.phase, summary.therapeutic_area
        );
    }
    Ok(())
}

pub(crate) fn run_protocol_show(args: ShowArgs) -> Result<(), AppError> {
    let context = CliContext::load(&args.catalog)?;
    let record = context.service.get(&ProtocolId(args.protocol_id))?;
    render_record(&record);
    Ok(())
}

pub(crate) fn run_protocol_score(args: ScoreArgs) -> Result<(), AppError> {
    let context = CliContext::load(&args.catalog)?;
    let weights = context.weights(&args.weights);
    let assessment = context
        .service
        .assess(&ProtocolId(args.protocol_id), Some(weights))?;

    if args.json {
        print_json(&assessment)?;
    } else {
        render_assessment(&assessment);
    }
    Ok(())
}

pub(crate) fn run_protocol_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let context = CliContext::load(&args.catalog)?;
    let weights = context.weights(&args.weights);
    let adjustments = args.adjustments();
    let simulation = context.service.simulate(
        &ProtocolId(args.protocol_id.clone()),
        adjustments,
        Some(weights),
    )?;

    if args.json {
        print_json(&simulation)?;
    } else {
        render_simulation(&simulation);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let context = CliContext::load(&args.catalog)?;
    let weights = context.weights(&args.weights);

    println!("ProtoScore demo");
    println!(
        "Weights: complexity {:.2}, patient {:.2}, site {:.2}",
        weights.complexity, weights.patient, weights.site
    );

    for summary in context.service.list()? {
        let assessment = context.service.assess(&summary.id, Some(weights))?;
        println!();
        render_assessment(&assessment);

        let record = context.service.get(&summary.id)?;
        let adjustments = biopsy_reduction(&record, args.biopsy_reduction);
        let simulation = context
            .service
            .simulate(&summary.id, adjustments, Some(weights))?;
        println!();
        render_simulation(&simulation);
    }

    Ok(())
}

/// Removes `reduction` invasive procedures, never going below zero.
fn biopsy_reduction(record: &ProtocolRecord, reduction: f64) -> ProtocolAdjustments {
    let current = record.patient_burden.invasive_procedures;
    ProtocolAdjustments {
        invasive_procedures: Some((current - reduction.max(0.0)).max(0.0)),
        ..ProtocolAdjustments::default()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn format_breakdown(score: &ScoreResult) -> Vec<String> {
    score
        .breakdown
        .iter()
        .map(|(category, value)| format!("- {category}: {value:.2}"))
        .collect()
}

fn render_record(record: &ProtocolRecord) {
    println!("{} ({})", record.name, record.id);
    println!(
        "Phase {} | Therapeutic area: {}",
        record.phase, record.therapeutic_area
    );

    let design = &record.complexity_metrics;
    println!("\nDesign complexity");
    println!("- I/E criteria: {}", design.ie_criteria_count);
    println!("- Endpoints: {}", design.endpoints_count);
    println!("- Sites: {}", design.sites_count);
    if let Some(amendments) = design.amendments_predicted {
        println!("- Predicted amendments: {amendments}");
    }
    if let Some(countries) = design.countries_count {
        println!("- Countries: {countries}");
    }

    let patient = &record.patient_burden;
    println!("\nPatient burden");
    println!("- Visits: {}", patient.total_visits);
    println!("- Invasive procedures: {}", patient.invasive_procedures);
    println!(
        "- Patient-reported outcomes: {}",
        patient.patient_reported_outcomes
    );
    println!("- Hospitalization days: {}", patient.hospitalization_days);

    let site = &record.site_burden;
    println!("\nSite burden");
    println!("- Staff hours per patient: {}", site.staff_hours_per_patient);
    println!("- Data points per visit: {}", site.data_points_per_visit);
    println!("- Sample shipments: {}", site.sample_shipments);

    render_insights(&record.rwd_insights);
}

fn render_assessment(assessment: &ProtocolAssessment) {
    println!("{} ({})", assessment.name, assessment.protocol_id);
    println!(
        "Phase {} | {}",
        assessment.phase, assessment.therapeutic_area
    );

    let benchmark = &assessment.benchmark;
    let flag = if benchmark.elevated {
        " [elevated]"
    } else {
        ""
    };
    println!(
        "Complexity score: {:.2} ({:+.2} vs benchmark {:.0}){}",
        assessment.score.total, benchmark.delta, benchmark.benchmark, flag
    );

    println!("\nBreakdown");
    for line in format_breakdown(&assessment.score) {
        println!("{line}");
    }

    render_insights(&assessment.rwd_insights);
}

fn render_simulation(simulation: &ProtocolSimulation) {
    let outcome = &simulation.outcome;
    let burden = &outcome.simulated_record.patient_burden;

    println!("What-if for {}", simulation.protocol_id);
    println!(
        "Adjusted to {} visits, {} invasive procedures",
        burden.total_visits, burden.invasive_procedures
    );
    println!(
        "Score: {:.2} -> {:.2} ({:+.1})",
        outcome.baseline.total, outcome.simulated.total, outcome.delta
    );
    for line in format_breakdown(&outcome.simulated) {
        println!("{line}");
    }
}

fn render_insights(insights: &[String]) {
    if insights.is_empty() {
        println!("\nRWD feasibility alerts: none");
    } else {
        println!("\nRWD feasibility alerts");
        for insight in insights {
            println!("- Risk: {insight}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoscore::protocols::ProtocolRepository;
    use protoscore::scoring::calculate_pcs;

    fn reference(id: &str) -> ProtocolRecord {
        InMemoryProtocolCatalog::reference()
            .get_by_id(&ProtocolId::from(id))
            .expect("reference protocol present")
    }

    #[test]
    fn biopsy_reduction_stops_at_zero() {
        let record = reference("ONC-234-PhaseII");

        let adjustments = biopsy_reduction(&record, 5.0);
        assert_eq!(adjustments.invasive_procedures, Some(0.0));
        assert!(adjustments.total_visits.is_none());
    }

    #[test]
    fn biopsy_reduction_ignores_negative_input() {
        let record = reference("ONC-001-PhaseIII");

        let adjustments = biopsy_reduction(&record, -3.0);
        assert_eq!(adjustments.invasive_procedures, Some(4.0));
    }

    #[test]
    fn breakdown_lines_follow_category_order() {
        let score = calculate_pcs(&reference("ONC-001-PhaseIII"), &WeightConfig::default())
            .expect("scores");

        let lines = format_breakdown(&score);
        assert_eq!(
            lines,
            vec![
                "- Complexity: 68.00".to_string(),
                "- Patient Burden: 72.00".to_string(),
                "- Site Burden: 64.58".to_string(),
            ]
        );
    }

    #[test]
    fn simulate_args_map_to_adjustments() {
        let args = SimulateArgs {
            protocol_id: "ONC-001-PhaseIII".to_string(),
            catalog: CatalogArgs::default(),
            weights: WeightArgs::default(),
            ie_criteria_count: Some(30),
            endpoints_count: None,
            total_visits: None,
            invasive_procedures: Some(1.0),
            staff_hours_per_patient: None,
            data_points_per_visit: None,
            json: false,
        };

        let adjustments = args.adjustments();
        assert_eq!(adjustments.ie_criteria_count, Some(30));
        assert_eq!(adjustments.invasive_procedures, Some(1.0));
        assert!(adjustments.endpoints_count.is_none());
    }
}

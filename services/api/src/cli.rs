use crate::demo::{
    run_demo, run_protocol_list, run_protocol_score, run_protocol_show, run_protocol_simulate,
    CatalogArgs, DemoArgs, ScoreArgs, ShowArgs, SimulateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use protoscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ProtoScore",
    about = "Score clinical-trial protocol drafts and explore what-if scenarios",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect and score protocols from the catalog
    Protocols {
        #[command(subcommand)]
        command: ProtocolCommand,
    },
    /// Score every catalog protocol and run a biopsy-reduction what-if on each
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ProtocolCommand {
    /// List catalog protocols
    List(CatalogArgs),
    /// Print the full record for one protocol
    Show(ShowArgs),
    /// Compute the Protocol Complexity Score for one protocol
    Score(ScoreArgs),
    /// Rescore an adjusted copy of one protocol
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Protocols { command } => match command {
            ProtocolCommand::List(args) => run_protocol_list(args),
            ProtocolCommand::Show(args) => run_protocol_show(args),
            ProtocolCommand::Score(args) => run_protocol_score(args),
            ProtocolCommand::Simulate(args) => run_protocol_simulate(args),
        },
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_simulate_overrides() {
        let cli = Cli::try_parse_from([
            "protoscore-api",
            "protocols",
            "simulate",
            "ONC-001-PhaseIII",
            "--invasive-procedures",
            "2",
            "--total-visits",
            "18",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Protocols {
                command: ProtocolCommand::Simulate(args),
            }) => {
                assert_eq!(args.protocol_id, "ONC-001-PhaseIII");
                assert_eq!(args.invasive_procedures, Some(2.0));
                assert_eq!(args.total_visits, Some(18.0));
                assert!(args.ie_criteria_count.is_none());
            }
            other => panic!("expected simulate command, got {other:?}"),
        }
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["protoscore-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}

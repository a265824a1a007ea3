use crate::commands::{run_batch, run_estimate, BatchArgs, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credium::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Credium",
    about = "Serve the Credium credit marketplace or score applicants from the command line",
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
    /// Estimate the approval chance for a single applicant
    Estimate(EstimateArgs),
    /// Score every applicant row of a CSV file
    Batch(BatchArgs),
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
        Command::Estimate(args) => run_estimate(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["credium-web"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_estimate_flags() {
        let cli = Cli::try_parse_from([
            "credium-web",
            "estimate",
            "--income",
            "100000",
            "--amount",
            "300000",
            "--type",
            "card",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Estimate(args)) => {
                assert_eq!(args.income, 100_000.0);
                assert_eq!(args.amount, 300_000.0);
                assert_eq!(args.payments, 0.0);
                assert!(args.json);
            }
            other => panic!("expected estimate, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_input() {
        assert!(Cli::try_parse_from(["credium-web", "batch"]).is_err());
    }
}

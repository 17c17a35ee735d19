//! schema-check CLI
//!
//! Usage:
//!   schema-check compare --source <URL> --target <URL>
//!   schema-check dump --url <URL>

use std::process::ExitCode;

use clap::Parser;
use schema_check::{acquire, compare};
use tracing_subscriber::EnvFilter;

mod config;
mod report;

use config::{Cli, Command};

/// Exit status for any failure.
const EXIT_ERROR: u8 = 2;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error reading source schema: {0}")]
    Source(#[source] schema_check::Error),

    #[error("error reading target schema: {0}")]
    Target(#[source] schema_check::Error),

    #[error("error reading schema: {0}")]
    Dump(#[source] schema_check::Error),

    #[error("error writing output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The schemas are identical.
    Match,
    /// The target differs from the source.
    Differences(usize),
    Dumped,
}

impl Outcome {
    fn exit_code(self) -> u8 {
        match self {
            Outcome::Match | Outcome::Dumped => 0,
            Outcome::Differences(_) => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dotenv {
        Err(e) if !e.not_found() => tracing::warn!("failed to load .env: {}", e),
        _ => {}
    }

    match run(cli.command).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "schema_check=warn",
        1 => "schema_check=info",
        2 => "schema_check=debug",
        _ => "schema_check=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(command: Command) -> Result<Outcome, CliError> {
    match command {
        Command::Compare {
            source,
            target,
            read,
            no_color,
        } => {
            let source_config = read.acquire_config(&source);
            let target_config = read.acquire_config(&target);
            let (source, target) = tokio::try_join!(
                async { acquire(&source_config).await.map_err(CliError::Source) },
                async { acquire(&target_config).await.map_err(CliError::Target) },
            )?;

            let differences = compare(&source, &target);
            tracing::info!(count = differences.len(), "comparison finished");

            let mut stdout = std::io::stdout().lock();
            report::write_report(&mut stdout, &differences, config::use_color(no_color))?;

            Ok(if differences.is_empty() {
                Outcome::Match
            } else {
                Outcome::Differences(differences.len())
            })
        }
        Command::Dump { url, read } => {
            let schema = acquire(&read.acquire_config(&url))
                .await
                .map_err(CliError::Dump)?;
            let mut stdout = std::io::stdout().lock();
            report::write_schema(&mut stdout, &schema)?;
            Ok(Outcome::Dumped)
        }
    }
}

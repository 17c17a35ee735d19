//! Command-line configuration.
//!
//! Connection strings may be given as flags or through the environment
//! (`SCHEMA_CHECK_SOURCE`, `SCHEMA_CHECK_TARGET`, `SCHEMA_CHECK_URL`), and a
//! `.env` file in the current directory or any parent is loaded first.

use std::io::IsTerminal;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use schema_check::AcquireConfig;
use schema_check::introspect::DEFAULT_SCHEMA;

/// Compare PostgreSQL database schemas.
#[derive(Debug, Parser)]
#[command(name = "schema-check", version)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report every structural difference between a source and a target database
    Compare {
        /// Source database connection string
        #[arg(long, env = "SCHEMA_CHECK_SOURCE", hide_env_values = true)]
        source: String,

        /// Target database connection string
        #[arg(long, env = "SCHEMA_CHECK_TARGET", hide_env_values = true)]
        target: String,

        #[command(flatten)]
        read: ReadOptions,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },
    /// Print the schema of a single database
    Dump {
        /// Database connection string
        #[arg(long, env = "SCHEMA_CHECK_URL", hide_env_values = true)]
        url: String,

        #[command(flatten)]
        read: ReadOptions,
    },
}

/// What to read from each database.
#[derive(Debug, Clone, Args)]
pub struct ReadOptions {
    /// Postgres schema to read tables from
    #[arg(long, default_value = DEFAULT_SCHEMA)]
    pub schema: String,

    /// Treat views as tables. Without this flag only base tables are read, so
    /// views never show up as missing or extra tables
    #[arg(long)]
    pub include_views: bool,

    /// Seconds to wait when connecting
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,
}

impl ReadOptions {
    pub fn acquire_config(&self, url: &str) -> AcquireConfig {
        let config = AcquireConfig::new(url)
            .with_schema(self.schema.clone())
            .with_views(self.include_views);
        match self.connect_timeout {
            Some(secs) => config.with_connect_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Colour output unless `--no-color` or `NO_COLOR` is set, or stdout is not a
/// terminal.
pub fn use_color(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

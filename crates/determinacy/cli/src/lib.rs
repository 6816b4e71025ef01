//! nomos-dt - Command-line interface for the Nomos determinacy engine
//!
//! This CLI lets operators:
//! - Score a JSON event file in standard or environmental mode
//! - Inspect the entropy and multiplier of a quantum bit string
//! - Check a score against the participation gate
//! - Print the effective engine configuration

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
pub mod output;

use commands::{config, gate, quantum, score};
pub use error::{CliError, CliResult};

/// nomos-dt CLI application
#[derive(Parser)]
#[command(name = "nomos-dt")]
#[command(about = "nomos-dt - Nomos determinacy scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "NOMOS_DT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Score the events in a JSON file
    Score(score::ScoreArgs),

    /// Entropy and multiplier of a quantum bit string
    Quantum(quantum::QuantumArgs),

    /// Check a score against the participation gate
    Gate(gate::GateArgs),

    /// Show the effective, validated engine configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr so structured output stays parseable.
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let engine_config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Score(args) => score::execute(args, engine_config, cli.output),
        Commands::Quantum(args) => quantum::execute(args, &engine_config, cli.output),
        Commands::Gate(args) => gate::execute(args, &engine_config, cli.output),
        Commands::Config => config::execute(&engine_config, cli.output),
    }
}

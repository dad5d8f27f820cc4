//! risk-sim - Monte Carlo portfolio risk from the command line
//!
//! # Commands
//!
//! - `risk-sim run [--output <file>]` - Full simulation and stress report
//! - `risk-sim calibrate` - Calibrated parameters only
//! - `risk-sim check` - Validate configuration and price files

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use service_cli::{build_config, commands, CliArgs};
use sim_models::models::ModelKind;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stochastic simulation and risk analytics
#[derive(Parser)]
#[command(name = "risk-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Master seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of Monte Carlo simulations
    #[arg(short, long, global = true)]
    n_simulations: Option<usize>,

    /// Stochastic model (gbm, jump_diffusion, bootstrap)
    #[arg(short, long, global = true, value_parser = ModelKind::from_str)]
    model: Option<ModelKind>,

    /// Directory of <TICKER>.csv price files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate, simulate, aggregate and report risk
    Run {
        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Print calibrated parameters
    Calibrate {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check configuration and price files
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let args = CliArgs {
        config_file: cli.config,
        seed: cli.seed,
        n_simulations: cli.n_simulations,
        model: cli.model,
        data_dir: cli.data_dir,
        log_level: cli.log_level,
    };
    let config = build_config(&args)?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(seed = config.seed, model = %config.model, "Configuration loaded");

    match cli.command {
        Commands::Run { output, pretty } => commands::run::run(&config, output.as_deref(), pretty)?,
        Commands::Calibrate { pretty } => commands::calibrate::run(&config, pretty)?,
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}

mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::analysis::{CompareArgs, DiversifyArgs, RebalanceArgs};
use commands::performance::SimulateArgs;
use commands::portfolio::{CatalogArgs, ModelArgs, ValidateArgs};
use commands::profile::ScoreArgs;
use config::Settings;

/// Risk profiling and model ETF portfolios
#[derive(Parser)]
#[command(
    name = "rba",
    version,
    about = "Risk profiling and model ETF portfolios",
    long_about = "A CLI for scoring investor risk questionnaires, looking up model ETF \
                  portfolios, validating, diversifying and comparing allocations, \
                  suggesting rebalancing trades and back-testing allocations on price history."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a risk questionnaire and recommend a model portfolio
    Score(ScoreArgs),
    /// Print the questionnaire and the risk levels
    Questionnaire,
    /// Show the model portfolio for a risk bucket
    Model(ModelArgs),
    /// List the supported ETFs
    Catalog(CatalogArgs),
    /// Validate an allocation against the catalog and weight rules
    Validate(ValidateArgs),
    /// Score how well an allocation is diversified
    Diversify(DiversifyArgs),
    /// Compare several allocations side by side
    Compare(CompareArgs),
    /// Suggest trades that bring an allocation back to its target
    Rebalance(RebalanceArgs),
    /// Back-test an allocation on historical closing prices
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    tracing::debug!(?settings, "settings loaded");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Score(args) => commands::profile::run_score(args),
        Commands::Questionnaire => commands::profile::run_questionnaire(),
        Commands::Model(args) => commands::portfolio::run_model(args),
        Commands::Catalog(args) => commands::portfolio::run_catalog(args),
        Commands::Validate(args) => commands::portfolio::run_validate(args),
        Commands::Diversify(args) => commands::analysis::run_diversify(args),
        Commands::Compare(args) => commands::analysis::run_compare(args),
        Commands::Rebalance(args) => commands::analysis::run_rebalance(args, &settings),
        Commands::Simulate(args) => commands::performance::run_simulate(args, &settings),
        Commands::Version => {
            println!("rba {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

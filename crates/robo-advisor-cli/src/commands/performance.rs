use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use robo_advisor_core::performance::simulation::{simulate_portfolio, SimulationInput};
use robo_advisor_core::portfolio::models::model_portfolio_for_index;

use crate::config::Settings;
use crate::input;

/// Arguments for a historical back-test
#[derive(Args)]
pub struct SimulateArgs {
    /// Price history: CSV (date,ticker,close) or JSON/YAML series
    #[arg(long)]
    pub prices: String,

    /// Path to a JSON or YAML simulation input ({allocation, initial_investment?, ...})
    #[arg(long, conflicts_with_all = ["weights", "bucket"])]
    pub input: Option<String>,

    /// Inline weights, e.g. "ACWI=0.8,VNQ=0.15,GLD=0.05"
    #[arg(long, conflicts_with = "bucket", allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// Back-test the model portfolio of this risk bucket (0-4)
    #[arg(long)]
    pub bucket: Option<i64>,

    /// Starting portfolio value
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Annual risk-free rate for the Sharpe ratio
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Trading days per year used for annualisation
    #[arg(long)]
    pub trading_days: Option<u32>,
}

/// Simulation input as read from a file. Omitted parameters fall back to
/// `Settings` rather than the library defaults.
#[derive(Debug, Deserialize)]
struct SimulationFile {
    allocation: robo_advisor_core::Allocation,
    initial_investment: Option<Decimal>,
    risk_free_rate: Option<Decimal>,
    trading_days_per_year: Option<u32>,
}

impl SimulationFile {
    fn into_input(self, settings: &Settings) -> SimulationInput {
        SimulationInput {
            allocation: self.allocation,
            initial_investment: self
                .initial_investment
                .unwrap_or(settings.initial_investment),
            risk_free_rate: self.risk_free_rate.unwrap_or(settings.risk_free_rate),
            trading_days_per_year: self.trading_days_per_year.unwrap_or(settings.trading_days),
        }
    }
}

pub fn run_simulate(
    args: SimulateArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sim_input = match (&args.weights, args.bucket) {
        (Some(spec), _) => with_settings(input::parse_weights(spec)?, settings),
        (None, Some(index)) => with_settings(model_portfolio_for_index(index)?, settings),
        (None, None) => input::read_input::<SimulationFile>(args.input.as_deref(), "simulation")?
            .into_input(settings),
    };
    if let Some(v) = args.initial_investment {
        sim_input.initial_investment = v;
    }
    if let Some(v) = args.risk_free_rate {
        sim_input.risk_free_rate = v;
    }
    if let Some(v) = args.trading_days {
        sim_input.trading_days_per_year = v;
    }

    let history = input::prices::read_prices(&args.prices)?;
    tracing::info!(
        positions = sim_input.allocation.len(),
        tickers = history.tickers().len(),
        "running simulation"
    );
    let result = simulate_portfolio(&sim_input, &history)?;
    Ok(serde_json::to_value(result)?)
}

fn with_settings(
    allocation: robo_advisor_core::Allocation,
    settings: &Settings,
) -> SimulationInput {
    SimulationInput {
        allocation,
        initial_investment: settings.initial_investment,
        risk_free_rate: settings.risk_free_rate,
        trading_days_per_year: settings.trading_days,
    }
}

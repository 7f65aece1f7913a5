use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use robo_advisor_core::analysis::comparison::{compare_allocations, NamedAllocation};
use robo_advisor_core::analysis::diversification::analyze_allocation;
use robo_advisor_core::analysis::rebalance::{plan_rebalance, RebalanceInput};
use robo_advisor_core::portfolio::models::{model_portfolio_for_index, RiskBucket};

use super::portfolio::AllocationArgs;
use crate::config::Settings;
use crate::input;

/// Arguments for diversification scoring
#[derive(Args)]
pub struct DiversifyArgs {
    #[command(flatten)]
    pub allocation: AllocationArgs,
}

/// Arguments for rebalancing suggestions
#[derive(Args)]
pub struct RebalanceArgs {
    /// Path to a JSON or YAML file with {current, target, threshold?}
    #[arg(long, conflicts_with_all = ["current", "target", "target_bucket"])]
    pub input: Option<String>,

    /// Current weights, e.g. "ACWI=0.5,AGG=0.5"
    #[arg(long, allow_hyphen_values = true)]
    pub current: Option<String>,

    /// Target weights
    #[arg(long, conflicts_with = "target_bucket", allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Use the model portfolio of this risk bucket (0-4) as the target
    #[arg(long)]
    pub target_bucket: Option<i64>,

    /// Drift (as a weight) that must be exceeded before a trade is suggested
    #[arg(long)]
    pub threshold: Option<Decimal>,
}

/// Arguments for comparing allocations side by side
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML file with {portfolios: [{name, allocations}, ...]}
    #[arg(long, conflicts_with_all = ["portfolio", "buckets"])]
    pub input: Option<String>,

    /// Named inline allocation, e.g. "Mío:ACWI=0.5,AGG=0.5" (repeatable)
    #[arg(long, allow_hyphen_values = true)]
    pub portfolio: Vec<String>,

    /// Add the model portfolios of these risk buckets, e.g. "0,2,4"
    #[arg(long, value_delimiter = ',')]
    pub buckets: Vec<i64>,
}

#[derive(Deserialize)]
struct CompareInput {
    portfolios: Vec<NamedAllocation>,
}

/// Parse `NAME:T=W,...`; without a name the entry is called after its position.
fn parse_named(
    spec: &str,
    position: usize,
) -> Result<NamedAllocation, Box<dyn std::error::Error>> {
    match spec.split_once(':') {
        Some((name, weights)) => Ok(NamedAllocation::new(
            name.trim(),
            input::parse_weights(weights)?,
        )),
        None => Ok(NamedAllocation::new(
            format!("Portfolio {position}"),
            input::parse_weights(spec)?,
        )),
    }
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolios = if args.portfolio.is_empty() && args.buckets.is_empty() {
        input::read_input::<CompareInput>(args.input.as_deref(), "the comparison")?.portfolios
    } else {
        let mut portfolios = Vec::with_capacity(args.portfolio.len() + args.buckets.len());
        for (i, spec) in args.portfolio.iter().enumerate() {
            portfolios.push(parse_named(spec, i + 1)?);
        }
        for &index in &args.buckets {
            let bucket = RiskBucket::from_index(index)?;
            portfolios.push(NamedAllocation::new(
                bucket.label(),
                model_portfolio_for_index(index)?,
            ));
        }
        portfolios
    };

    tracing::info!(count = portfolios.len(), "comparing allocations");
    let result = compare_allocations(&portfolios)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_diversify(args: DiversifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let allocation = args.allocation.load()?;
    let result = analyze_allocation(&allocation)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rebalance(
    args: RebalanceArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut rebalance_input = match args.current {
        Some(ref current) => {
            let target = match (&args.target, args.target_bucket) {
                (Some(spec), _) => input::parse_weights(spec)?,
                (None, Some(index)) => model_portfolio_for_index(index)?,
                (None, None) => return Err("Provide --target or --target-bucket".into()),
            };
            RebalanceInput {
                current: input::parse_weights(current)?,
                target,
                threshold: settings.rebalance_threshold,
            }
        }
        None => input::read_input(args.input.as_deref(), "rebalancing")?,
    };
    if let Some(threshold) = args.threshold {
        rebalance_input.threshold = threshold;
    }

    tracing::info!(threshold = %rebalance_input.threshold, "planning rebalance");
    let result = plan_rebalance(&rebalance_input)?;
    Ok(serde_json::to_value(result)?)
}

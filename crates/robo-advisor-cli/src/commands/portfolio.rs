use clap::Args;
use serde::Serialize;
use serde_json::Value;

use robo_advisor_core::portfolio::catalog::{self, AssetClass, EtfDescriptor, RiskTier};
use robo_advisor_core::portfolio::models::{model_portfolio, RiskBucket};
use robo_advisor_core::portfolio::validation::check_allocation;
use robo_advisor_core::portfolio::{holdings_breakdown, HoldingDetail};
use robo_advisor_core::Allocation;

use crate::input;

/// Arguments for model portfolio lookup
#[derive(Args)]
pub struct ModelArgs {
    /// Risk bucket index (0 = conservative .. 4 = aggressive)
    #[arg(long, conflicts_with = "score", required_unless_present = "score")]
    pub bucket: Option<i64>,

    /// Questionnaire score to place in a bucket instead of --bucket
    #[arg(long)]
    pub score: Option<u32>,
}

/// Arguments for the ETF catalog listing
#[derive(Args)]
pub struct CatalogArgs {
    /// Show a single ticker (case-insensitive)
    #[arg(long)]
    pub ticker: Option<String>,

    /// Filter by asset class: cash, bonds, equity, real-estate, commodity
    #[arg(long)]
    pub asset_class: Option<AssetClass>,

    /// Filter by risk tier: low, medium, medium-high, high
    #[arg(long)]
    pub risk_tier: Option<RiskTier>,
}

/// Arguments shared by commands that take one allocation
#[derive(Args)]
pub struct AllocationArgs {
    /// Path to a JSON or YAML object of ticker to weight
    #[arg(long, conflicts_with = "weights")]
    pub input: Option<String>,

    /// Inline weights, e.g. "BIL=0.3,AGG=0.5,ACWI=0.2"
    #[arg(long, allow_hyphen_values = true)]
    pub weights: Option<String>,
}

impl AllocationArgs {
    pub fn load(&self) -> Result<Allocation, Box<dyn std::error::Error>> {
        match &self.weights {
            Some(spec) => input::parse_weights(spec),
            None => input::read_input(self.input.as_deref(), "the allocation"),
        }
    }
}

/// Arguments for allocation validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub allocation: AllocationArgs,
}

#[derive(Debug, Serialize)]
struct ModelOutput {
    bucket: RiskBucket,
    label: &'static str,
    description: &'static str,
    score_range: (u32, u32),
    allocation: Allocation,
    holdings: Vec<HoldingDetail>,
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bucket = match (args.bucket, args.score) {
        (Some(index), _) => RiskBucket::from_index(index)?,
        (None, Some(score)) => RiskBucket::from_score(score),
        (None, None) => return Err("Provide --bucket or --score".into()),
    };
    let allocation = model_portfolio(bucket);
    let output = ModelOutput {
        bucket,
        label: bucket.label(),
        description: bucket.description(),
        score_range: bucket.score_range(),
        holdings: holdings_breakdown(&allocation),
        allocation,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref ticker) = args.ticker {
        let etf = catalog::lookup(ticker).ok_or_else(|| {
            format!(
                "Unknown ticker '{}'. Supported: {}",
                ticker,
                catalog::supported_tickers().join(", ")
            )
        })?;
        return Ok(serde_json::to_value(etf)?);
    }

    let etfs: Vec<&EtfDescriptor> = catalog::all_etfs()
        .iter()
        .filter(|e| args.asset_class.map_or(true, |c| e.asset_class == c))
        .filter(|e| args.risk_tier.map_or(true, |t| e.risk_tier == t))
        .collect();
    Ok(serde_json::to_value(etfs)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let allocation = args.allocation.load()?;
    let report = check_allocation(&allocation);
    if !report.result.is_valid {
        tracing::info!(violations = report.result.errors.len(), "allocation is invalid");
    }
    Ok(serde_json::to_value(report)?)
}

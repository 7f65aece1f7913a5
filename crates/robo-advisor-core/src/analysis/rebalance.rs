use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AdvisorError;
use crate::portfolio::allocation::Allocation;
use crate::portfolio::validation::ensure_valid;
use crate::types::*;
use crate::AdvisorResult;

/// Drift (in weight, not percent) below which no trade is suggested.
pub const DEFAULT_DRIFT_THRESHOLD: Weight = dec!(0.05);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebalanceAction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSuggestion {
    pub ticker: String,
    pub action: RebalanceAction,
    pub target_weight: Weight,
    pub current_weight: Weight,
    /// Size of the drift in percentage points (always positive; direction is `action`)
    pub delta_pct: Decimal,
}

/// Per-ticker trades that bring `current` back to `target`.
///
/// Walks `target` in insertion order. A ticker missing from `current` counts
/// as zero weight. Drift must strictly exceed `threshold` to be reported.
/// Tickers held in `current` but absent from `target` are not reported.
pub fn suggest_rebalance(
    current: &Allocation,
    target: &Allocation,
    threshold: Weight,
) -> Vec<RebalanceSuggestion> {
    target
        .iter()
        .filter_map(|(ticker, target_weight)| {
            let current_weight = current.weight_of(ticker);
            let delta = current_weight - target_weight;
            if delta.abs() <= threshold {
                return None;
            }
            let action = if delta > Decimal::ZERO {
                RebalanceAction::Decrease
            } else {
                RebalanceAction::Increase
            };
            Some(RebalanceSuggestion {
                ticker: ticker.to_string(),
                action,
                target_weight,
                current_weight,
                delta_pct: delta.abs() * dec!(100),
            })
        })
        .collect()
}

/// Input for a rebalancing plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceInput {
    pub current: Allocation,
    pub target: Allocation,
    #[serde(default = "default_threshold")]
    pub threshold: Weight,
}

fn default_threshold() -> Weight {
    DEFAULT_DRIFT_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub suggestions: Vec<RebalanceSuggestion>,
    pub needs_rebalance: bool,
    /// Largest absolute drift over the target's tickers
    pub max_drift: Weight,
    pub threshold: Weight,
}

/// Validate both allocations and compute the rebalancing suggestions.
pub fn plan_rebalance(input: &RebalanceInput) -> AdvisorResult<ComputationOutput<RebalancePlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.threshold < Decimal::ZERO || input.threshold > Decimal::ONE {
        return Err(AdvisorError::InvalidInput {
            field: "threshold".into(),
            reason: "Must be between 0 and 1".into(),
        });
    }
    ensure_valid(&input.current)?;
    ensure_valid(&input.target)?;

    for ticker in input.current.tickers() {
        if !input.target.contains(ticker) && input.current.weight_of(ticker) > Decimal::ZERO {
            warnings.push(format!(
                "{ticker} is held but not part of the target; it is not covered by the suggestions"
            ));
        }
    }

    let suggestions = suggest_rebalance(&input.current, &input.target, input.threshold);
    let max_drift = input
        .target
        .iter()
        .map(|(t, w)| (input.current.weight_of(t) - w).abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    tracing::debug!(
        suggestions = suggestions.len(),
        max_drift = %max_drift,
        "rebalance planned"
    );

    let output = RebalancePlan {
        needs_rebalance: !suggestions.is_empty(),
        suggestions,
        max_drift,
        threshold: input.threshold,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Target-driven drift check against threshold",
        &serde_json::json!({
            "threshold": input.threshold.to_string(),
            "boundary": "exclusive",
        }),
        warnings,
        elapsed,
        output,
    ))
}

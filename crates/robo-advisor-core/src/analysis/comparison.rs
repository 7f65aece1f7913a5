//! Side-by-side comparison of several allocations.
//!
//! Unlike `analyze_allocation`, an invalid allocation does not fail the call:
//! it is reported with its violations and left unscored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::diversification::{score_diversification, DiversificationReport};
use crate::error::{AdvisorError, ValidationError};
use crate::portfolio::allocation::Allocation;
use crate::portfolio::catalog::AssetClass;
use crate::portfolio::validation::validate;
use crate::types::*;
use crate::AdvisorResult;

pub const MIN_ALLOCATIONS: usize = 2;
const UNNAMED: &str = "Portfolio sin nombre";

fn default_name() -> String {
    UNNAMED.to_string()
}

/// An allocation with a display name. Accepts `allocations` as the key for
/// the weights map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAllocation {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(alias = "allocations")]
    pub allocation: Allocation,
}

impl NamedAllocation {
    pub fn new(name: impl Into<String>, allocation: Allocation) -> Self {
        NamedAllocation {
            name: name.into(),
            allocation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparedAllocation {
    pub name: String,
    pub allocation: Allocation,
    pub is_valid: bool,
    pub validation_errors: Vec<ValidationError>,
    /// Present only for valid allocations
    pub diversification: Option<DiversificationReport>,
    pub asset_breakdown: BTreeMap<AssetClass, Weight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub portfolios: Vec<ComparedAllocation>,
    pub comparison_count: usize,
    /// Name of the valid allocation with the highest diversification score.
    /// Ties go to the earlier entry.
    pub most_diversified: Option<String>,
}

fn compare_one(named: &NamedAllocation) -> ComparedAllocation {
    match validate(&named.allocation) {
        Ok(()) => {
            let report = score_diversification(&named.allocation);
            ComparedAllocation {
                name: named.name.clone(),
                allocation: named.allocation.clone(),
                is_valid: true,
                validation_errors: Vec::new(),
                asset_breakdown: report.breakdown.clone(),
                diversification: Some(report),
            }
        }
        Err(errors) => ComparedAllocation {
            name: named.name.clone(),
            allocation: named.allocation.clone(),
            is_valid: false,
            validation_errors: errors,
            diversification: None,
            asset_breakdown: BTreeMap::new(),
        },
    }
}

/// Validate and score each allocation, in input order.
///
/// Needs at least two entries. Invalid entries are kept in the output with
/// their violations and a warning.
pub fn compare_allocations(
    allocations: &[NamedAllocation],
) -> AdvisorResult<ComputationOutput<Comparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if allocations.len() < MIN_ALLOCATIONS {
        return Err(AdvisorError::InvalidInput {
            field: "portfolios".into(),
            reason: format!("At least {MIN_ALLOCATIONS} allocations are required to compare"),
        });
    }

    let portfolios: Vec<ComparedAllocation> = allocations.iter().map(compare_one).collect();

    for p in portfolios.iter().filter(|p| !p.is_valid) {
        warnings.push(format!(
            "{} is not a valid allocation ({} violations); it was not scored",
            p.name,
            p.validation_errors.len()
        ));
    }

    let mut most_diversified: Option<(&str, Decimal)> = None;
    for p in &portfolios {
        if let Some(report) = &p.diversification {
            if most_diversified.map_or(true, |(_, best)| report.score > best) {
                most_diversified = Some((p.name.as_str(), report.score));
            }
        }
    }
    let most_diversified = most_diversified.map(|(name, _)| name.to_string());

    tracing::debug!(
        count = portfolios.len(),
        invalid = warnings.len(),
        "allocations compared"
    );

    let output = Comparison {
        comparison_count: portfolios.len(),
        portfolios,
        most_diversified,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-allocation validation and diversification score",
        &serde_json::json!({
            "min_allocations": MIN_ALLOCATIONS,
            "scored": "valid allocations only",
        }),
        warnings,
        elapsed,
        output,
    ))
}

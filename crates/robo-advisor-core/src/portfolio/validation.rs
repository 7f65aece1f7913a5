use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::allocation::{Allocation, SUM_TOLERANCE};
use super::catalog;
use crate::error::{AdvisorError, ValidationError};
use crate::types::*;
use crate::AdvisorResult;

/// Check an allocation against the catalog and the weight rules.
///
/// Every rule runs: unknown tickers, negative weights, weights above one and
/// the sum check. The caller receives the full list of violations so it can
/// present one complete correction list.
pub fn validate(allocation: &Allocation) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for ticker in allocation.tickers() {
        if !catalog::is_supported(ticker) {
            errors.push(ValidationError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }
    }

    for (ticker, weight) in allocation.iter() {
        if weight < Decimal::ZERO {
            errors.push(ValidationError::NegativeWeight {
                ticker: ticker.to_string(),
                weight,
            });
        }
    }

    for (ticker, weight) in allocation.iter() {
        if weight > Decimal::ONE {
            errors.push(ValidationError::WeightOverOne {
                ticker: ticker.to_string(),
                weight,
            });
        }
    }

    if !allocation.is_balanced() {
        errors.push(ValidationError::SumMismatch {
            actual_sum: allocation.total_weight(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Gate used by the pipeline functions: refuse an invalid allocation with
/// every violation attached.
pub fn ensure_valid(allocation: &Allocation) -> AdvisorResult<()> {
    validate(allocation).map_err(AdvisorError::InvalidAllocation)
}

/// Validation outcome in report form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub total_weight: Weight,
    pub num_positions: usize,
    pub errors: Vec<ValidationError>,
}

/// Validate an allocation and report the outcome. Invalid input is a normal
/// result here, not an error.
pub fn check_allocation(allocation: &Allocation) -> ComputationOutput<ValidationReport> {
    let start = Instant::now();

    let errors = validate(allocation).err().unwrap_or_default();
    tracing::debug!(
        positions = allocation.len(),
        violations = errors.len(),
        "allocation checked"
    );

    let report = ValidationReport {
        is_valid: errors.is_empty(),
        total_weight: allocation.total_weight(),
        num_positions: allocation.len(),
        errors,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Allocation validation (catalog tickers, weight bounds, sum to one)",
        &serde_json::json!({
            "sum_tolerance": SUM_TOLERANCE.to_string(),
            "supported_tickers": catalog::supported_tickers(),
        }),
        Vec::new(),
        elapsed,
        report,
    )
}

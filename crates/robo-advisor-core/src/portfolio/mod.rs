pub mod allocation;
pub mod catalog;
pub mod models;
pub mod validation;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Weight;
use allocation::Allocation;
use catalog::EtfDescriptor;

/// One position of an allocation joined with its catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingDetail {
    pub ticker: String,
    pub weight: Weight,
    /// Weight expressed in percent (0.30 -> 30)
    pub weight_pct: Weight,
    /// None for tickers outside the catalog
    pub etf: Option<EtfDescriptor>,
}

/// Positions of `allocation` sorted by weight, largest first. Ties keep the
/// allocation's own order.
pub fn holdings_breakdown(allocation: &Allocation) -> Vec<HoldingDetail> {
    let mut rows: Vec<HoldingDetail> = allocation
        .iter()
        .map(|(ticker, weight)| HoldingDetail {
            ticker: ticker.to_string(),
            weight,
            weight_pct: weight * dec!(100),
            etf: catalog::get(ticker).cloned(),
        })
        .collect();
    rows.sort_by(|a, b| b.weight.cmp(&a.weight));
    rows
}

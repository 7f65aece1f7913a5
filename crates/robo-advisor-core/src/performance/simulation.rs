//! Historical back-test of an allocation.
//!
//! Closing prices are aligned on the dates every held ticker trades. Each day
//! the portfolio earns the weighted sum of its assets' returns (weights are
//! restored daily), and the value path compounds from the initial investment.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use super::provider::PriceHistoryProvider;
use crate::error::AdvisorError;
use crate::portfolio::allocation::Allocation;
use crate::portfolio::validation::ensure_valid;
use crate::types::*;
use crate::AdvisorResult;

pub const DEFAULT_INITIAL_INVESTMENT: Money = dec!(10000);
pub const DEFAULT_RISK_FREE_RATE: Rate = dec!(0.02);
pub const DEFAULT_TRADING_DAYS: u32 = 252;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub allocation: Allocation,
    #[serde(default = "default_initial_investment")]
    pub initial_investment: Money,
    /// Annual risk-free rate used for the Sharpe ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Rate,
    #[serde(default = "default_trading_days")]
    pub trading_days_per_year: u32,
}

fn default_initial_investment() -> Money {
    DEFAULT_INITIAL_INVESTMENT
}

fn default_risk_free_rate() -> Rate {
    DEFAULT_RISK_FREE_RATE
}

fn default_trading_days() -> u32 {
    DEFAULT_TRADING_DAYS
}

impl SimulationInput {
    pub fn new(allocation: Allocation) -> Self {
        SimulationInput {
            allocation,
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: DEFAULT_TRADING_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyReturn {
    pub year: i32,
    pub return_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub observations: usize,
    pub initial_investment: Money,
    pub final_value: Money,
    pub total_return: Rate,
    pub annualised_return: Rate,
    pub annualised_volatility: Rate,
    pub sharpe_ratio: Decimal,
    /// Largest peak-to-trough fall, as a positive fraction of the peak
    pub max_drawdown: Rate,
    pub yearly_returns: Vec<YearlyReturn>,
    pub value_series: Vec<ValuePoint>,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Back-test `input.allocation` against the prices served by `provider`.
pub fn simulate_portfolio(
    input: &SimulationInput,
    provider: &impl PriceHistoryProvider,
) -> AdvisorResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.initial_investment <= Decimal::ZERO {
        return Err(AdvisorError::InvalidInput {
            field: "initial_investment".into(),
            reason: "Must be positive".into(),
        });
    }
    if input.trading_days_per_year == 0 {
        return Err(AdvisorError::InvalidInput {
            field: "trading_days_per_year".into(),
            reason: "Must be positive".into(),
        });
    }
    ensure_valid(&input.allocation)?;

    let positions: Vec<(&str, Weight)> = input
        .allocation
        .iter()
        .filter(|(_, w)| *w > Decimal::ZERO)
        .collect();

    let mut prices: Vec<BTreeMap<NaiveDate, Money>> = Vec::with_capacity(positions.len());
    for (ticker, _) in &positions {
        let mut by_date = BTreeMap::new();
        for point in provider.closing_prices(ticker)? {
            if point.close <= Decimal::ZERO {
                return Err(AdvisorError::InvalidInput {
                    field: "prices".into(),
                    reason: format!("Non-positive close for {ticker} on {}", point.date),
                });
            }
            by_date.insert(point.date, point.close);
        }
        prices.push(by_date);
    }

    let common_dates = common_dates(&prices);
    if common_dates.len() < 2 {
        return Err(AdvisorError::InsufficientData(
            "At least 2 common price dates are required across the held tickers".into(),
        ));
    }
    let dropped: usize = prices
        .iter()
        .map(|p| p.len() - common_dates.len())
        .max()
        .unwrap_or(0);
    if dropped > 0 {
        warnings.push(format!(
            "Up to {dropped} price observations dropped to align tickers on common dates"
        ));
    }

    // Daily portfolio returns
    let mut daily_returns: Vec<Rate> = Vec::with_capacity(common_dates.len() - 1);
    for pair in common_dates.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let mut r = Decimal::ZERO;
        for ((_, weight), series) in positions.iter().zip(&prices) {
            let p0 = series[&prev];
            let p1 = series[&curr];
            r += *weight * (p1 / p0 - Decimal::ONE);
        }
        daily_returns.push(r);
    }

    // Value path
    let mut value_series = Vec::with_capacity(common_dates.len());
    let mut value = input.initial_investment;
    value_series.push(ValuePoint {
        date: common_dates[0],
        value,
    });
    for (date, r) in common_dates.iter().skip(1).zip(&daily_returns) {
        value *= Decimal::ONE + r;
        value_series.push(ValuePoint { date: *date, value });
    }

    let final_value = value;
    let growth = final_value / input.initial_investment;
    let total_return = growth - Decimal::ONE;

    let trading_days = Decimal::from(input.trading_days_per_year);
    let years = Decimal::from(value_series.len() as u64) / trading_days;
    let annualised_return = if growth <= Decimal::ZERO {
        dec!(-1)
    } else {
        match growth.checked_powd(Decimal::ONE / years) {
            Some(g) => g - Decimal::ONE,
            None => {
                warnings.push("Annualised return overflowed; reported as total return".into());
                total_return
            }
        }
    };

    let annualised_volatility = sample_std_dev(&daily_returns) * sqrt_decimal(trading_days);
    if daily_returns.len() < 2 {
        warnings.push("Fewer than 2 daily returns: volatility reported as zero".into());
    }

    let sharpe_ratio = if annualised_volatility.is_zero() {
        Decimal::ZERO
    } else {
        (annualised_return - input.risk_free_rate) / annualised_volatility
    };

    let max_drawdown = max_drawdown(&value_series);
    let yearly_returns = yearly_returns(&value_series);

    tracing::debug!(
        observations = value_series.len(),
        final_value = %final_value,
        "portfolio simulated"
    );

    let output = SimulationOutput {
        start_date: common_dates[0],
        end_date: common_dates[common_dates.len() - 1],
        observations: value_series.len(),
        initial_investment: input.initial_investment,
        final_value,
        total_return,
        annualised_return,
        annualised_volatility,
        sharpe_ratio,
        max_drawdown,
        yearly_returns,
        value_series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Historical simulation (daily-rebalanced weights, compounded value path)",
        &serde_json::json!({
            "initial_investment": input.initial_investment.to_string(),
            "risk_free_rate": input.risk_free_rate.to_string(),
            "trading_days_per_year": input.trading_days_per_year,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Dates present in every series, ascending.
fn common_dates(prices: &[BTreeMap<NaiveDate, Money>]) -> Vec<NaiveDate> {
    let mut iter = prices.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut dates: BTreeSet<NaiveDate> = first.keys().copied().collect();
    for series in iter {
        dates.retain(|d| series.contains_key(d));
    }
    dates.into_iter().collect()
}

fn sample_std_dev(values: &[Decimal]) -> Decimal {
    let n = values.len();
    if n < 2 {
        return Decimal::ZERO;
    }
    let mean: Decimal = values.iter().sum::<Decimal>() / Decimal::from(n as u64);
    let sum_sq: Decimal = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    sqrt_decimal(sum_sq / Decimal::from((n - 1) as u64))
}

fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}

fn max_drawdown(series: &[ValuePoint]) -> Rate {
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;
    for point in series {
        if point.value > peak {
            peak = point.value;
        }
        if !peak.is_zero() {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Change in year-end value versus the previous year-end. The first year in
/// the series has no predecessor and is skipped.
fn yearly_returns(series: &[ValuePoint]) -> Vec<YearlyReturn> {
    let mut year_end: BTreeMap<i32, Money> = BTreeMap::new();
    for point in series {
        year_end.insert(point.date.year(), point.value);
    }
    let ends: Vec<(i32, Money)> = year_end.into_iter().collect();
    ends.windows(2)
        .filter(|w| !w[0].1.is_zero())
        .map(|w| YearlyReturn {
            year: w[1].0,
            return_rate: w[1].1 / w[0].1 - Decimal::ONE,
        })
        .collect()
}

//! Defaults that can be overridden from the environment (or a `.env` file).
//! Explicit command-line flags always win over these.

use rust_decimal::Decimal;
use std::str::FromStr;

use robo_advisor_core::analysis::rebalance::DEFAULT_DRIFT_THRESHOLD;
use robo_advisor_core::performance::simulation::{
    DEFAULT_INITIAL_INVESTMENT, DEFAULT_RISK_FREE_RATE, DEFAULT_TRADING_DAYS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rebalance_threshold: Decimal,
    pub risk_free_rate: Decimal,
    pub initial_investment: Decimal,
    pub trading_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rebalance_threshold: DEFAULT_DRIFT_THRESHOLD,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            trading_days: DEFAULT_TRADING_DAYS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut out = Self::default();

        if let Some(v) = parse_var(&lookup, "RBA_REBALANCE_THRESHOLD")? {
            out.rebalance_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "RBA_RISK_FREE_RATE")? {
            out.risk_free_rate = v;
        }
        if let Some(v) = parse_var(&lookup, "RBA_INITIAL_INVESTMENT")? {
            out.initial_investment = v;
        }
        if let Some(v) = parse_var(&lookup, "RBA_TRADING_DAYS")? {
            out.trading_days = v;
        }

        Ok(out)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("{key}='{raw}' is not valid: {e}").into()),
    }
}

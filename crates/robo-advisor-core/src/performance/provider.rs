use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::AdvisorError;
use crate::types::Money;
use crate::AdvisorResult;

/// One closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Money,
}

/// Closing prices for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

/// Source of historical closing prices.
///
/// Implementations return the observations for `ticker` sorted by date,
/// or an error when the ticker has no history.
pub trait PriceHistoryProvider {
    fn closing_prices(&self, ticker: &str) -> AdvisorResult<Vec<PricePoint>>;
}

/// Provider backed by price series already loaded in memory (files, tests).
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceHistory {
    series: HashMap<String, Vec<PricePoint>>,
}

impl InMemoryPriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append observations for `ticker`. Later points for the same date
    /// overwrite earlier ones when prices are read back.
    pub fn insert(
        &mut self,
        ticker: impl Into<String>,
        points: impl IntoIterator<Item = PricePoint>,
    ) {
        self.series.entry(ticker.into()).or_default().extend(points);
    }

    pub fn from_series(series: Vec<PriceSeries>) -> Self {
        let mut history = Self::new();
        for s in series {
            history.insert(s.ticker, s.points);
        }
        history
    }

    pub fn tickers(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = self.series.keys().map(String::as_str).collect();
        tickers.sort_unstable();
        tickers
    }
}

impl PriceHistoryProvider for InMemoryPriceHistory {
    fn closing_prices(&self, ticker: &str) -> AdvisorResult<Vec<PricePoint>> {
        let points = self
            .series
            .get(ticker)
            .ok_or_else(|| AdvisorError::InvalidInput {
                field: "prices".into(),
                reason: format!("No price history for {ticker}"),
            })?;
        let mut sorted = points.clone();
        // Stable sort keeps insertion order within a date; dedup keeps the last.
        sorted.sort_by_key(|p| p.date);
        sorted.reverse();
        sorted.dedup_by_key(|p| p.date);
        sorted.reverse();
        Ok(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn point(d: u32, close: Money) -> PricePoint {
        PricePoint {
            date: day(d),
            close,
        }
    }

    #[test]
    fn test_prices_come_back_sorted() {
        let mut h = InMemoryPriceHistory::new();
        h.insert(
            "ACWI",
            vec![
                point(3, dec!(102)),
                point(1, dec!(100)),
                point(2, dec!(101)),
            ],
        );
        let dates: Vec<NaiveDate> = h
            .closing_prices("ACWI")
            .unwrap()
            .iter()
            .map(|p| p.date)
            .collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn test_duplicate_date_keeps_latest_insert() {
        let mut h = InMemoryPriceHistory::new();
        h.insert("GLD", vec![point(1, dec!(10))]);
        h.insert("GLD", vec![point(1, dec!(11))]);
        let prices = h.closing_prices("GLD").unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].close, dec!(11));
    }

    #[test]
    fn test_unknown_ticker_errors() {
        let h = InMemoryPriceHistory::new();
        assert!(h.closing_prices("VNQ").is_err());
    }
}

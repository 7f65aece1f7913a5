use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::types::Weight;

/// Tolerance used when checking that weights add up to 1.0.
pub const SUM_TOLERANCE: Decimal = dec!(0.001);

/// Ticker -> weight mapping that keeps insertion order.
///
/// Serialises as a JSON object (`{"ACWI": "0.8", ...}`). Deserialisation keeps
/// the key order of the document and rejects repeated tickers. An allocation
/// may be invalid (mid-edit, user supplied); see `portfolio::validation`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    holdings: Vec<(String, Weight)>,
}

impl Allocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of `ticker`, replacing an existing entry in place.
    pub fn insert(&mut self, ticker: impl Into<String>, weight: Weight) {
        let ticker = ticker.into();
        match self.holdings.iter_mut().find(|(t, _)| *t == ticker) {
            Some(slot) => slot.1 = weight,
            None => self.holdings.push((ticker, weight)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, ticker: impl Into<String>, weight: Weight) -> Self {
        self.insert(ticker, weight);
        self
    }

    pub fn get(&self, ticker: &str) -> Option<Weight> {
        self.holdings
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, w)| *w)
    }

    /// Weight of `ticker`, treating an absent ticker as zero.
    pub fn weight_of(&self, ticker: &str) -> Weight {
        self.get(ticker).unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Weight)> + '_ {
        self.holdings.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> + '_ {
        self.holdings.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Sum of the weights, or `None` when it overflows `Decimal`.
    pub fn checked_total_weight(&self) -> Option<Weight> {
        self.holdings
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, w)| acc.checked_add(*w))
    }

    /// Sum of the weights, saturating at `Decimal::MAX` / `Decimal::MIN`.
    pub fn total_weight(&self) -> Weight {
        self.holdings
            .iter()
            .fold(Decimal::ZERO, |acc, (_, w)| acc.saturating_add(*w))
    }

    /// Whether the weights add up to 1.0 within `SUM_TOLERANCE`.
    pub fn is_balanced(&self) -> bool {
        self.checked_total_weight()
            .and_then(|total| total.checked_sub(Decimal::ONE))
            .is_some_and(|diff| diff.abs() <= SUM_TOLERANCE)
    }

    /// Largest single position weight, zero for an empty allocation.
    pub fn max_weight(&self) -> Weight {
        self.holdings
            .iter()
            .map(|(_, w)| *w)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl<S: Into<String>> FromIterator<(S, Weight)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (S, Weight)>>(iter: I) -> Self {
        let mut allocation = Allocation::new();
        for (ticker, weight) in iter {
            allocation.insert(ticker, weight);
        }
        allocation
    }
}

impl Serialize for Allocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.holdings.len()))?;
        for (ticker, weight) in &self.holdings {
            map.serialize_entry(ticker, weight)?;
        }
        map.end()
    }
}

struct AllocationVisitor;

impl<'de> Visitor<'de> for AllocationVisitor {
    type Value = Allocation;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of ticker to weight")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Allocation, A::Error> {
        let mut holdings: Vec<(String, Weight)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((ticker, weight)) = access.next_entry::<String, Weight>()? {
            if holdings.iter().any(|(t, _)| *t == ticker) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate ticker '{ticker}' in allocation"
                )));
            }
            holdings.push((ticker, weight));
        }
        Ok(Allocation { holdings })
    }
}

impl<'de> Deserialize<'de> for Allocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AllocationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut a = Allocation::new();
        a.insert("ACWI", dec!(0.5));
        a.insert("AGG", dec!(0.3));
        a.insert("ACWI", dec!(0.7));
        let tickers: Vec<&str> = a.tickers().collect();
        assert_eq!(tickers, vec!["ACWI", "AGG"]);
        assert_eq!(a.get("ACWI"), Some(dec!(0.7)));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_weight_of_absent_is_zero() {
        let a = Allocation::new().with("ACWI", dec!(1.0));
        assert_eq!(a.weight_of("BIL"), Decimal::ZERO);
        assert!(!a.contains("BIL"));
    }

    #[test]
    fn test_is_balanced_tolerance() {
        let a = Allocation::new().with("ACWI", dec!(0.5)).with("AGG", dec!(0.4995));
        assert!(a.is_balanced());
        let b = Allocation::new().with("ACWI", dec!(0.5)).with("AGG", dec!(0.498));
        assert!(!b.is_balanced());
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let a: Allocation =
            serde_json::from_str(r#"{"VNQ": 0.15, "ACWI": "0.80", "GLD": 0.05}"#).unwrap();
        let tickers: Vec<&str> = a.tickers().collect();
        assert_eq!(tickers, vec!["VNQ", "ACWI", "GLD"]);
        assert_eq!(a.get("ACWI"), Some(dec!(0.80)));
        assert!(a.is_balanced());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ticker() {
        let res: Result<Allocation, _> = serde_json::from_str(r#"{"ACWI": 0.5, "ACWI": 0.5}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_serialize_as_object() {
        let a = Allocation::new().with("ACWI", dec!(0.8)).with("GLD", dec!(0.2));
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"ACWI":"0.8","GLD":"0.2"}"#);
    }

    #[test]
    fn test_total_weight_saturates_on_overflow() {
        let a = Allocation::new()
            .with("BIL", Decimal::MAX)
            .with("AGG", Decimal::MAX);
        assert_eq!(a.checked_total_weight(), None);
        assert_eq!(a.total_weight(), Decimal::MAX);
        assert!(!a.is_balanced());

        let b = Allocation::new()
            .with("BIL", Decimal::MIN)
            .with("AGG", Decimal::MIN);
        assert_eq!(b.total_weight(), Decimal::MIN);
        assert!(!b.is_balanced());
    }

    #[test]
    fn test_max_weight() {
        let a: Allocation = vec![("BIL", dec!(0.1)), ("ACWI", dec!(0.9))]
            .into_iter()
            .collect();
        assert_eq!(a.max_weight(), dec!(0.9));
        assert_eq!(Allocation::new().max_weight(), Decimal::ZERO);
    }
}

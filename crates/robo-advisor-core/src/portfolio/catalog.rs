//! Static reference data for the supported ETF universe.
//!
//! The catalog is built once on first access and never mutated afterwards,
//! so lookups are safe from any thread without synchronisation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::types::Rate;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Coarse category of an ETF's underlying exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    Cash,
    Bonds,
    Equity,
    RealEstate,
    Commodity,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Cash,
        AssetClass::Bonds,
        AssetClass::Equity,
        AssetClass::RealEstate,
        AssetClass::Commodity,
    ];
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Cash => write!(f, "Cash"),
            AssetClass::Bonds => write!(f, "Bonds"),
            AssetClass::Equity => write!(f, "Equity"),
            AssetClass::RealEstate => write!(f, "RealEstate"),
            AssetClass::Commodity => write!(f, "Commodity"),
        }
    }
}

impl std::str::FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cash" => Ok(AssetClass::Cash),
            "bonds" | "bond" => Ok(AssetClass::Bonds),
            "equity" | "equities" => Ok(AssetClass::Equity),
            "realestate" | "reits" => Ok(AssetClass::RealEstate),
            "commodity" | "commodities" => Ok(AssetClass::Commodity),
            _ => Err(format!(
                "Unknown asset class '{s}'. Use: cash, bonds, equity, real-estate, commodity"
            )),
        }
    }
}

/// Relative risk level of a single fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::MediumHigh => write!(f, "MediumHigh"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "mediumhigh" => Ok(RiskTier::MediumHigh),
            "high" => Ok(RiskTier::High),
            _ => Err(format!(
                "Unknown risk tier '{s}'. Use: low, medium, medium-high, high"
            )),
        }
    }
}

/// Descriptive record for one supported ETF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfDescriptor {
    pub ticker: String,
    pub name: String,
    pub description: String,
    pub asset_class: AssetClass,
    pub risk_tier: RiskTier,
    /// Expected annual return band, e.g. "3-5% anual"
    pub expected_return: String,
    /// Annual expense ratio as a decimal (0.0003 = 0.03%)
    pub expense_ratio: Rate,
    pub inception_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

static CATALOG: OnceLock<Vec<EtfDescriptor>> = OnceLock::new();

#[allow(clippy::too_many_arguments)]
fn descriptor(
    ticker: &str,
    name: &str,
    description: &str,
    asset_class: AssetClass,
    risk_tier: RiskTier,
    expected_return: &str,
    expense_ratio: Decimal,
    inception: (i32, u32, u32),
) -> EtfDescriptor {
    EtfDescriptor {
        ticker: ticker.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        asset_class,
        risk_tier,
        expected_return: expected_return.to_string(),
        expense_ratio,
        inception_date: NaiveDate::from_ymd_opt(inception.0, inception.1, inception.2),
    }
}

fn build_catalog() -> Vec<EtfDescriptor> {
    vec![
        descriptor(
            "BIL",
            "SPDR Bloomberg 1-3 Month T-Bill ETF",
            "ETF de bonos del tesoro de muy corto plazo (1-3 meses)",
            AssetClass::Cash,
            RiskTier::Low,
            "2-4% anual",
            dec!(0.001355),
            (2007, 5, 25),
        ),
        descriptor(
            "AGG",
            "iShares Core U.S. Aggregate Bond ETF",
            "Bonos del gobierno y corporativos de EE.UU. con grado de inversión",
            AssetClass::Bonds,
            RiskTier::Low,
            "3-5% anual",
            dec!(0.0003),
            (2003, 9, 22),
        ),
        descriptor(
            "ACWI",
            "iShares MSCI ACWI ETF",
            "Acciones globales de mercados desarrollados y emergentes",
            AssetClass::Equity,
            RiskTier::MediumHigh,
            "7-10% anual",
            dec!(0.0032),
            (2008, 3, 26),
        ),
        descriptor(
            "VNQ",
            "Vanguard Real Estate ETF",
            "Bienes raíces comerciales y residenciales de EE.UU.",
            AssetClass::RealEstate,
            RiskTier::MediumHigh,
            "6-9% anual",
            dec!(0.0012),
            (2004, 9, 23),
        ),
        descriptor(
            "GLD",
            "SPDR Gold Shares",
            "Oro físico, protección contra inflación y crisis",
            AssetClass::Commodity,
            RiskTier::Medium,
            "Variable",
            dec!(0.0040),
            (2004, 11, 18),
        ),
    ]
}

/// Every supported ETF, in catalog order.
pub fn all_etfs() -> &'static [EtfDescriptor] {
    CATALOG.get_or_init(build_catalog)
}

/// Exact-match lookup by ticker.
pub fn get(ticker: &str) -> Option<&'static EtfDescriptor> {
    all_etfs().iter().find(|e| e.ticker == ticker)
}

/// Case-insensitive lookup, for user-typed tickers.
pub fn lookup(ticker: &str) -> Option<&'static EtfDescriptor> {
    let wanted = ticker.trim();
    all_etfs()
        .iter()
        .find(|e| e.ticker.eq_ignore_ascii_case(wanted))
}

pub fn is_supported(ticker: &str) -> bool {
    get(ticker).is_some()
}

pub fn asset_class_of(ticker: &str) -> Option<AssetClass> {
    get(ticker).map(|e| e.asset_class)
}

pub fn supported_tickers() -> Vec<&'static str> {
    all_etfs().iter().map(|e| e.ticker.as_str()).collect()
}

pub fn by_asset_class(class: AssetClass) -> Vec<&'static EtfDescriptor> {
    all_etfs().iter().filter(|e| e.asset_class == class).collect()
}

pub fn by_risk_tier(tier: RiskTier) -> Vec<&'static EtfDescriptor> {
    all_etfs().iter().filter(|e| e.risk_tier == tier).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_unique_tickers() {
        let mut tickers = supported_tickers();
        assert_eq!(tickers.len(), 5);
        tickers.sort();
        tickers.dedup();
        assert_eq!(tickers.len(), 5);
    }

    #[test]
    fn test_asset_classes() {
        assert_eq!(asset_class_of("BIL"), Some(AssetClass::Cash));
        assert_eq!(asset_class_of("AGG"), Some(AssetClass::Bonds));
        assert_eq!(asset_class_of("ACWI"), Some(AssetClass::Equity));
        assert_eq!(asset_class_of("VNQ"), Some(AssetClass::RealEstate));
        assert_eq!(asset_class_of("GLD"), Some(AssetClass::Commodity));
        assert_eq!(asset_class_of("XYZ"), None);
    }

    #[test]
    fn test_get_is_case_sensitive_lookup_is_not() {
        assert!(get("acwi").is_none());
        assert_eq!(lookup(" acwi ").map(|e| e.ticker.as_str()), Some("ACWI"));
    }

    #[test]
    fn test_filters() {
        let low: Vec<&str> = by_risk_tier(RiskTier::Low)
            .iter()
            .map(|e| e.ticker.as_str())
            .collect();
        assert_eq!(low, vec!["BIL", "AGG"]);
        assert!(by_risk_tier(RiskTier::High).is_empty());
        assert_eq!(by_asset_class(AssetClass::Equity).len(), 1);
    }

    #[test]
    fn test_inception_dates_parse() {
        assert!(all_etfs().iter().all(|e| e.inception_date.is_some()));
    }

    #[test]
    fn test_parse_asset_class_and_tier() {
        assert_eq!("real-estate".parse::<AssetClass>(), Ok(AssetClass::RealEstate));
        assert_eq!("Medium_High".parse::<RiskTier>(), Ok(RiskTier::MediumHigh));
        assert!("crypto".parse::<AssetClass>().is_err());
    }
}

//! Diversification scoring.
//!
//! Score = min(classes x 20, 60) + max(0, 40 - (max_concentration - 0.4) x 100),
//! clamped to [0, 100]. Spreading across up to three asset classes earns the
//! first component; any class above 40% of the portfolio eats into the second.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use crate::portfolio::allocation::Allocation;
use crate::portfolio::catalog::{self, AssetClass};
use crate::portfolio::validation::ensure_valid;
use crate::portfolio::{holdings_breakdown, HoldingDetail};
use crate::types::*;
use crate::AdvisorResult;

const POINTS_PER_CLASS: Decimal = dec!(20);
const CLASS_POINTS_CAP: Decimal = dec!(60);
const CONCENTRATION_BUDGET: Decimal = dec!(40);
const CONCENTRATION_THRESHOLD: Weight = dec!(0.4);
const MISSING_CLASS_TRIGGER: Weight = dec!(0.10);
const CONCENTRATED_POSITION: Weight = dec!(0.6);
const SMALL_POSITION: Weight = dec!(0.05);
const MAX_SMALL_POSITIONS: usize = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The rule that produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationRule {
    AddEquity,
    AddBonds,
    TooConcentrated,
    ConsolidateSmallPositions,
}

impl RecommendationRule {
    pub fn message(self) -> &'static str {
        match self {
            RecommendationRule::AddEquity => {
                "Considere agregar exposición a acciones para crecimiento a largo plazo"
            }
            RecommendationRule::AddBonds => "Considere agregar bonos para estabilidad y ingresos",
            RecommendationRule::TooConcentrated => {
                "Portafolio muy concentrado. Considere diversificar más"
            }
            RecommendationRule::ConsolidateSmallPositions => {
                "Muchas posiciones pequeñas. Considere consolidar"
            }
        }
    }
}

impl fmt::Display for RecommendationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule: RecommendationRule,
    pub message: String,
}

impl From<RecommendationRule> for Recommendation {
    fn from(rule: RecommendationRule) -> Self {
        Recommendation {
            rule,
            message: rule.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversificationReport {
    /// Heuristic score in [0, 100]
    pub score: Decimal,
    /// Aggregated weight per asset class
    pub breakdown: BTreeMap<AssetClass, Weight>,
    /// Largest aggregated asset-class weight
    pub max_concentration: Weight,
    pub num_asset_classes: usize,
    pub total_positions: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Validated allocation with position detail and diversification report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationAnalysis {
    pub total_weight: Weight,
    pub holdings: Vec<HoldingDetail>,
    pub diversification: DiversificationReport,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Weight per asset class. Tickers outside the catalog are skipped.
pub fn asset_class_breakdown(allocation: &Allocation) -> BTreeMap<AssetClass, Weight> {
    let mut breakdown: BTreeMap<AssetClass, Weight> = BTreeMap::new();
    for (ticker, weight) in allocation.iter() {
        if let Some(class) = catalog::asset_class_of(ticker) {
            *breakdown.entry(class).or_insert(Decimal::ZERO) += weight;
        }
    }
    breakdown
}

fn recommendations(
    allocation: &Allocation,
    breakdown: &BTreeMap<AssetClass, Weight>,
) -> Vec<Recommendation> {
    let mut rules = Vec::new();
    let has_meaningful_position = allocation.iter().any(|(_, w)| w > MISSING_CLASS_TRIGGER);

    if !breakdown.contains_key(&AssetClass::Equity) && has_meaningful_position {
        rules.push(RecommendationRule::AddEquity);
    }
    if !breakdown.contains_key(&AssetClass::Bonds) && has_meaningful_position {
        rules.push(RecommendationRule::AddBonds);
    }
    if allocation.max_weight() > CONCENTRATED_POSITION {
        rules.push(RecommendationRule::TooConcentrated);
    }
    let small_positions = allocation.iter().filter(|(_, w)| *w < SMALL_POSITION).count();
    if small_positions > MAX_SMALL_POSITIONS {
        rules.push(RecommendationRule::ConsolidateSmallPositions);
    }

    rules.into_iter().map(Recommendation::from).collect()
}

/// Score how well `allocation` is spread across asset classes.
///
/// Expects an allocation that already passed `validate`; it is not checked
/// again here.
pub fn score_diversification(allocation: &Allocation) -> DiversificationReport {
    let breakdown = asset_class_breakdown(allocation);
    let recommendations = recommendations(allocation, &breakdown);

    if breakdown.is_empty() {
        return DiversificationReport {
            score: Decimal::ZERO,
            breakdown,
            max_concentration: Decimal::ZERO,
            num_asset_classes: 0,
            total_positions: allocation.len(),
            recommendations,
        };
    }

    let num_classes = breakdown.len();
    let max_concentration = breakdown.values().copied().max().unwrap_or(Decimal::ZERO);

    let class_points = (Decimal::from(num_classes as u64) * POINTS_PER_CLASS).min(CLASS_POINTS_CAP);
    let concentration_points = (CONCENTRATION_BUDGET
        - (max_concentration - CONCENTRATION_THRESHOLD) * dec!(100))
    .max(Decimal::ZERO);
    let score = (class_points + concentration_points)
        .max(Decimal::ZERO)
        .min(dec!(100));

    DiversificationReport {
        score,
        breakdown,
        max_concentration,
        num_asset_classes: num_classes,
        total_positions: allocation.len(),
        recommendations,
    }
}

/// Validate, then describe and score an allocation.
pub fn analyze_allocation(
    allocation: &Allocation,
) -> AdvisorResult<ComputationOutput<AllocationAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    ensure_valid(allocation)?;

    let diversification = score_diversification(allocation);
    for rec in &diversification.recommendations {
        warnings.push(rec.message.clone());
    }
    tracing::debug!(
        score = %diversification.score,
        classes = diversification.num_asset_classes,
        "allocation analysed"
    );

    let output = AllocationAnalysis {
        total_weight: allocation.total_weight(),
        holdings: holdings_breakdown(allocation),
        diversification,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Asset-class diversification score (class count + concentration penalty)",
        &serde_json::json!({
            "points_per_class": POINTS_PER_CLASS.to_string(),
            "class_points_cap": CLASS_POINTS_CAP.to_string(),
            "concentration_threshold": CONCENTRATION_THRESHOLD.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::portfolio::models::{model_portfolio, RiskBucket};
    use pretty_assertions::assert_eq;

    fn rules(report: &DiversificationReport) -> Vec<RecommendationRule> {
        report.recommendations.iter().map(|r| r.rule).collect()
    }

    #[test]
    fn test_single_class_allocation() {
        let a = Allocation::new().with("ACWI", dec!(1.0));
        let report = score_diversification(&a);
        assert_eq!(report.max_concentration, dec!(1.0));
        assert_eq!(report.score, dec!(20));
        assert_eq!(report.num_asset_classes, 1);
        assert_eq!(
            rules(&report),
            vec![RecommendationRule::AddBonds, RecommendationRule::TooConcentrated]
        );
    }

    #[test]
    fn test_conservative_model_scores_90() {
        let report = score_diversification(&model_portfolio(RiskBucket::Conservative));
        assert_eq!(report.num_asset_classes, 4);
        assert_eq!(report.max_concentration, dec!(0.5));
        assert_eq!(report.score, dec!(90));
        assert_eq!(report.breakdown.get(&AssetClass::Cash), Some(&dec!(0.30)));
        assert_eq!(report.breakdown.get(&AssetClass::Bonds), Some(&dec!(0.50)));
        assert_eq!(report.breakdown.get(&AssetClass::Equity), Some(&dec!(0.10)));
        assert_eq!(report.breakdown.get(&AssetClass::Commodity), Some(&dec!(0.10)));
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_aggressive_model_is_flagged_concentrated() {
        // 3 classes -> 60; equity 0.80 -> 40 - 40 = 0
        let report = score_diversification(&model_portfolio(RiskBucket::Aggressive));
        assert_eq!(report.score, dec!(60));
        assert_eq!(
            rules(&report),
            vec![RecommendationRule::AddBonds, RecommendationRule::TooConcentrated]
        );
    }

    #[test]
    fn test_class_cap_and_full_score() {
        // 5 classes capped at 60; max class 0.4 -> full 40
        let a = Allocation::new()
            .with("BIL", dec!(0.1))
            .with("AGG", dec!(0.2))
            .with("ACWI", dec!(0.4))
            .with("VNQ", dec!(0.15))
            .with("GLD", dec!(0.15));
        let report = score_diversification(&a);
        assert_eq!(report.score, dec!(100));
    }

    #[test]
    fn test_low_concentration_does_not_exceed_100() {
        // Concentration below 0.4 would push the second term above 40
        let a = Allocation::new()
            .with("BIL", dec!(0.2))
            .with("AGG", dec!(0.2))
            .with("ACWI", dec!(0.2))
            .with("VNQ", dec!(0.2))
            .with("GLD", dec!(0.2));
        let report = score_diversification(&a);
        assert_eq!(report.score, dec!(100));
    }

    #[test]
    fn test_consolidate_small_positions() {
        let a = Allocation::new()
            .with("BIL", dec!(0.04))
            .with("AGG", dec!(0.04))
            .with("GLD", dec!(0.02))
            .with("ACWI", dec!(0.90));
        let report = score_diversification(&a);
        assert!(rules(&report).contains(&RecommendationRule::ConsolidateSmallPositions));
        assert!(rules(&report).contains(&RecommendationRule::TooConcentrated));
    }

    #[test]
    fn test_no_equity_recommends_equity() {
        let a = Allocation::new().with("AGG", dec!(0.5)).with("BIL", dec!(0.5));
        let report = score_diversification(&a);
        assert_eq!(rules(&report), vec![RecommendationRule::AddEquity]);
    }

    #[test]
    fn test_scores_bounded_for_models() {
        for bucket in RiskBucket::ALL {
            let s = score_diversification(&model_portfolio(bucket)).score;
            assert!(s >= Decimal::ZERO && s <= dec!(100));
        }
    }

    #[test]
    fn test_analyze_rejects_invalid() {
        let a = Allocation::new().with("ACWI", dec!(0.9));
        assert!(matches!(
            analyze_allocation(&a),
            Err(AdvisorError::InvalidAllocation(_))
        ));
    }

    #[test]
    fn test_analyze_valid() {
        let out = analyze_allocation(&model_portfolio(RiskBucket::Balanced)).unwrap();
        assert_eq!(out.result.holdings.len(), 5);
        assert_eq!(out.result.holdings[0].ticker, "ACWI");
        assert_eq!(out.result.total_weight, Decimal::ONE);
    }
}

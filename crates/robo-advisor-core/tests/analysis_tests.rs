use pretty_assertions::assert_eq;
use robo_advisor_core::analysis::comparison::{compare_allocations, NamedAllocation};
use robo_advisor_core::analysis::diversification::{
    analyze_allocation, asset_class_breakdown, score_diversification, RecommendationRule,
};
use robo_advisor_core::analysis::rebalance::{
    plan_rebalance, suggest_rebalance, RebalanceAction, RebalanceInput, DEFAULT_DRIFT_THRESHOLD,
};
use robo_advisor_core::portfolio::catalog::AssetClass;
use robo_advisor_core::portfolio::catalog;
use robo_advisor_core::portfolio::models::{model_portfolio, RiskBucket};
use robo_advisor_core::portfolio::validation::validate;
use robo_advisor_core::{AdvisorError, Allocation};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Diversification
// ===========================================================================

#[test]
fn test_model_scores() {
    let expected = [
        (RiskBucket::Conservative, dec!(90)),
        (RiskBucket::Moderate, dec!(100)),
        (RiskBucket::Balanced, dec!(95)),
        (RiskBucket::Growth, dec!(75)),
        (RiskBucket::Aggressive, dec!(60)),
    ];
    for (bucket, score) in expected {
        let report = score_diversification(&model_portfolio(bucket));
        assert_eq!(report.score, score, "bucket {bucket}");
    }
}

#[test]
fn test_breakdown_aggregates_by_class() {
    let a = Allocation::new()
        .with("BIL", dec!(0.2))
        .with("AGG", dec!(0.3))
        .with("ACWI", dec!(0.5));
    let breakdown = asset_class_breakdown(&a);
    assert_eq!(breakdown.len(), 3);
    assert_eq!(breakdown[&AssetClass::Equity], dec!(0.5));
    let total: Decimal = breakdown.values().sum();
    assert_eq!(total, Decimal::ONE);
}

#[test]
fn test_zero_weight_position_still_counts_as_class() {
    let a = Allocation::new().with("ACWI", dec!(1.0)).with("AGG", dec!(0));
    let report = score_diversification(&a);
    assert_eq!(report.num_asset_classes, 2);
    assert!(!report
        .recommendations
        .iter()
        .any(|r| r.rule == RecommendationRule::AddBonds));
}

#[test]
fn test_recommendation_messages_are_user_facing() {
    let report = score_diversification(&Allocation::new().with("ACWI", dec!(1.0)));
    let messages: Vec<&str> = report
        .recommendations
        .iter()
        .map(|r| r.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Considere agregar bonos para estabilidad y ingresos",
            "Portafolio muy concentrado. Considere diversificar más",
        ]
    );
}

#[test]
fn test_analysis_puts_recommendations_in_warnings() {
    let out = analyze_allocation(&model_portfolio(RiskBucket::Aggressive)).unwrap();
    assert_eq!(out.warnings.len(), 2);
    assert_eq!(out.result.diversification.score, dec!(60));
    assert_eq!(out.result.holdings[0].ticker, "ACWI");
}

#[test]
fn test_analysis_rejects_unknown_ticker() {
    let a = Allocation::new().with("XYZ", dec!(1.0));
    match analyze_allocation(&a) {
        Err(AdvisorError::InvalidAllocation(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected InvalidAllocation, got {other:?}"),
    }
}

/// Every split of 100% across the five catalog ETFs in 5% steps.
fn five_percent_grid() -> Vec<Allocation> {
    let tickers = catalog::supported_tickers();
    let step = dec!(0.05);
    let mut grid = Vec::new();
    for a in 0..=20u32 {
        for b in 0..=20 - a {
            for c in 0..=20 - a - b {
                for d in 0..=20 - a - b - c {
                    let e = 20 - a - b - c - d;
                    grid.push(
                        tickers
                            .iter()
                            .zip([a, b, c, d, e])
                            .map(|(t, units)| (*t, Decimal::from(units) * step))
                            .collect(),
                    );
                }
            }
        }
    }
    grid
}

#[test]
fn test_score_bounded_for_every_grid_allocation() {
    let grid = five_percent_grid();
    assert_eq!(grid.len(), 10_626);
    for allocation in &grid {
        assert_eq!(validate(allocation), Ok(()), "{allocation:?}");
        let report = score_diversification(allocation);
        assert!(
            report.score >= Decimal::ZERO && report.score <= dec!(100),
            "score {} for {allocation:?}",
            report.score
        );
        assert!(report.max_concentration <= Decimal::ONE);
        assert!(report.num_asset_classes <= AssetClass::ALL.len());
    }
}

#[test]
fn test_scoring_is_deterministic() {
    for allocation in five_percent_grid().iter().step_by(97) {
        let first = score_diversification(allocation);
        let second = score_diversification(allocation);
        assert_eq!(first.score, second.score);
        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(first.recommendations, second.recommendations);
    }
}

// ===========================================================================
// Rebalancing
// ===========================================================================

#[test]
fn test_rebalance_to_own_model_is_noop() {
    for bucket in RiskBucket::ALL {
        let model = model_portfolio(bucket);
        assert!(suggest_rebalance(&model, &model, DEFAULT_DRIFT_THRESHOLD).is_empty());
    }
}

#[test]
fn test_conservative_to_aggressive() {
    let current = model_portfolio(RiskBucket::Conservative);
    let target = model_portfolio(RiskBucket::Aggressive);
    let suggestions = suggest_rebalance(&current, &target, DEFAULT_DRIFT_THRESHOLD);
    let summary: Vec<(&str, RebalanceAction, Decimal)> = suggestions
        .iter()
        .map(|s| (s.ticker.as_str(), s.action, s.delta_pct))
        .collect();
    // GLD drifts 0.05 exactly, which is not above the threshold
    assert_eq!(
        summary,
        vec![
            ("ACWI", RebalanceAction::Increase, dec!(70)),
            ("VNQ", RebalanceAction::Increase, dec!(15)),
        ]
    );
}

#[test]
fn test_zero_threshold_reports_every_drift() {
    let current = Allocation::new().with("ACWI", dec!(0.51)).with("AGG", dec!(0.49));
    let target = Allocation::new().with("ACWI", dec!(0.5)).with("AGG", dec!(0.5));
    assert_eq!(suggest_rebalance(&current, &target, Decimal::ZERO).len(), 2);
}

#[test]
fn test_plan_from_json_with_defaults() {
    let input: RebalanceInput = serde_json::from_str(
        r#"{"current": {"ACWI": 0.5, "AGG": 0.5},
            "target": {"ACWI": 0.65, "AGG": 0.15, "VNQ": 0.15, "GLD": 0.05}}"#,
    )
    .unwrap();
    let out = plan_rebalance(&input).unwrap();
    assert!(out.result.needs_rebalance);
    assert_eq!(out.result.suggestions.len(), 3);
    assert_eq!(out.result.max_drift, dec!(0.35));
    assert!(out.warnings.is_empty());
}

// ===========================================================================
// Comparison
// ===========================================================================

#[test]
fn test_compare_models_and_custom_allocation() {
    let input = vec![
        NamedAllocation::new("Solo acciones", Allocation::new().with("ACWI", dec!(1.0))),
        NamedAllocation::new("Moderado", model_portfolio(RiskBucket::Moderate)),
        NamedAllocation::new("Roto", Allocation::new().with("ACWI", dec!(0.5))),
    ];
    let out = compare_allocations(&input).unwrap();
    let result = &out.result;

    assert_eq!(result.comparison_count, 3);
    let names: Vec<&str> = result.portfolios.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Solo acciones", "Moderado", "Roto"]);

    let solo = &result.portfolios[0];
    assert_eq!(solo.diversification.as_ref().map(|d| d.score), Some(dec!(20)));
    assert_eq!(solo.asset_breakdown.get(&AssetClass::Equity), Some(&dec!(1.0)));

    let roto = &result.portfolios[2];
    assert!(!roto.is_valid);
    assert!(roto.diversification.is_none());
    assert_eq!(roto.validation_errors.len(), 1);

    assert_eq!(result.most_diversified.as_deref(), Some("Moderado"));
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_compare_from_json_payload() {
    let input: Vec<NamedAllocation> = serde_json::from_str(
        r#"[{"name": "A", "allocations": {"BIL": 0.3, "AGG": 0.5, "ACWI": 0.2}},
            {"allocations": {"ACWI": 0.8, "VNQ": 0.15, "GLD": 0.05}}]"#,
    )
    .unwrap();
    let out = compare_allocations(&input).unwrap();
    assert_eq!(out.result.portfolios[1].name, "Portfolio sin nombre");
    assert!(out.result.portfolios.iter().all(|p| p.is_valid));
}

#[test]
fn test_compare_single_allocation_is_rejected() {
    let input = vec![NamedAllocation::new("A", model_portfolio(RiskBucket::Growth))];
    assert!(matches!(
        compare_allocations(&input),
        Err(AdvisorError::InvalidInput { .. })
    ));
}

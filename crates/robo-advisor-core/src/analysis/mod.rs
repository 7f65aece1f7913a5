pub mod comparison;
pub mod diversification;
pub mod rebalance;

pub use comparison::{compare_allocations, Comparison, NamedAllocation};
pub use diversification::{analyze_allocation, score_diversification, DiversificationReport};
pub use rebalance::{
    plan_rebalance, suggest_rebalance, RebalanceSuggestion, DEFAULT_DRIFT_THRESHOLD,
};

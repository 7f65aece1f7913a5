use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use robo_advisor_core::analysis::comparison::{compare_allocations, NamedAllocation};
use robo_advisor_core::analysis::diversification::analyze_allocation;
use robo_advisor_core::analysis::rebalance::{plan_rebalance, RebalanceInput};
use robo_advisor_core::performance::provider::{InMemoryPriceHistory, PriceSeries};
use robo_advisor_core::performance::simulation::{simulate_portfolio, SimulationInput};
use robo_advisor_core::portfolio::catalog;
use robo_advisor_core::portfolio::models::{model_portfolio_for_index, RiskBucket};
use robo_advisor_core::portfolio::validation::check_allocation;
use robo_advisor_core::profile::questionnaire::QuestionnaireAnswers;
use robo_advisor_core::profile::scoring::{assess_risk_profile, questionnaire_structure};
use robo_advisor_core::Allocation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Risk profile
// ---------------------------------------------------------------------------

#[napi]
pub fn score_questionnaire(answers_json: String) -> NapiResult<String> {
    let value: serde_json::Value = serde_json::from_str(&answers_json).map_err(to_napi_error)?;
    let answers = QuestionnaireAnswers::from_json(&value).map_err(to_napi_error)?;
    let output = assess_risk_profile(&answers).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi(js_name = "questionnaireStructure")]
pub fn questionnaire_structure_json() -> NapiResult<String> {
    to_json(&questionnaire_structure())
}

// ---------------------------------------------------------------------------
// Catalog and model portfolios
// ---------------------------------------------------------------------------

#[napi]
pub fn model_portfolio(bucket: i64) -> NapiResult<String> {
    let allocation = model_portfolio_for_index(bucket).map_err(to_napi_error)?;
    to_json(&allocation)
}

#[napi]
pub fn risk_bucket_for_score(score: u32) -> NapiResult<String> {
    let bucket = RiskBucket::from_score(score);
    to_json(&serde_json::json!({
        "bucket": bucket,
        "label": bucket.label(),
        "description": bucket.description(),
    }))
}

#[napi]
pub fn etf_catalog() -> NapiResult<String> {
    to_json(&catalog::all_etfs())
}

// ---------------------------------------------------------------------------
// Allocation analytics
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_allocation(allocation_json: String) -> NapiResult<String> {
    let allocation: Allocation = serde_json::from_str(&allocation_json).map_err(to_napi_error)?;
    to_json(&check_allocation(&allocation))
}

#[napi(js_name = "analyzeAllocation")]
pub fn analyze_allocation_json(allocation_json: String) -> NapiResult<String> {
    let allocation: Allocation = serde_json::from_str(&allocation_json).map_err(to_napi_error)?;
    let output = analyze_allocation(&allocation).map_err(to_napi_error)?;
    to_json(&output)
}

/// Takes a JSON array of `{name, allocations}` entries.
#[napi(js_name = "compareAllocations")]
pub fn compare_allocations_json(portfolios_json: String) -> NapiResult<String> {
    let portfolios: Vec<NamedAllocation> =
        serde_json::from_str(&portfolios_json).map_err(to_napi_error)?;
    let output = compare_allocations(&portfolios).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi(js_name = "planRebalance")]
pub fn plan_rebalance_json(input_json: String) -> NapiResult<String> {
    let input: RebalanceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan_rebalance(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

#[napi(js_name = "simulatePortfolio")]
pub fn simulate_portfolio_json(input_json: String, prices_json: String) -> NapiResult<String> {
    let input: SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let series: Vec<PriceSeries> = serde_json::from_str(&prices_json).map_err(to_napi_error)?;
    let history = InMemoryPriceHistory::from_series(series);
    let output = simulate_portfolio(&input, &history).map_err(to_napi_error)?;
    to_json(&output)
}

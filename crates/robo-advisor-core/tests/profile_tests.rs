use pretty_assertions::assert_eq;
use robo_advisor_core::portfolio::models::{model_portfolio, RiskBucket};
use robo_advisor_core::profile::questionnaire::{
    Age, DigitalTrust, Goal, Horizon, IncomeShare, InflationConcern, Knowledge, Liquidity,
    MaxDrop, QuestionnaireAnswers, Reaction,
};
use std::collections::BTreeSet;
use robo_advisor_core::profile::scoring::{assess_risk_profile, score};
use robo_advisor_core::{AdvisorError, QuestionField};
use serde_json::json;

fn aggressive_json() -> serde_json::Value {
    json!({
        "age": 25,
        "horizon": "> 10 años",
        "income": "> 20 %",
        "knowledge": "Avanzado",
        "max_drop": "> 30 %",
        "reaction": "Compro más",
        "liquidity": "Baja",
        "goal": "Máximo crecimiento",
        "inflation": "Me preocupa mucho",
        "digital": "Alta"
    })
}

// ===========================================================================
// Parsing raw answers
// ===========================================================================

#[test]
fn test_parse_and_score_aggressive_from_json() {
    let answers = QuestionnaireAnswers::from_json(&aggressive_json()).unwrap();
    let result = score(&answers).unwrap();
    assert_eq!(result.total_score, 42);
    assert_eq!(result.bucket, RiskBucket::Aggressive);
}

#[test]
fn test_deserialize_goes_through_from_json() {
    let answers: QuestionnaireAnswers = serde_json::from_value(aggressive_json()).unwrap();
    assert_eq!(
        answers,
        QuestionnaireAnswers::from_json(&aggressive_json()).unwrap()
    );
}

#[test]
fn test_unknown_option_is_rejected() {
    let mut raw = aggressive_json();
    raw["horizon"] = json!("para siempre");
    match QuestionnaireAnswers::from_json(&raw) {
        Err(AdvisorError::InvalidEnumValue { field, value }) => {
            assert_eq!(field, QuestionField::Horizon);
            assert_eq!(value, "para siempre");
        }
        other => panic!("expected InvalidEnumValue, got {other:?}"),
    }
}

#[test]
fn test_option_text_is_case_sensitive() {
    let mut raw = aggressive_json();
    raw["knowledge"] = json!("avanzado");
    assert!(matches!(
        QuestionnaireAnswers::from_json(&raw),
        Err(AdvisorError::InvalidEnumValue { .. })
    ));
}

#[test]
fn test_age_out_of_range_and_non_integer() {
    let mut raw = aggressive_json();
    raw["age"] = json!(17);
    assert!(matches!(
        QuestionnaireAnswers::from_json(&raw),
        Err(AdvisorError::InvalidInput { .. })
    ));
    raw["age"] = json!("treinta");
    assert!(matches!(
        QuestionnaireAnswers::from_json(&raw),
        Err(AdvisorError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Missing answers
// ===========================================================================

#[test]
fn test_null_field_counts_as_missing() {
    let mut raw = aggressive_json();
    raw["goal"] = serde_json::Value::Null;
    let answers = QuestionnaireAnswers::from_json(&raw).unwrap();
    assert_eq!(answers.missing_fields(), vec![QuestionField::Goal]);
    match score(&answers) {
        Err(AdvisorError::MissingField { field }) => assert_eq!(field, QuestionField::Goal),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn test_first_missing_field_in_order_is_reported() {
    let answers = QuestionnaireAnswers::from_json(&json!({ "digital": "Alta" })).unwrap();
    let err = score(&answers).unwrap_err();
    assert_eq!(err.to_string(), "Missing questionnaire field: age");
}

// ===========================================================================
// Bucket boundaries
// ===========================================================================

#[test]
fn test_bucket_edges() {
    let cases = [
        (0, RiskBucket::Conservative),
        (12, RiskBucket::Conservative),
        (13, RiskBucket::Moderate),
        (20, RiskBucket::Moderate),
        (21, RiskBucket::Balanced),
        (28, RiskBucket::Balanced),
        (29, RiskBucket::Growth),
        (36, RiskBucket::Growth),
        (37, RiskBucket::Aggressive),
        (42, RiskBucket::Aggressive),
    ];
    for (s, expected) in cases {
        assert_eq!(RiskBucket::from_score(s), expected, "score {s}");
    }
}

#[test]
fn test_assessment_on_bucket_edge_warns() {
    // 5 + 5 + 4 + 4 + 5 + 5 + 0 + 0 + 0 + 0 = 28, upper edge of Balanced
    let raw = json!({
        "age": 25,
        "horizon": "> 10 años",
        "income": "> 20 %",
        "knowledge": "Avanzado",
        "max_drop": "> 30 %",
        "reaction": "Compro más",
        "liquidity": "Alta",
        "goal": "Proteger capital",
        "inflation": "No me preocupa",
        "digital": "Baja"
    });
    let answers = QuestionnaireAnswers::from_json(&raw).unwrap();
    let out = assess_risk_profile(&answers).unwrap();
    assert_eq!(out.result.total_score, 28);
    assert_eq!(out.result.bucket, RiskBucket::Balanced);
    assert_eq!(out.result.model_portfolio, model_portfolio(RiskBucket::Balanced));
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Whole answer space
// ===========================================================================

const SAMPLE_AGES: [u32; 8] = [18, 29, 30, 44, 45, 59, 60, 100];

/// Calls `f` once per combination of categorical answers, with `age` fixed.
fn for_each_answer_set(age: Age, mut f: impl FnMut(&QuestionnaireAnswers)) {
    for &horizon in Horizon::ALL {
        for &income in IncomeShare::ALL {
            for &knowledge in Knowledge::ALL {
                for &max_drop in MaxDrop::ALL {
                    for &reaction in Reaction::ALL {
                        for &liquidity in Liquidity::ALL {
                            for &goal in Goal::ALL {
                                for &inflation in InflationConcern::ALL {
                                    for &digital in DigitalTrust::ALL {
                                        f(&QuestionnaireAnswers {
                                            age: Some(age),
                                            horizon: Some(horizon),
                                            income: Some(income),
                                            knowledge: Some(knowledge),
                                            max_drop: Some(max_drop),
                                            reaction: Some(reaction),
                                            liquidity: Some(liquidity),
                                            goal: Some(goal),
                                            inflation: Some(inflation),
                                            digital: Some(digital),
                                        });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_every_answer_set_scores_in_range() {
    let mut totals = BTreeSet::new();
    let mut buckets = BTreeSet::new();
    let mut count = 0usize;

    for years in SAMPLE_AGES {
        for_each_answer_set(Age::new(years).unwrap(), |answers| {
            let result = score(answers).unwrap();
            assert!(result.total_score <= 42, "{answers:?}");
            assert!(result.bucket.index() <= 4);
            assert_eq!(RiskBucket::from_score(result.total_score), result.bucket);
            totals.insert(result.total_score);
            buckets.insert(result.bucket.index());
            count += 1;
        });
    }

    assert_eq!(count, 8 * 103_680);
    assert_eq!(totals.first(), Some(&0));
    assert_eq!(totals.last(), Some(&42));
    assert_eq!(buckets.len(), 5);
}

#[test]
fn test_scoring_is_deterministic() {
    let answers = QuestionnaireAnswers::from_json(&aggressive_json()).unwrap();
    assert_eq!(score(&answers).unwrap(), score(&answers).unwrap());

    let first = assess_risk_profile(&answers).unwrap().result;
    let second = assess_risk_profile(&answers).unwrap().result;
    assert_eq!(first.total_score, second.total_score);
    assert_eq!(first.bucket, second.bucket);
    assert_eq!(first.question_scores, second.question_scores);
    assert_eq!(first.model_portfolio, second.model_portfolio);

    let reparsed = QuestionnaireAnswers::from_json(&aggressive_json()).unwrap();
    assert_eq!(score(&reparsed).unwrap(), score(&answers).unwrap());
}

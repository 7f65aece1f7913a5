use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::questionnaire::{questions, QuestionSpec, QuestionnaireAnswers};
use crate::error::AdvisorError;
use crate::portfolio::allocation::Allocation;
use crate::portfolio::models::{
    model_portfolio, RiskBucket, DISPLAY_SCORE_SCALE, MAX_ATTAINABLE_SCORE,
};
use crate::types::*;
use crate::AdvisorResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of scoring one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub bucket: RiskBucket,
    pub total_score: u32,
}

/// Points contributed by a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub field: QuestionField,
    pub points: u32,
    pub max_points: u32,
}

/// Full risk assessment for one investor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub bucket: RiskBucket,
    pub label: String,
    pub description: String,
    pub total_score: u32,
    /// Highest score the rubric can actually produce
    pub max_score: u32,
    /// Scale used when the score is shown to end users
    pub display_scale: u32,
    pub question_scores: Vec<QuestionScore>,
    pub model_portfolio: Allocation,
}

/// A bucket as presented next to the questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLevel {
    pub bucket: RiskBucket,
    pub label: String,
    pub description: String,
    pub score_range: (u32, u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireStructure {
    pub questions: Vec<QuestionSpec>,
    pub risk_levels: Vec<RiskLevel>,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn missing(field: QuestionField) -> AdvisorError {
    AdvisorError::MissingField { field }
}

/// Per-question points, in field order.
///
/// Fails with `MissingField` on the first unanswered question; incomplete
/// answer sets are never defaulted.
pub fn score_breakdown(answers: &QuestionnaireAnswers) -> AdvisorResult<Vec<QuestionScore>> {
    use super::questionnaire::*;

    fn best<T: Copy>(all: &[T], points: fn(T) -> u32) -> u32 {
        all.iter().map(|v| points(*v)).max().unwrap_or(0)
    }

    let age = answers.age.ok_or_else(|| missing(QuestionField::Age))?;
    let horizon = answers.horizon.ok_or_else(|| missing(QuestionField::Horizon))?;
    let income = answers.income.ok_or_else(|| missing(QuestionField::Income))?;
    let knowledge = answers.knowledge.ok_or_else(|| missing(QuestionField::Knowledge))?;
    let max_drop = answers.max_drop.ok_or_else(|| missing(QuestionField::MaxDrop))?;
    let reaction = answers.reaction.ok_or_else(|| missing(QuestionField::Reaction))?;
    let liquidity = answers.liquidity.ok_or_else(|| missing(QuestionField::Liquidity))?;
    let goal = answers.goal.ok_or_else(|| missing(QuestionField::Goal))?;
    let inflation = answers.inflation.ok_or_else(|| missing(QuestionField::Inflation))?;
    let digital = answers.digital.ok_or_else(|| missing(QuestionField::Digital))?;

    let row = |field, points, max_points| QuestionScore {
        field,
        points,
        max_points,
    };

    Ok(vec![
        row(QuestionField::Age, age.points(), 5),
        row(
            QuestionField::Horizon,
            horizon.points(),
            best(Horizon::ALL, Horizon::points),
        ),
        row(
            QuestionField::Income,
            income.points(),
            best(IncomeShare::ALL, IncomeShare::points),
        ),
        row(
            QuestionField::Knowledge,
            knowledge.points(),
            best(Knowledge::ALL, Knowledge::points),
        ),
        row(
            QuestionField::MaxDrop,
            max_drop.points(),
            best(MaxDrop::ALL, MaxDrop::points),
        ),
        row(
            QuestionField::Reaction,
            reaction.points(),
            best(Reaction::ALL, Reaction::points),
        ),
        row(
            QuestionField::Liquidity,
            liquidity.points(),
            best(Liquidity::ALL, Liquidity::points),
        ),
        row(
            QuestionField::Goal,
            goal.points(),
            best(Goal::ALL, Goal::points),
        ),
        row(
            QuestionField::Inflation,
            inflation.points(),
            best(InflationConcern::ALL, InflationConcern::points),
        ),
        row(
            QuestionField::Digital,
            digital.points(),
            best(DigitalTrust::ALL, DigitalTrust::points),
        ),
    ])
}

/// Score a complete answer set and place it in a risk bucket.
///
/// Total is the sum of ten table lookups (0..=42); buckets split at 12, 20,
/// 28 and 36 inclusive. Pure and deterministic.
pub fn score(answers: &QuestionnaireAnswers) -> AdvisorResult<ScoreResult> {
    let total_score: u32 = score_breakdown(answers)?.iter().map(|q| q.points).sum();
    Ok(ScoreResult {
        bucket: RiskBucket::from_score(total_score),
        total_score,
    })
}

/// Score the answers and resolve the matching model portfolio.
pub fn assess_risk_profile(
    answers: &QuestionnaireAnswers,
) -> AdvisorResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let question_scores = score_breakdown(answers)?;
    let total_score: u32 = question_scores.iter().map(|q| q.points).sum();
    let bucket = RiskBucket::from_score(total_score);

    let (lo, hi) = bucket.score_range();
    if bucket != RiskBucket::Conservative && total_score == lo {
        warnings.push(format!(
            "Score {total_score} sits on the lower edge of bucket {bucket}"
        ));
    } else if bucket != RiskBucket::Aggressive && total_score == hi {
        warnings.push(format!(
            "Score {total_score} sits on the upper edge of bucket {bucket}"
        ));
    }

    tracing::debug!(total_score, bucket = bucket.index(), "risk profile scored");

    let output = RiskAssessment {
        bucket,
        label: bucket.label().to_string(),
        description: bucket.description().to_string(),
        total_score,
        max_score: MAX_ATTAINABLE_SCORE,
        display_scale: DISPLAY_SCORE_SCALE,
        question_scores,
        model_portfolio: model_portfolio(bucket),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Questionnaire risk scoring (additive rubric, five buckets)",
        &serde_json::json!({
            "bucket_upper_bounds": [12, 20, 28, 36],
            "max_attainable_score": MAX_ATTAINABLE_SCORE,
            "display_scale": DISPLAY_SCORE_SCALE,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Questions and risk levels, for rendering the form.
pub fn questionnaire_structure() -> QuestionnaireStructure {
    QuestionnaireStructure {
        questions: questions(),
        risk_levels: RiskBucket::ALL
            .iter()
            .map(|b| RiskLevel {
                bucket: *b,
                label: b.label().to_string(),
                description: b.description().to_string(),
                score_range: b.score_range(),
            })
            .collect(),
    }
}

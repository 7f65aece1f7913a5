use clap::Args;
use serde_json::Value;

use robo_advisor_core::profile::questionnaire::QuestionnaireAnswers;
use robo_advisor_core::profile::scoring::{assess_risk_profile, questionnaire_structure};

use crate::input;

/// Arguments for questionnaire scoring
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to a JSON or YAML file with the answers (bare or under "answers")
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let answers: QuestionnaireAnswers = input::read_input(args.input.as_deref(), "scoring")?;
    let missing = answers.missing_fields();
    if !missing.is_empty() {
        tracing::info!(?missing, "questionnaire is incomplete");
    }
    let result = assess_risk_profile(&answers)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_questionnaire() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(questionnaire_structure())?)
}

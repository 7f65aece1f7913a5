pub mod questionnaire;
pub mod scoring;

pub use questionnaire::QuestionnaireAnswers;
pub use scoring::{assess_risk_profile, score, ScoreResult};

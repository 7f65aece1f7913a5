use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Portfolio weights as fractions of the whole (0.30 = 30%).
pub type Weight = Decimal;

/// The ten questionnaire fields, in the order they are scored and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionField {
    Age,
    Horizon,
    Income,
    Knowledge,
    MaxDrop,
    Reaction,
    Liquidity,
    Goal,
    Inflation,
    Digital,
}

impl QuestionField {
    pub const ALL: [QuestionField; 10] = [
        QuestionField::Age,
        QuestionField::Horizon,
        QuestionField::Income,
        QuestionField::Knowledge,
        QuestionField::MaxDrop,
        QuestionField::Reaction,
        QuestionField::Liquidity,
        QuestionField::Goal,
        QuestionField::Inflation,
        QuestionField::Digital,
    ];

    /// Wire name of the field, as it appears in JSON answer sets.
    pub fn key(&self) -> &'static str {
        match self {
            QuestionField::Age => "age",
            QuestionField::Horizon => "horizon",
            QuestionField::Income => "income",
            QuestionField::Knowledge => "knowledge",
            QuestionField::MaxDrop => "max_drop",
            QuestionField::Reaction => "reaction",
            QuestionField::Liquidity => "liquidity",
            QuestionField::Goal => "goal",
            QuestionField::Inflation => "inflation",
            QuestionField::Digital => "digital",
        }
    }
}

impl fmt::Display for QuestionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_field_keys_are_unique() {
        let mut keys: Vec<&str> = QuestionField::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_question_field_serializes_as_key() {
        for field in QuestionField::ALL {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, serde_json::Value::String(field.key().to_string()));
        }
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "Test",
            &serde_json::json!({"k": "v"}),
            vec!["w".into()],
            12,
            42u32,
        );
        assert_eq!(out.result, 42);
        assert_eq!(out.methodology, "Test");
        assert_eq!(out.warnings, vec!["w".to_string()]);
        assert_eq!(out.metadata.computation_time_us, 12);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}

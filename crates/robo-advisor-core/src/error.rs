use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::QuestionField;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Missing questionnaire field: {field}")]
    MissingField { field: QuestionField },

    #[error("Invalid value for {field}: {value}")]
    InvalidEnumValue { field: QuestionField, value: String },

    #[error("Invalid risk bucket: {0} (expected 0-4)")]
    InvalidBucket(i64),

    #[error("Invalid allocation: {}", join_violations(.0))]
    InvalidAllocation(Vec<ValidationError>),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AdvisorError {
    fn from(e: serde_json::Error) -> Self {
        AdvisorError::SerializationError(e.to_string())
    }
}

/// A single allocation rule violation. The validator reports every
/// violation it finds, so callers usually handle a `Vec` of these.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValidationError {
    #[error("Unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("Negative weight for {ticker}: {weight}")]
    NegativeWeight { ticker: String, weight: Decimal },

    #[error("Weight above 100% for {ticker}: {weight}")]
    WeightOverOne { ticker: String, weight: Decimal },

    #[error("Weights must sum to 1.0 (actual: {actual_sum})")]
    SumMismatch { actual_sum: Decimal },
}

fn join_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

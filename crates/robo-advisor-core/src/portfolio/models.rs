//! Risk buckets and the fixed model portfolio attached to each one.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::allocation::Allocation;
use crate::error::AdvisorError;
use crate::AdvisorResult;

/// Highest total score the questionnaire rubric can produce.
pub const MAX_ATTAINABLE_SCORE: u32 = 42;

/// Scale shown to end users ("puntaje x/50"). Display only; see DESIGN.md.
pub const DISPLAY_SCORE_SCALE: u32 = 50;

/// Risk tolerance class, 0 (most conservative) to 4 (most aggressive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum RiskBucket {
    Conservative = 0,
    Moderate = 1,
    Balanced = 2,
    Growth = 3,
    Aggressive = 4,
}

impl RiskBucket {
    pub const ALL: [RiskBucket; 5] = [
        RiskBucket::Conservative,
        RiskBucket::Moderate,
        RiskBucket::Balanced,
        RiskBucket::Growth,
        RiskBucket::Aggressive,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: i64) -> AdvisorResult<Self> {
        match index {
            0 => Ok(RiskBucket::Conservative),
            1 => Ok(RiskBucket::Moderate),
            2 => Ok(RiskBucket::Balanced),
            3 => Ok(RiskBucket::Growth),
            4 => Ok(RiskBucket::Aggressive),
            other => Err(AdvisorError::InvalidBucket(other)),
        }
    }

    /// Map a questionnaire total to its bucket. Upper bounds are inclusive
    /// and every score lands in exactly one bucket.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=12 => RiskBucket::Conservative,
            13..=20 => RiskBucket::Moderate,
            21..=28 => RiskBucket::Balanced,
            29..=36 => RiskBucket::Growth,
            _ => RiskBucket::Aggressive,
        }
    }

    /// Inclusive score range that maps to this bucket.
    pub fn score_range(self) -> (u32, u32) {
        match self {
            RiskBucket::Conservative => (0, 12),
            RiskBucket::Moderate => (13, 20),
            RiskBucket::Balanced => (21, 28),
            RiskBucket::Growth => (29, 36),
            RiskBucket::Aggressive => (37, MAX_ATTAINABLE_SCORE),
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            RiskBucket::Conservative => "Conservador",
            RiskBucket::Moderate => "Moderado",
            RiskBucket::Balanced => "Balanceado",
            RiskBucket::Growth => "Crecimiento",
            RiskBucket::Aggressive => "Agresivo",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskBucket::Conservative => {
                "Perfil conservador que prioriza la preservación del capital por encima del crecimiento."
            }
            RiskBucket::Moderate => {
                "Perfil moderado que busca un balance entre seguridad y crecimiento modesto."
            }
            RiskBucket::Balanced => {
                "Perfil balanceado con distribución equilibrada entre riesgo y retorno."
            }
            RiskBucket::Growth => {
                "Perfil de crecimiento enfocado en maximizar retornos a largo plazo."
            }
            RiskBucket::Aggressive => {
                "Perfil agresivo que busca máximo crecimiento tolerando alta volatilidad."
            }
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.label())
    }
}

impl TryFrom<i64> for RiskBucket {
    type Error = AdvisorError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        RiskBucket::from_index(index)
    }
}

impl From<RiskBucket> for u8 {
    fn from(bucket: RiskBucket) -> u8 {
        bucket.index()
    }
}

// ---------------------------------------------------------------------------
// Model portfolio table
// ---------------------------------------------------------------------------

static MODEL_PORTFOLIOS: OnceLock<[Allocation; 5]> = OnceLock::new();

fn build_table() -> [Allocation; 5] {
    [
        Allocation::new()
            .with("BIL", dec!(0.30))
            .with("AGG", dec!(0.50))
            .with("ACWI", dec!(0.10))
            .with("GLD", dec!(0.10)),
        Allocation::new()
            .with("BIL", dec!(0.15))
            .with("AGG", dec!(0.35))
            .with("ACWI", dec!(0.30))
            .with("VNQ", dec!(0.10))
            .with("GLD", dec!(0.10)),
        Allocation::new()
            .with("BIL", dec!(0.05))
            .with("AGG", dec!(0.25))
            .with("ACWI", dec!(0.45))
            .with("VNQ", dec!(0.15))
            .with("GLD", dec!(0.10)),
        Allocation::new()
            .with("AGG", dec!(0.15))
            .with("ACWI", dec!(0.65))
            .with("VNQ", dec!(0.15))
            .with("GLD", dec!(0.05)),
        Allocation::new()
            .with("ACWI", dec!(0.80))
            .with("VNQ", dec!(0.15))
            .with("GLD", dec!(0.05)),
    ]
}

/// Model allocation for `bucket`. Returns an owned copy; the shared table is
/// never handed out mutably.
pub fn model_portfolio(bucket: RiskBucket) -> Allocation {
    MODEL_PORTFOLIOS.get_or_init(build_table)[bucket.index() as usize].clone()
}

/// Same as `model_portfolio` for a raw index, failing outside 0..=4.
pub fn model_portfolio_for_index(index: i64) -> AdvisorResult<Allocation> {
    RiskBucket::from_index(index).map(model_portfolio)
}

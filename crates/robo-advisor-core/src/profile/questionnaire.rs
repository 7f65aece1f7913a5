//! Typed questionnaire answers.
//!
//! Each categorical question is a closed enum over the exact (Spanish,
//! case-sensitive) option strings shown to the user. Raw JSON is checked once,
//! at the boundary, by `QuestionnaireAnswers::from_json`; anything past that
//! point is well typed and the scorer only has to check presence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdvisorError;
use crate::types::QuestionField;
use crate::AdvisorResult;

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;

macro_rules! answer_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, {
            $($variant:ident => ($label:literal, $points:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const FIELD: QuestionField = $field;

            /// Option text exactly as presented in the questionnaire.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Rubric points awarded for this answer.
            pub fn points(self) -> u32 {
                match self {
                    $($name::$variant => $points,)+
                }
            }

            pub fn options() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.label()).collect()
            }

            /// Parse an option string. Unknown text is an error, never zero points.
            pub fn parse(value: &str) -> AdvisorResult<Self> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(AdvisorError::InvalidEnumValue {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

answer_enum!(
    /// Investment horizon
    Horizon, QuestionField::Horizon, {
        UnderThreeYears => ("< 3 años", 0),
        ThreeToFiveYears => ("3-5 años", 2),
        FiveToTenYears => ("5-10 años", 4),
        OverTenYears => ("> 10 años", 5),
    }
);

answer_enum!(
    /// Share of income set aside for investing
    IncomeShare, QuestionField::Income, {
        UnderFivePct => ("< 5 %", 0),
        FiveToTenPct => ("5-10 %", 1),
        TenToTwentyPct => ("10-20 %", 3),
        OverTwentyPct => ("> 20 %", 4),
    }
);

answer_enum!(
    /// Self-assessed financial knowledge
    Knowledge, QuestionField::Knowledge, {
        Beginner => ("Principiante", 0),
        Intermediate => ("Intermedio", 2),
        Advanced => ("Avanzado", 4),
    }
);

answer_enum!(
    /// Largest tolerable portfolio drop
    MaxDrop, QuestionField::MaxDrop, {
        FivePct => ("5 %", 0),
        TenPct => ("10 %", 1),
        TwentyPct => ("20 %", 3),
        ThirtyPct => ("30 %", 4),
        OverThirtyPct => ("> 30 %", 5),
    }
);

answer_enum!(
    /// Reaction to a 15% portfolio fall
    Reaction, QuestionField::Reaction, {
        SellEverything => ("Vendo todo", 0),
        SellSome => ("Vendo una parte", 1),
        DoNothing => ("No hago nada", 3),
        BuyMore => ("Compro más", 5),
    }
);

answer_enum!(
    /// Need for liquidity
    Liquidity, QuestionField::Liquidity, {
        High => ("Alta", 0),
        Medium => ("Media", 2),
        Low => ("Baja", 4),
    }
);

answer_enum!(
    /// Main investment goal
    Goal, QuestionField::Goal, {
        ProtectCapital => ("Proteger capital", 0),
        RegularIncome => ("Ingresos regulares", 2),
        BalancedGrowth => ("Crecimiento balanceado", 3),
        MaximumGrowth => ("Máximo crecimiento", 5),
    }
);

answer_enum!(
    /// Concern about inflation
    InflationConcern, QuestionField::Inflation, {
        NotConcerned => ("No me preocupa", 0),
        Moderate => ("Me preocupa moderadamente", 2),
        VeryConcerned => ("Me preocupa mucho", 3),
    }
);

answer_enum!(
    /// Trust in digital investment platforms
    DigitalTrust, QuestionField::Digital, {
        Low => ("Baja", 0),
        Medium => ("Media", 1),
        High => ("Alta", 2),
    }
);

/// Investor age in whole years, within [`MIN_AGE`, `MAX_AGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Age(u32);

impl Age {
    pub fn new(years: u32) -> AdvisorResult<Self> {
        if !(MIN_AGE..=MAX_AGE).contains(&years) {
            return Err(AdvisorError::InvalidInput {
                field: QuestionField::Age.key().into(),
                reason: format!("Must be an integer between {MIN_AGE} and {MAX_AGE}"),
            });
        }
        Ok(Age(years))
    }

    pub fn years(self) -> u32 {
        self.0
    }

    /// Younger investors score higher.
    pub fn points(self) -> u32 {
        match self.0 {
            y if y < 30 => 5,
            y if y < 45 => 4,
            y if y < 60 => 2,
            _ => 0,
        }
    }
}

impl TryFrom<u32> for Age {
    type Error = AdvisorError;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        Age::new(years)
    }
}

impl From<Age> for u32 {
    fn from(age: Age) -> u32 {
        age.0
    }
}

/// One investor's answer set. Fields are optional so an incomplete form can
/// be represented; `profile::scoring::score` rejects it with `MissingField`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct QuestionnaireAnswers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Age>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon: Option<Horizon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<IncomeShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<Knowledge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drop: Option<MaxDrop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<Liquidity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inflation: Option<InflationConcern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digital: Option<DigitalTrust>,
}

impl QuestionnaireAnswers {
    /// Parse a raw JSON answer object.
    ///
    /// Absent or `null` fields become `None`. Present fields must carry a
    /// known option string (`InvalidEnumValue` otherwise); `age` must be an
    /// integer in range (`InvalidInput` otherwise). Unknown keys are ignored.
    /// Accepts either the bare object or one wrapped as `{"answers": {...}}`.
    pub fn from_json(value: &Value) -> AdvisorResult<Self> {
        let obj = match value.get("answers") {
            Some(inner @ Value::Object(_)) => inner,
            _ => value,
        };
        let map = obj.as_object().ok_or_else(|| AdvisorError::InvalidInput {
            field: "answers".into(),
            reason: "Expected a JSON object of questionnaire answers".into(),
        })?;

        let age = match map.get(QuestionField::Age.key()) {
            None | Some(Value::Null) => None,
            Some(v) => {
                let years = v
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| AdvisorError::InvalidInput {
                        field: QuestionField::Age.key().into(),
                        reason: format!("Expected an integer age, got {v}"),
                    })?;
                Some(Age::new(years)?)
            }
        };

        Ok(QuestionnaireAnswers {
            age,
            horizon: option_text(map, Horizon::FIELD)?.map(Horizon::parse).transpose()?,
            income: option_text(map, IncomeShare::FIELD)?.map(IncomeShare::parse).transpose()?,
            knowledge: option_text(map, Knowledge::FIELD)?.map(Knowledge::parse).transpose()?,
            max_drop: option_text(map, MaxDrop::FIELD)?.map(MaxDrop::parse).transpose()?,
            reaction: option_text(map, Reaction::FIELD)?.map(Reaction::parse).transpose()?,
            liquidity: option_text(map, Liquidity::FIELD)?.map(Liquidity::parse).transpose()?,
            goal: option_text(map, Goal::FIELD)?.map(Goal::parse).transpose()?,
            inflation: option_text(map, InflationConcern::FIELD)?
                .map(InflationConcern::parse)
                .transpose()?,
            digital: option_text(map, DigitalTrust::FIELD)?.map(DigitalTrust::parse).transpose()?,
        })
    }

    /// Fields that are still unanswered, in scoring order.
    pub fn missing_fields(&self) -> Vec<QuestionField> {
        QuestionField::ALL
            .into_iter()
            .filter(|f| !self.is_answered(*f))
            .collect()
    }

    pub fn is_answered(&self, field: QuestionField) -> bool {
        match field {
            QuestionField::Age => self.age.is_some(),
            QuestionField::Horizon => self.horizon.is_some(),
            QuestionField::Income => self.income.is_some(),
            QuestionField::Knowledge => self.knowledge.is_some(),
            QuestionField::MaxDrop => self.max_drop.is_some(),
            QuestionField::Reaction => self.reaction.is_some(),
            QuestionField::Liquidity => self.liquidity.is_some(),
            QuestionField::Goal => self.goal.is_some(),
            QuestionField::Inflation => self.inflation.is_some(),
            QuestionField::Digital => self.digital.is_some(),
        }
    }

    /// Clear one answer; used to model incomplete forms.
    pub fn without(mut self, field: QuestionField) -> Self {
        match field {
            QuestionField::Age => self.age = None,
            QuestionField::Horizon => self.horizon = None,
            QuestionField::Income => self.income = None,
            QuestionField::Knowledge => self.knowledge = None,
            QuestionField::MaxDrop => self.max_drop = None,
            QuestionField::Reaction => self.reaction = None,
            QuestionField::Liquidity => self.liquidity = None,
            QuestionField::Goal => self.goal = None,
            QuestionField::Inflation => self.inflation = None,
            QuestionField::Digital => self.digital = None,
        }
        self
    }
}

fn option_text(
    map: &serde_json::Map<String, Value>,
    field: QuestionField,
) -> AdvisorResult<Option<&str>> {
    match map.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(AdvisorError::InvalidEnumValue {
            field,
            value: other.to_string(),
        }),
    }
}

impl TryFrom<Value> for QuestionnaireAnswers {
    type Error = AdvisorError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        QuestionnaireAnswers::from_json(&value)
    }
}

// ---------------------------------------------------------------------------
// Questionnaire structure (what a form renderer needs)
// ---------------------------------------------------------------------------

/// How a question is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Slider,
    Select,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub key: QuestionField,
    pub title: String,
    pub kind: QuestionKind,
    pub category: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

fn select(key: QuestionField, title: &str, category: &str, options: Vec<&str>) -> QuestionSpec {
    QuestionSpec {
        key,
        title: title.to_string(),
        kind: QuestionKind::Select,
        category: category.to_string(),
        options: options.into_iter().map(String::from).collect(),
        min: None,
        max: None,
    }
}

/// The ten questions in presentation order.
pub fn questions() -> Vec<QuestionSpec> {
    vec![
        QuestionSpec {
            key: QuestionField::Age,
            title: "¿Cuál es tu edad?".into(),
            kind: QuestionKind::Slider,
            category: "demographics".into(),
            options: Vec::new(),
            min: Some(MIN_AGE),
            max: Some(MAX_AGE),
        },
        select(
            QuestionField::Horizon,
            "Horizonte de inversión",
            "investment",
            Horizon::options(),
        ),
        select(
            QuestionField::Income,
            "% de ingresos para invertir",
            "financial",
            IncomeShare::options(),
        ),
        select(
            QuestionField::Knowledge,
            "Conocimiento financiero",
            "experience",
            Knowledge::options(),
        ),
        select(
            QuestionField::MaxDrop,
            "Caída máxima tolerable",
            "risk_tolerance",
            MaxDrop::options(),
        ),
        select(
            QuestionField::Reaction,
            "Si tu portafolio cae 15%",
            "behavior",
            Reaction::options(),
        ),
        select(
            QuestionField::Liquidity,
            "Necesidad de liquidez",
            "preferences",
            Liquidity::options(),
        ),
        select(
            QuestionField::Goal,
            "Objetivo principal",
            "objectives",
            Goal::options(),
        ),
        select(
            QuestionField::Inflation,
            "Preocupación por inflación",
            "concerns",
            InflationConcern::options(),
        ),
        select(
            QuestionField::Digital,
            "Confianza en plataformas digitales",
            "preferences",
            DigitalTrust::options(),
        ),
    ]
}

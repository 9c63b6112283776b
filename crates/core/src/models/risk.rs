use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Aggregate questionnaire score.
///
/// Nine single-select answers worth 1–4 each plus the prior-investment answer
/// worth 0–3, so every reachable score lies in `MIN..=MAX` (9–39).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MIN: u8 = 9;
    pub const MAX: u8 = 39;

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(CoreError::Validation(format!(
                "risk score {value} outside {}..={}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RiskScore {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk tolerance bucket, ordered from least to most risk-seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Conservative,
    Moderate,
    Growth,
    Aggressive,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Conservative,
        RiskCategory::Moderate,
        RiskCategory::Growth,
        RiskCategory::Aggressive,
    ];

    /// Highest score (inclusive) that still falls into each category.
    const CONSERVATIVE_MAX: u8 = 17;
    const MODERATE_MAX: u8 = 24;
    const GROWTH_MAX: u8 = 32;

    pub fn from_score(score: RiskScore) -> Self {
        match score.value() {
            s if s <= Self::CONSERVATIVE_MAX => RiskCategory::Conservative,
            s if s <= Self::MODERATE_MAX => RiskCategory::Moderate,
            s if s <= Self::GROWTH_MAX => RiskCategory::Growth,
            _ => RiskCategory::Aggressive,
        }
    }

    pub fn from_label(label: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| CoreError::Deserialization(format!("unknown risk category: {label}")))
    }

    /// Headline investment strategy shown alongside the classification.
    pub fn strategy(self) -> &'static str {
        match self {
            RiskCategory::Conservative => {
                "Focus on capital preservation: 80% bonds, 15% large-cap stocks, 5% cash."
            }
            RiskCategory::Moderate => "Balanced approach: 50% stocks, 40% bonds, 10% alternatives.",
            RiskCategory::Growth => "Higher growth potential: 70% stocks, 25% bonds, 5% cash.",
            RiskCategory::Aggressive => "Maximize growth: 90% equities, including emerging markets.",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Conservative => write!(f, "Conservative"),
            RiskCategory::Moderate => write!(f, "Moderate"),
            RiskCategory::Growth => write!(f, "Growth"),
            RiskCategory::Aggressive => write!(f, "Aggressive"),
        }
    }
}

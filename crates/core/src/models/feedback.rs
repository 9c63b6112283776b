use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::RiskCategory;

/// Answer to "Do you agree with your risk profile classification?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileAgreement {
    Yes,
    No,
    #[serde(rename = "Not sure")]
    NotSure,
}

impl ProfileAgreement {
    pub const ALL: [ProfileAgreement; 3] = [
        ProfileAgreement::Yes,
        ProfileAgreement::No,
        ProfileAgreement::NotSure,
    ];
}

impl std::fmt::Display for ProfileAgreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileAgreement::Yes => write!(f, "Yes"),
            ProfileAgreement::No => write!(f, "No"),
            ProfileAgreement::NotSure => write!(f, "Not sure"),
        }
    }
}

/// Answer to "Do you agree with the ETF recommendation and strategy?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationAgreement {
    Yes,
    No,
    Somewhat,
}

impl RecommendationAgreement {
    pub const ALL: [RecommendationAgreement; 3] = [
        RecommendationAgreement::Yes,
        RecommendationAgreement::No,
        RecommendationAgreement::Somewhat,
    ];
}

impl std::fmt::Display for RecommendationAgreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationAgreement::Yes => write!(f, "Yes"),
            RecommendationAgreement::No => write!(f, "No"),
            RecommendationAgreement::Somewhat => write!(f, "Somewhat"),
        }
    }
}

/// One row of the feedback log. Written once, never updated.
///
/// Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub risk_profile: RiskCategory,
    pub agree_profile: ProfileAgreement,
    pub agree_recommendation: RecommendationAgreement,
}

impl FeedbackRecord {
    pub fn new(
        user_id: impl Into<String>,
        risk_profile: RiskCategory,
        agree_profile: ProfileAgreement,
        agree_recommendation: RecommendationAgreement,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: Utc::now(),
            risk_profile,
            agree_profile,
            agree_recommendation,
        }
    }

    pub const CSV_HEADER: [&'static str; 5] = [
        "user_id",
        "timestamp",
        "risk_profile",
        "agree_profile",
        "agree_recommendation",
    ];
}

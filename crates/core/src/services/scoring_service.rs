use std::collections::BTreeSet;

use crate::errors::CoreError;
use crate::models::questionnaire::{AnswerOption, PriorInvestment, QuestionnaireResponse};
use crate::models::risk::{RiskCategory, RiskScore};

/// Turns questionnaire answers into a risk score and category.
///
/// Scoring is a plain sum: each of the nine single-select answers is worth
/// 1–4 according to its own question's table, and the prior-investment
/// multi-select adds the score of its riskiest selection (0–3, or 0 when
/// nothing is selected).
pub struct ScoringService;

impl ScoringService {
    pub fn new() -> Self {
        Self
    }

    /// Score a complete response. Fails with `IncompleteResponse` naming every
    /// unanswered required question.
    pub fn score(&self, response: &QuestionnaireResponse) -> Result<RiskScore, CoreError> {
        let (
            Some(horizon),
            Some(expected_return),
            Some(drawdown_reaction),
            Some(loss_tolerance),
            Some(knowledge),
            Some(market_behaviour),
            Some(risk_appetite),
            Some(income_stability),
            Some(asset_share),
        ) = (
            response.horizon,
            response.expected_return,
            response.drawdown_reaction,
            response.loss_tolerance,
            response.knowledge,
            response.market_behaviour,
            response.risk_appetite,
            response.income_stability,
            response.asset_share,
        )
        else {
            return Err(CoreError::IncompleteResponse {
                missing: response.missing(),
            });
        };

        let single_select = [
            horizon.score(),
            expected_return.score(),
            drawdown_reaction.score(),
            loss_tolerance.score(),
            knowledge.score(),
            market_behaviour.score(),
            risk_appetite.score(),
            income_stability.score(),
            asset_share.score(),
        ];
        let total: u8 =
            single_select.iter().sum::<u8>() + self.experience_score(&response.experience);

        RiskScore::new(total)
    }

    /// Score of the riskiest prior investment selected, 0 for none.
    pub fn experience_score(&self, selected: &BTreeSet<PriorInvestment>) -> u8 {
        selected.iter().map(|p| p.score()).max().unwrap_or(0)
    }

    pub fn classify(&self, score: RiskScore) -> RiskCategory {
        RiskCategory::from_score(score)
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new()
    }
}

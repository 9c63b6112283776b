use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::CoreError;

/// The ten questionnaire slots, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionId {
    Horizon,
    ExpectedReturn,
    DrawdownReaction,
    LossTolerance,
    /// Multi-select; the only optional slot.
    Experience,
    Knowledge,
    MarketBehaviour,
    RiskAppetite,
    IncomeStability,
    AssetShare,
}

impl QuestionId {
    pub const ALL: [QuestionId; 10] = [
        QuestionId::Horizon,
        QuestionId::ExpectedReturn,
        QuestionId::DrawdownReaction,
        QuestionId::LossTolerance,
        QuestionId::Experience,
        QuestionId::Knowledge,
        QuestionId::MarketBehaviour,
        QuestionId::RiskAppetite,
        QuestionId::IncomeStability,
        QuestionId::AssetShare,
    ];

    /// 1-based position in the questionnaire.
    pub fn number(self) -> u8 {
        match self {
            QuestionId::Horizon => 1,
            QuestionId::ExpectedReturn => 2,
            QuestionId::DrawdownReaction => 3,
            QuestionId::LossTolerance => 4,
            QuestionId::Experience => 5,
            QuestionId::Knowledge => 6,
            QuestionId::MarketBehaviour => 7,
            QuestionId::RiskAppetite => 8,
            QuestionId::IncomeStability => 9,
            QuestionId::AssetShare => 10,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            QuestionId::Horizon => "What is your intended investment horizon?",
            QuestionId::ExpectedReturn => "What is your expected annual return?",
            QuestionId::DrawdownReaction => {
                "What would you do if your investment dropped 20% in the short term?"
            }
            QuestionId::LossTolerance => "What is the maximum annual loss you could tolerate?",
            QuestionId::Experience => "What have you invested in before?",
            QuestionId::Knowledge => "How would you rate your investment knowledge?",
            QuestionId::MarketBehaviour => "When markets fluctuate sharply, you are more likely to:",
            QuestionId::RiskAppetite => "How much risk are you willing to take for higher returns?",
            QuestionId::IncomeStability => "Is your income stable and predictable?",
            QuestionId::AssetShare => "What percentage of your total assets do you plan to invest?",
        }
    }

    pub fn is_multi_select(self) -> bool {
        self == QuestionId::Experience
    }

    /// Option labels exactly as presented to the user, lowest score first.
    pub fn option_labels(self) -> Vec<&'static str> {
        match self {
            QuestionId::Horizon => InvestmentHorizon::labels(),
            QuestionId::ExpectedReturn => ExpectedReturn::labels(),
            QuestionId::DrawdownReaction => DrawdownReaction::labels(),
            QuestionId::LossTolerance => LossTolerance::labels(),
            QuestionId::Experience => PriorInvestment::labels(),
            QuestionId::Knowledge => KnowledgeLevel::labels(),
            QuestionId::MarketBehaviour => MarketBehaviour::labels(),
            QuestionId::RiskAppetite => RiskAppetite::labels(),
            QuestionId::IncomeStability => IncomeStability::labels(),
            QuestionId::AssetShare => AssetShare::labels(),
        }
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// An answer option belonging to exactly one question.
///
/// Each question has its own enum, so identical label text in two questions
/// ("Moderate" in knowledge vs. risk appetite) can never share a score.
pub trait AnswerOption: Copy + Sized + 'static {
    const QUESTION: QuestionId;
    const OPTIONS: &'static [Self];

    fn label(self) -> &'static str;

    /// Risk-seeking weight of this answer; less risk-seeking answers score lower.
    fn score(self) -> u8;

    fn labels() -> Vec<&'static str> {
        Self::OPTIONS.iter().map(|o| o.label()).collect()
    }

    fn from_label(label: &str) -> Result<Self, CoreError> {
        let wanted = label.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|o| o.label() == wanted)
            .ok_or_else(|| CoreError::UnknownOption {
                question: Self::QUESTION,
                label: label.to_string(),
            })
    }
}

macro_rules! answer_options {
    (
        $(#[$meta:meta])*
        $name:ident for $question:ident {
            $( $variant:ident => ($label:literal, $score:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl AnswerOption for $name {
            const QUESTION: QuestionId = QuestionId::$question;
            const OPTIONS: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn score(self) -> u8 {
                match self {
                    $($name::$variant => $score),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

answer_options! {
    /// Q1
    InvestmentHorizon for Horizon {
        LessThanOneYear => ("Less than 1 year", 1),
        OneToThreeYears => ("1–3 years", 2),
        ThreeToFiveYears => ("3–5 years", 3),
        MoreThanFiveYears => ("More than 5 years", 4),
    }
}

answer_options! {
    /// Q2
    ExpectedReturn for ExpectedReturn {
        BelowThreePercent => ("Less than 3%", 1),
        ThreeToSixPercent => ("3%–6%", 2),
        SixToTenPercent => ("6%–10%", 3),
        AboveTenPercent => ("Above 10%", 4),
    }
}

answer_options! {
    /// Q3: reaction to a 20% short-term drop.
    DrawdownReaction for DrawdownReaction {
        SellAll => ("Sell all", 1),
        SellPart => ("Sell part", 2),
        DoNothing => ("Do nothing", 3),
        BuyMore => ("Buy more", 4),
    }
}

answer_options! {
    /// Q4: maximum tolerable annual loss.
    LossTolerance for LossTolerance {
        BelowFivePercent => ("Less than 5%", 1),
        FiveToTenPercent => ("5%–10%", 2),
        TenToFifteenPercent => ("10%–15%", 3),
        AboveFifteenPercent => ("More than 15%", 4),
    }
}

answer_options! {
    /// Q5 (multi-select). Scores run 0–3 and only the highest selection counts.
    PriorInvestment for Experience {
        Deposits => ("Deposits", 0),
        Bonds => ("Bonds", 1),
        Stocks => ("Stocks", 2),
        Funds => ("Derivatives, Mutual Funds, ETFs", 3),
    }
}

answer_options! {
    /// Q6
    KnowledgeLevel for Knowledge {
        Novice => ("Novice", 1),
        Moderate => ("Moderate", 2),
        Knowledgeable => ("Knowledgeable", 3),
        Professional => ("Professional", 4),
    }
}

answer_options! {
    /// Q7
    MarketBehaviour for MarketBehaviour {
        ExitAnxiously => ("Feel anxious and exit", 1),
        MonitorAndWorry => ("Monitor but worry", 2),
        AnalyzeAndHold => ("Analyze and hold", 3),
        RebalanceOrBuy => ("Rebalance or buy more", 4),
    }
}

answer_options! {
    /// Q8. Note "Moderate" scores 3 here, unlike Q6.
    RiskAppetite for RiskAppetite {
        VeryLittle => ("Very little", 1),
        Limited => ("Some", 2),
        Moderate => ("Moderate", 3),
        High => ("High risk", 4),
    }
}

answer_options! {
    /// Q9
    IncomeStability for IncomeStability {
        VeryUnstable => ("Very unstable", 1),
        SometimesFluctuating => ("Sometimes fluctuating", 2),
        RelativelyStable => ("Relatively stable", 3),
        VeryStable => ("Very stable", 4),
    }
}

answer_options! {
    /// Q10. Investing a smaller share of total assets scores higher.
    AssetShare for AssetShare {
        AboveSeventyFive => ("More than 75%", 1),
        FiftyToSeventyFive => ("50%–75%", 2),
        TwentyFiveToFifty => ("25%–50%", 3),
        BelowTwentyFive => ("Less than 25%", 4),
    }
}

/// The user's answers. Built incrementally; frozen by the session once submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireResponse {
    pub horizon: Option<InvestmentHorizon>,
    pub expected_return: Option<ExpectedReturn>,
    pub drawdown_reaction: Option<DrawdownReaction>,
    pub loss_tolerance: Option<LossTolerance>,
    pub experience: BTreeSet<PriorInvestment>,
    pub knowledge: Option<KnowledgeLevel>,
    pub market_behaviour: Option<MarketBehaviour>,
    pub risk_appetite: Option<RiskAppetite>,
    pub income_stability: Option<IncomeStability>,
    pub asset_share: Option<AssetShare>,
}

impl QuestionnaireResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer by its label. For the multi-select question the label
    /// is added to the existing selection.
    pub fn answer(&mut self, question: QuestionId, label: &str) -> Result<(), CoreError> {
        match question {
            QuestionId::Horizon => self.horizon = Some(InvestmentHorizon::from_label(label)?),
            QuestionId::ExpectedReturn => {
                self.expected_return = Some(ExpectedReturn::from_label(label)?)
            }
            QuestionId::DrawdownReaction => {
                self.drawdown_reaction = Some(DrawdownReaction::from_label(label)?)
            }
            QuestionId::LossTolerance => {
                self.loss_tolerance = Some(LossTolerance::from_label(label)?)
            }
            QuestionId::Experience => {
                self.experience.insert(PriorInvestment::from_label(label)?);
            }
            QuestionId::Knowledge => self.knowledge = Some(KnowledgeLevel::from_label(label)?),
            QuestionId::MarketBehaviour => {
                self.market_behaviour = Some(MarketBehaviour::from_label(label)?)
            }
            QuestionId::RiskAppetite => self.risk_appetite = Some(RiskAppetite::from_label(label)?),
            QuestionId::IncomeStability => {
                self.income_stability = Some(IncomeStability::from_label(label)?)
            }
            QuestionId::AssetShare => self.asset_share = Some(AssetShare::from_label(label)?),
        }
        Ok(())
    }

    /// Reset a slot to unanswered (or an empty selection for Q5).
    pub fn clear(&mut self, question: QuestionId) {
        match question {
            QuestionId::Horizon => self.horizon = None,
            QuestionId::ExpectedReturn => self.expected_return = None,
            QuestionId::DrawdownReaction => self.drawdown_reaction = None,
            QuestionId::LossTolerance => self.loss_tolerance = None,
            QuestionId::Experience => self.experience.clear(),
            QuestionId::Knowledge => self.knowledge = None,
            QuestionId::MarketBehaviour => self.market_behaviour = None,
            QuestionId::RiskAppetite => self.risk_appetite = None,
            QuestionId::IncomeStability => self.income_stability = None,
            QuestionId::AssetShare => self.asset_share = None,
        }
    }

    /// Required questions that have no answer yet, in questionnaire order.
    pub fn missing(&self) -> Vec<QuestionId> {
        let answered = [
            (QuestionId::Horizon, self.horizon.is_some()),
            (QuestionId::ExpectedReturn, self.expected_return.is_some()),
            (QuestionId::DrawdownReaction, self.drawdown_reaction.is_some()),
            (QuestionId::LossTolerance, self.loss_tolerance.is_some()),
            (QuestionId::Knowledge, self.knowledge.is_some()),
            (QuestionId::MarketBehaviour, self.market_behaviour.is_some()),
            (QuestionId::RiskAppetite, self.risk_appetite.is_some()),
            (QuestionId::IncomeStability, self.income_stability.is_some()),
            (QuestionId::AssetShare, self.asset_share.is_some()),
        ];
        answered
            .into_iter()
            .filter(|(_, done)| !done)
            .map(|(q, _)| q)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

use crate::models::allocation::{AllocationPlan, Instrument, PlanHolding};
use crate::models::risk::RiskCategory;

/// Static mapping from risk category to a sample ETF allocation.
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Target weights for `category`, headline instrument first.
    pub fn plan_for(&self, category: RiskCategory) -> AllocationPlan {
        let holdings: &[(Instrument, f64)] = match category {
            RiskCategory::Conservative => &[(Instrument::Vea, 0.6), (Instrument::Vti, 0.4)],
            RiskCategory::Moderate => &[(Instrument::Spy, 0.5), (Instrument::Vti, 0.5)],
            RiskCategory::Growth => &[(Instrument::Qqq, 0.6), (Instrument::Spy, 0.4)],
            RiskCategory::Aggressive => &[(Instrument::Qqq, 0.6), (Instrument::Eem, 0.4)],
        };

        AllocationPlan {
            category,
            holdings: holdings
                .iter()
                .map(|&(instrument, weight)| PlanHolding { instrument, weight })
                .collect(),
        }
    }

    /// The ETF suggested for the single-instrument illustration.
    pub fn headline_instrument(&self, category: RiskCategory) -> Instrument {
        match category {
            RiskCategory::Conservative => Instrument::Vea,
            RiskCategory::Moderate => Instrument::Spy,
            RiskCategory::Growth | RiskCategory::Aggressive => Instrument::Qqq,
        }
    }

    pub fn rationale(&self, instrument: Instrument) -> &'static str {
        instrument.rationale()
    }

    /// Every instrument a user may pick for the single-ETF illustration.
    pub fn catalogue(&self) -> &'static [Instrument] {
        &Instrument::ALL
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}

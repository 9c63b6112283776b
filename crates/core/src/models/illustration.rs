use serde::{Deserialize, Serialize};

use super::allocation::{AllocationPlan, Instrument, PlanHolding};
use super::risk::{RiskCategory, RiskScore};
use super::settings::WeightPolicy;
use super::simulation::PortfolioTrajectory;

/// Result of a submitted questionnaire, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub score: RiskScore,
    pub category: RiskCategory,
    pub strategy: String,
    pub plan: AllocationPlan,
    /// Instrument suggested for the single-ETF illustration.
    pub headline: Instrument,
}

/// Growth illustration for a single ETF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentIllustration {
    pub instrument: Instrument,
    pub initial_investment: f64,
    pub trajectory: PortfolioTrajectory,
    pub latest_close: Option<f64>,
    /// Degraded-data notices (fetch failures, padding, assumed rates).
    pub warnings: Vec<String>,
}

/// Growth illustration for the recommended, weighted portfolio.
///
/// `trajectory` is `None` when no instrument of the plan had usable data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioIllustration {
    pub plan: AllocationPlan,
    pub initial_investment: f64,
    pub policy: WeightPolicy,
    /// Effective weights applied to the instruments that had data.
    pub included: Vec<PlanHolding>,
    pub excluded: Vec<Instrument>,
    pub trajectory: Option<PortfolioTrajectory>,
    pub warnings: Vec<String>,
}

impl PortfolioIllustration {
    pub fn is_complete(&self) -> bool {
        self.trajectory.is_some() && self.excluded.is_empty()
    }
}

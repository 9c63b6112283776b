use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::risk::RiskCategory;

/// The sample ETFs used for illustrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Instrument {
    Spy,
    Qqq,
    Vti,
    Vea,
    Eem,
}

impl Instrument {
    /// Catalogue order used when listing instruments to the user.
    pub const ALL: [Instrument; 5] = [
        Instrument::Spy,
        Instrument::Qqq,
        Instrument::Vti,
        Instrument::Vea,
        Instrument::Eem,
    ];

    /// Exchange ticker symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Instrument::Spy => "SPY",
            Instrument::Qqq => "QQQ",
            Instrument::Vti => "VTI",
            Instrument::Vea => "VEA",
            Instrument::Eem => "EEM",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Spy => "S&P 500",
            Instrument::Qqq => "Nasdaq 100",
            Instrument::Vti => "Total US Market",
            Instrument::Vea => "Developed Markets ex-US",
            Instrument::Eem => "Emerging Markets",
        }
    }

    /// Full fund name as listed by the issuer.
    pub fn fund_name(self) -> &'static str {
        match self {
            Instrument::Spy => "SPDR S&P 500 ETF Trust",
            Instrument::Qqq => "Invesco QQQ Trust, Series 1",
            Instrument::Vti => "Vanguard Total Stock Market Index Fund ETF",
            Instrument::Vea => "Vanguard FTSE Developed Markets Index Fund ETF",
            Instrument::Eem => "iShares MSCI Emerging Markets ETF",
        }
    }

    /// Morningstar-style fund category.
    pub fn category(self) -> &'static str {
        match self {
            Instrument::Spy | Instrument::Vti => "Large Blend",
            Instrument::Qqq => "Large Growth",
            Instrument::Vea => "Foreign Large Blend",
            Instrument::Eem => "Diversified Emerging Mkts",
        }
    }

    /// Why someone might hold this ETF. Presentation text only.
    pub fn rationale(self) -> &'static str {
        match self {
            Instrument::Spy => "Broad market exposure to large-cap U.S. companies.",
            Instrument::Qqq => "Focused on technology and growth-oriented companies.",
            Instrument::Vti => "Diversified U.S. equity exposure including small and mid caps.",
            Instrument::Vea => "Exposure to developed markets outside of the U.S.",
            Instrument::Eem => "High-risk, high-return exposure to emerging economies.",
        }
    }

    /// Case-insensitive symbol lookup.
    pub fn from_symbol(symbol: &str) -> Result<Self, CoreError> {
        let upper = symbol.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|i| i.symbol() == upper)
            .ok_or_else(|| CoreError::Validation(format!("unknown instrument: {symbol}")))
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol(), self.name())
    }
}

/// One position of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanHolding {
    pub instrument: Instrument,
    /// Fraction of the portfolio, 0.0–1.0.
    pub weight: f64,
}

/// Target weights for a risk category. Holdings are listed headline first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub category: RiskCategory,
    pub holdings: Vec<PlanHolding>,
}

impl AllocationPlan {
    pub fn weight_of(&self, instrument: Instrument) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.instrument == instrument)
            .map(|h| h.weight)
    }

    pub fn instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        self.holdings.iter().map(|h| h.instrument)
    }

    pub fn total_weight(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}

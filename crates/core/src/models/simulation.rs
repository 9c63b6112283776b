use serde::{Deserialize, Serialize};

/// Annual fractional returns for one instrument, oldest year first.
/// May be empty or shorter than the simulated horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub symbol: String,
    pub returns: Vec<f64>,
    /// Last observed close in the fetched window, if any prices came back.
    pub latest_close: Option<f64>,
}

impl ReturnSeries {
    pub fn new(symbol: impl Into<String>, returns: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            returns,
            latest_close: None,
        }
    }

    pub fn with_latest_close(mut self, close: Option<f64>) -> Self {
        self.latest_close = close;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Where the per-period returns of a trajectory came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnBasis {
    /// Every period used an observed return.
    Historical { years: usize },
    /// `observed` periods used data, the rest repeat `mean`.
    PaddedWithMean { observed: usize, mean: f64 },
    /// No data at all: every period uses the fixed `rate`.
    AssumedRate { rate: f64 },
}

impl ReturnBasis {
    pub fn is_fully_historical(&self) -> bool {
        matches!(self, ReturnBasis::Historical { .. })
    }

    /// Human-readable note for any non-historical basis.
    pub fn disclosure(&self) -> Option<String> {
        match self {
            ReturnBasis::Historical { .. } => None,
            ReturnBasis::PaddedWithMean { observed, mean } => Some(format!(
                "Only {observed} year(s) of history available; later years assume the historical average of {:.2}%.",
                mean * 100.0
            )),
            ReturnBasis::AssumedRate { rate } => Some(format!(
                "No historical data available; every year assumes a {:.0}% return.",
                rate * 100.0
            )),
        }
    }
}

/// Simulated portfolio values: `values[0]` is the initial investment and each
/// later entry compounds the previous one with `returns[i - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTrajectory {
    pub values: Vec<f64>,
    pub returns: Vec<f64>,
    pub basis: ReturnBasis,
}

impl PortfolioTrajectory {
    pub fn horizon_years(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn initial_value(&self) -> f64 {
        self.values.first().copied().unwrap_or_default()
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or_default()
    }

    /// Overall gain relative to the initial investment, in percent.
    pub fn total_return_pct(&self) -> f64 {
        let initial = self.initial_value();
        if initial > 0.0 {
            (self.final_value() - initial) / initial * 100.0
        } else {
            0.0
        }
    }
}

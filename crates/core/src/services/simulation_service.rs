use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::allocation::{AllocationPlan, Instrument, PlanHolding};
use crate::models::settings::WeightPolicy;
use crate::models::simulation::{mean, PortfolioTrajectory, ReturnBasis, ReturnSeries};

/// Annual return assumed when an instrument has no history at all.
pub const FALLBACK_ANNUAL_RETURN: f64 = 0.07;

/// Per-period returns of a weighted portfolio, plus which plan positions
/// actually contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendedReturns {
    pub returns: Vec<f64>,
    /// Effective weights of the instruments that had data.
    pub included: Vec<PlanHolding>,
    pub excluded: Vec<Instrument>,
}

/// Compound-growth illustrations. Pure arithmetic, no I/O.
///
/// These are simulations over past or assumed returns, not forecasts.
pub struct SimulationService {
    fallback_return: f64,
}

impl SimulationService {
    pub fn new() -> Self {
        Self {
            fallback_return: FALLBACK_ANNUAL_RETURN,
        }
    }

    /// Compound `initial` over `horizon_years` periods.
    ///
    /// Returns are used in order. Beyond the end of `returns` the mean of the
    /// available returns repeats; with no returns at all the fallback rate
    /// applies to every period. Extra returns past the horizon are ignored.
    pub fn simulate(
        &self,
        initial: f64,
        horizon_years: u32,
        returns: &[f64],
    ) -> Result<PortfolioTrajectory, CoreError> {
        if horizon_years == 0 {
            return Err(CoreError::InvalidHorizon(horizon_years));
        }
        let horizon = horizon_years as usize;

        let observed = &returns[..returns.len().min(horizon)];
        let (fill, basis) = match mean(returns) {
            None => (
                self.fallback_return,
                ReturnBasis::AssumedRate {
                    rate: self.fallback_return,
                },
            ),
            Some(avg) if observed.len() < horizon => (
                avg,
                ReturnBasis::PaddedWithMean {
                    observed: observed.len(),
                    mean: avg,
                },
            ),
            Some(avg) => (avg, ReturnBasis::Historical { years: horizon }),
        };

        let applied: Vec<f64> = observed
            .iter()
            .copied()
            .chain(std::iter::repeat(fill))
            .take(horizon)
            .collect();

        let mut values = Vec::with_capacity(horizon + 1);
        values.push(initial);
        let mut current = initial;
        for r in &applied {
            current *= 1.0 + r;
            values.push(current);
        }

        Ok(PortfolioTrajectory {
            values,
            returns: applied,
            basis,
        })
    }

    /// Weighted per-period returns for `plan` from whatever series are available.
    ///
    /// Instruments without a series (or with an empty one) are excluded. The
    /// blended series is as long as the shortest included series. Fails with
    /// `InsufficientData` when nothing is left to blend.
    pub fn blend(
        &self,
        plan: &AllocationPlan,
        series: &HashMap<Instrument, ReturnSeries>,
        policy: WeightPolicy,
    ) -> Result<BlendedReturns, CoreError> {
        let mut usable: Vec<(PlanHolding, &ReturnSeries)> = Vec::new();
        let mut excluded = Vec::new();
        for holding in &plan.holdings {
            match series.get(&holding.instrument).filter(|s| !s.is_empty()) {
                Some(s) => usable.push((*holding, s)),
                None => excluded.push(holding.instrument),
            }
        }

        if usable.is_empty() {
            return Err(CoreError::InsufficientData(format!(
                "no return data for any instrument of the {} plan",
                plan.category
            )));
        }

        if policy == WeightPolicy::Renormalize {
            let total: f64 = usable.iter().map(|(h, _)| h.weight).sum();
            if total > 0.0 {
                for (holding, _) in &mut usable {
                    holding.weight /= total;
                }
            }
        }

        let periods = usable.iter().map(|(_, s)| s.len()).min().unwrap_or(0);
        let returns: Vec<f64> = (0..periods)
            .map(|i| usable.iter().map(|(h, s)| h.weight * s.returns[i]).sum::<f64>())
            .collect();

        Ok(BlendedReturns {
            returns,
            included: usable.into_iter().map(|(h, _)| h).collect(),
            excluded,
        })
    }

    /// Blend then compound: the recommended-portfolio illustration.
    pub fn simulate_blended(
        &self,
        initial: f64,
        horizon_years: u32,
        plan: &AllocationPlan,
        series: &HashMap<Instrument, ReturnSeries>,
        policy: WeightPolicy,
    ) -> Result<(PortfolioTrajectory, BlendedReturns), CoreError> {
        if horizon_years == 0 {
            return Err(CoreError::InvalidHorizon(horizon_years));
        }
        let blended = self.blend(plan, series, policy)?;
        let trajectory = self.simulate(initial, horizon_years, &blended.returns)?;
        Ok((trajectory, blended))
    }
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{Months, NaiveDate};

use crate::errors::CoreError;
use crate::models::price::{annual_returns, latest_close, PricePoint};
use crate::models::simulation::ReturnSeries;
use crate::providers::registry::MarketDataRegistry;

/// Fetches price history and turns it into annual return series.
///
/// One best-effort request per provider: no retries, no caching here (the
/// session keeps the outcome for its own lifetime).
pub struct MarketDataService {
    registry: MarketDataRegistry,
}

impl MarketDataService {
    pub fn new(registry: MarketDataRegistry) -> Self {
        Self { registry }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Annual returns of `symbol` over the last `lookback_years` years.
    pub async fn fetch_annual_returns(
        &self,
        symbol: &str,
        lookback_years: u32,
    ) -> Result<ReturnSeries, CoreError> {
        let today = chrono::Utc::now().date_naive();
        self.fetch_annual_returns_as_of(symbol, lookback_years, today)
            .await
    }

    /// Same as [`fetch_annual_returns`](Self::fetch_annual_returns) with an explicit end date.
    ///
    /// The result may be empty when providers answered but had too little
    /// history. All providers failing yields `DataUnavailable`.
    pub async fn fetch_annual_returns_as_of(
        &self,
        symbol: &str,
        lookback_years: u32,
        today: NaiveDate,
    ) -> Result<ReturnSeries, CoreError> {
        let from = today
            .checked_sub_months(Months::new(lookback_years.saturating_mul(12)))
            .ok_or_else(|| {
                CoreError::Validation(format!("lookback of {lookback_years} years is out of range"))
            })?;

        let points = self.fetch_price_range(symbol, from, today).await?;
        let returns = annual_returns(&points);
        tracing::debug!(
            symbol,
            prices = points.len(),
            years = returns.len(),
            "fetched annual returns"
        );

        Ok(ReturnSeries::new(symbol, returns).with_latest_close(latest_close(&points)))
    }

    /// Tries providers in registration order. A provider that errors or
    /// returns no points hands over to the next one.
    async fn fetch_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        let mut answered_empty = false;

        for provider in &providers {
            match provider.get_price_range(symbol, from, to).await {
                Ok(points) => {
                    let points: Vec<PricePoint> = points
                        .into_iter()
                        .filter(|p| p.price.is_finite() && p.price > 0.0)
                        .collect();
                    if !points.is_empty() {
                        return Ok(points);
                    }
                    answered_empty = true;
                    tracing::warn!(provider = provider.name(), symbol, "provider returned no prices");
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), symbol, error = %e, "price fetch failed");
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        if answered_empty {
            return Ok(Vec::new());
        }
        Err(CoreError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no provider returned data".into()),
        })
    }
}

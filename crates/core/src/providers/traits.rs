use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Source of historical closing prices for exchange-traded instruments.
///
/// Each API (Yahoo Finance, Alpha Vantage) implements this trait; the
/// market data service only ever talks to the trait, so tests can swap in
/// an offline provider.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Closing prices for `symbol` between `from` and `to` (inclusive).
    /// An empty Vec means the provider knows the symbol but has no data.
    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}

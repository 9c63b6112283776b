use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance provider for ETF price history.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Wraps the `yahoo_finance_api` crate. Prices come back in the fund's
/// listing currency (USD for every instrument in the catalogue).
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Midnight UTC on `date`, as the `time` crate type the connector expects.
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: String| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid date {date}: {e}"),
        };

        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(e.to_string()))?
            .with_hms(0, 0, 0)
            .map_err(|e| invalid(e.to_string()))?
            .assume_utc();
        Ok(odt)
    }

    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    /// Split- and dividend-adjusted closes inside `[from, to]`.
    fn points_from_quotes(
        quotes: &[yahoo_finance_api::Quote],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<PricePoint> {
        quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                (date >= from && date <= to).then_some(PricePoint {
                    date,
                    price: q.adjclose,
                })
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        Ok(Self::points_from_quotes(&quotes, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_becomes_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let odt = YahooFinanceProvider::to_offset_datetime(date).unwrap();
        assert_eq!(odt.unix_timestamp(), 1_709_164_800);
    }

    fn quote(y: i32, m: u32, d: u32, close: f64, adjclose: f64) -> yahoo_finance_api::Quote {
        let timestamp = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        yahoo_finance_api::Quote {
            timestamp,
            open: close,
            high: close,
            low: close,
            volume: 1_000,
            close,
            adjclose,
        }
    }

    #[test]
    fn history_uses_adjusted_closes() {
        // Raw closes are flat; the adjusted series carries a 10% payout.
        let quotes = vec![
            quote(2022, 12, 30, 100.0, 90.0),
            quote(2023, 12, 29, 100.0, 99.0),
        ];
        let from = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

        let points = YahooFinanceProvider::points_from_quotes(&quotes, from, to);
        assert_eq!(points.iter().map(|p| p.price).collect::<Vec<_>>(), vec![90.0, 99.0]);

        let returns = crate::models::price::annual_returns(&points);
        assert_eq!(returns.len(), 1);
        assert!((returns[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn history_is_clipped_to_requested_dates() {
        let quotes = vec![
            quote(2021, 12, 31, 50.0, 50.0),
            quote(2022, 6, 1, 60.0, 60.0),
            quote(2024, 1, 2, 70.0, 70.0),
        ];
        let from = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

        let points = YahooFinanceProvider::points_from_quotes(&quotes, from, to);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
    }

    #[test]
    fn timestamp_round_trips_to_date() {
        assert_eq!(
            YahooFinanceProvider::timestamp_to_naive_date(1_709_164_800 + 3_600),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }
}

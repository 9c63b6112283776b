use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use super::traits::MarketDataProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage provider, used as a fallback behind Yahoo Finance.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (settings key "alphavantage").
/// - **Strategy**: monthly series only; month-end closes are all the
///   annual-return calculation needs.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct MonthlySeriesResponse {
    #[serde(rename = "Monthly Time Series")]
    time_series: Option<HashMap<String, MonthlyData>>,
    /// Present instead of data when the daily quota is exhausted.
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct MonthlyData {
    #[serde(rename = "4. close")]
    close: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let body = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_MONTHLY"),
                ("symbol", &symbol.to_uppercase()),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .text()
            .await?;

        parse_monthly_series(&body, symbol, from, to)
    }
}

/// Month-end closes from a `TIME_SERIES_MONTHLY` body, oldest first,
/// limited to `from..=to`.
fn parse_monthly_series(
    body: &str,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PricePoint>, CoreError> {
    let resp: MonthlySeriesResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse monthly series for {symbol}: {e}"),
    })?;

    let time_series = match resp.time_series {
        Some(series) => series,
        None => {
            let reason = resp
                .note
                .or(resp.information)
                .unwrap_or_else(|| "no time series in response".into());
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("No monthly data for {symbol}: {reason}"),
            });
        }
    };

    let mut points: Vec<PricePoint> = time_series
        .iter()
        .filter_map(|(date_str, data)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            if date >= from && date <= to {
                let price: f64 = data.close.parse().ok()?;
                Some(PricePoint { date, price })
            } else {
                None
            }
        })
        .collect();

    points.sort_by_key(|p| p.date);
    Ok(points)
}

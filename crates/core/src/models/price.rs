use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Calendar-year returns from a price history.
///
/// Takes the last close of every calendar year present in `points` and
/// returns the fractional change between consecutive year-end closes,
/// oldest first. The first year only serves as the base, so `n` years of
/// prices yield at most `n - 1` returns. Points may arrive in any order.
pub fn annual_returns(points: &[PricePoint]) -> Vec<f64> {
    let mut year_end: BTreeMap<i32, &PricePoint> = BTreeMap::new();
    for point in points.iter().filter(|p| p.price.is_finite()) {
        year_end
            .entry(point.date.year())
            .and_modify(|current| {
                if point.date >= current.date {
                    *current = point;
                }
            })
            .or_insert(point);
    }

    let closes: Vec<f64> = year_end.values().map(|p| p.price).collect();
    closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Close of the most recent point, if any.
pub fn latest_close(points: &[PricePoint]) -> Option<f64> {
    points.iter().max_by_key(|p| p.date).map(|p| p.price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(y: i32, m: u32, d: u32, price: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            price,
        }
    }

    #[test]
    fn uses_last_close_of_each_year() {
        let points = vec![
            p(2021, 6, 1, 90.0),
            p(2021, 12, 31, 100.0),
            p(2022, 3, 1, 80.0),
            p(2022, 12, 30, 110.0),
            p(2023, 12, 29, 99.0),
        ];
        let returns = annual_returns(&points);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let points = vec![p(2022, 12, 30, 110.0), p(2021, 12, 31, 100.0), p(2022, 1, 3, 1.0)];
        let returns = annual_returns(&points);
        assert_eq!(returns.len(), 1);
        assert!((returns[0] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn single_year_yields_nothing() {
        assert!(annual_returns(&[p(2024, 1, 2, 10.0), p(2024, 5, 2, 12.0)]).is_empty());
        assert!(annual_returns(&[]).is_empty());
    }

    #[test]
    fn latest_close_picks_newest_date() {
        let points = vec![p(2024, 5, 2, 12.0), p(2024, 1, 2, 10.0)];
        assert_eq!(latest_close(&points), Some(12.0));
        assert_eq!(latest_close(&[]), None);
    }
}

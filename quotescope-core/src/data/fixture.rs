//! In-memory data provider with deterministic fixtures.
//!
//! Used by tests and by the `--offline` mode of both binaries. Identifiers
//! with no registered fixture behave like an unknown ticker on the real
//! provider: both queries return an empty series.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use super::provider::{DataError, DataProvider};
use crate::domain::{DividendRow, DividendSeries, Frequency, PriceRow, PriceSeries, Span};

/// A history request the provider has served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub identifier: String,
    pub span: Span,
    pub frequency: Frequency,
}

/// Deterministic provider backed by fixtures registered per identifier.
#[derive(Default)]
pub struct StaticProvider {
    history: HashMap<String, PriceSeries>,
    dividends: HashMap<String, DividendSeries>,
    failures: HashMap<String, String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixture set for offline use: a dividend-paying stock (`AAPL`), a
    /// zero-volume rate (`^TNX`), a stock that never paid (`TSLA`) and a
    /// forced failure (`FAIL`).
    pub fn demo() -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default();
        let aapl_divs = [
            (2023, 8, 11, 0.24),
            (2023, 11, 10, 0.24),
            (2024, 2, 9, 0.24),
            (2024, 5, 10, 0.25),
        ]
        .into_iter()
        .filter_map(|(y, m, d, amount)| {
            Some(DividendRow {
                timestamp: market_open(NaiveDate::from_ymd_opt(y, m, d)?),
                amount,
            })
        })
        .collect();

        Self::new()
            .with_history("AAPL", synthetic_history(start, 21, 192.0, 0.85, 52_000_000))
            .with_dividends("AAPL", DividendSeries::new(aapl_divs))
            .with_history("^TNX", synthetic_history(start, 21, 4.40, -0.01, 0))
            .with_history("TSLA", synthetic_history(start, 21, 178.0, 1.9, 88_000_000))
            .with_failure("FAIL", "forced failure")
    }

    pub fn with_history(mut self, identifier: &str, series: PriceSeries) -> Self {
        self.history.insert(identifier.to_string(), series);
        self
    }

    pub fn with_dividends(mut self, identifier: &str, series: DividendSeries) -> Self {
        self.dividends.insert(identifier.to_string(), series);
        self
    }

    /// Make every query for `identifier` fail with a network error.
    pub fn with_failure(mut self, identifier: &str, message: &str) -> Self {
        self.failures
            .insert(identifier.to_string(), message.to_string());
        self
    }

    /// History requests served so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn check_failure(&self, identifier: &str) -> Result<(), DataError> {
        match self.failures.get(identifier) {
            Some(message) => Err(DataError::NetworkUnreachable(message.clone())),
            None => Ok(()),
        }
    }
}

impl DataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_history(
        &self,
        identifier: &str,
        span: Span,
        frequency: Frequency,
    ) -> Result<PriceSeries, DataError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                identifier: identifier.to_string(),
                span,
                frequency,
            });
        }
        self.check_failure(identifier)?;
        Ok(self.history.get(identifier).cloned().unwrap_or_default())
    }

    fn fetch_dividends(&self, identifier: &str) -> Result<DividendSeries, DataError> {
        self.check_failure(identifier)?;
        Ok(self.dividends.get(identifier).cloned().unwrap_or_default())
    }
}

fn market_open(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(9, 30, 0).unwrap_or_default()
}

/// `count` weekday rows from `start`, close drifting by `step`, constant volume.
pub fn synthetic_history(
    start: NaiveDate,
    count: usize,
    first_close: f64,
    step: f64,
    volume: u64,
) -> PriceSeries {
    let rows = start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .enumerate()
        .map(|(i, date)| PriceRow {
            timestamp: market_open(date),
            close: first_close + step * i as f64,
            volume,
        })
        .collect();
    PriceSeries::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_identifier_is_empty() {
        let provider = StaticProvider::demo();
        let prices = provider
            .fetch_history("NOPE", Span::OneMonth, Frequency::Daily)
            .unwrap();
        assert!(prices.is_empty());
        assert!(provider.fetch_dividends("NOPE").unwrap().is_empty());
    }

    #[test]
    fn forced_failure() {
        let provider = StaticProvider::demo();
        assert!(provider.fetch_dividends("FAIL").is_err());
        assert!(provider
            .fetch_history("FAIL", Span::OneDay, Frequency::Daily)
            .is_err());
    }

    #[test]
    fn demo_fixtures_shape() {
        let provider = StaticProvider::demo();
        let aapl = provider
            .fetch_history("AAPL", Span::OneMonth, Frequency::Daily)
            .unwrap();
        assert_eq!(aapl.len(), 21);
        assert!(aapl.has_volume());
        let tnx = provider
            .fetch_history("^TNX", Span::OneMonth, Frequency::Daily)
            .unwrap();
        assert!(!tnx.has_volume());
        assert_eq!(provider.fetch_dividends("AAPL").unwrap().len(), 4);
    }

    #[test]
    fn synthetic_history_skips_weekends() {
        // 2024-06-07 is a Friday.
        let start = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
        let series = synthetic_history(start, 2, 1.0, 1.0, 1);
        assert_eq!(
            series.rows()[1].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }

    #[test]
    fn records_history_requests() {
        let provider = StaticProvider::new();
        provider
            .fetch_history("MSFT", Span::FiveYears, Frequency::Weekly)
            .unwrap();
        assert_eq!(
            provider.requests(),
            vec![RecordedRequest {
                identifier: "MSFT".into(),
                span: Span::FiveYears,
                frequency: Frequency::Weekly,
            }]
        );
    }
}

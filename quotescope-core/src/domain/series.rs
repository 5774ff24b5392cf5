//! Price and dividend series as returned by a data provider.
//!
//! Both series store timezone-naive exchange-local timestamps. Providers are
//! responsible for dropping the offset before building a series, so the two
//! can always be combined into one export.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One period of the history query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub volume: u64,
}

/// Ordered (timestamp, close, volume) rows, one per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    rows: Vec<PriceRow>,
}

impl PriceSeries {
    /// Build a series, sorting rows by timestamp.
    pub fn new(mut rows: Vec<PriceRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_volume(&self) -> u128 {
        self.rows.iter().map(|r| r.volume as u128).sum()
    }

    /// True when at least one period traded a non-zero volume.
    pub fn has_volume(&self) -> bool {
        self.rows.iter().any(|r| r.volume > 0)
    }

    pub fn closes(&self) -> Vec<(NaiveDateTime, f64)> {
        self.rows.iter().map(|r| (r.timestamp, r.close)).collect()
    }

    pub fn volumes(&self) -> Vec<(NaiveDateTime, u64)> {
        self.rows.iter().map(|r| (r.timestamp, r.volume)).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.timestamp)
    }
}

/// One dividend payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendRow {
    pub timestamp: NaiveDateTime,
    pub amount: f64,
}

/// Sparse dividend history: only periods with an actual payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendSeries {
    rows: Vec<DividendRow>,
}

impl DividendSeries {
    pub fn new(mut rows: Vec<DividendRow>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[DividendRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_paid(&self) -> f64 {
        self.rows.iter().map(|r| r.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn rows_are_sorted_on_construction() {
        let series = PriceSeries::new(vec![
            PriceRow {
                timestamp: ts(2024, 1, 3),
                close: 2.0,
                volume: 10,
            },
            PriceRow {
                timestamp: ts(2024, 1, 2),
                close: 1.0,
                volume: 5,
            },
        ]);
        assert_eq!(series.first_timestamp(), Some(ts(2024, 1, 2)));
        assert_eq!(series.last_timestamp(), Some(ts(2024, 1, 3)));
        assert_eq!(series.closes()[0].1, 1.0);
    }

    #[test]
    fn zero_volume_series() {
        let series = PriceSeries::new(vec![
            PriceRow {
                timestamp: ts(2024, 1, 2),
                close: 4.1,
                volume: 0,
            },
            PriceRow {
                timestamp: ts(2024, 1, 3),
                close: 4.2,
                volume: 0,
            },
        ]);
        assert_eq!(series.total_volume(), 0);
        assert!(!series.has_volume());
    }

    #[test]
    fn total_volume_does_not_overflow() {
        let series = PriceSeries::new(vec![
            PriceRow {
                timestamp: ts(2024, 1, 2),
                close: 1.0,
                volume: u64::MAX,
            },
            PriceRow {
                timestamp: ts(2024, 1, 3),
                close: 1.0,
                volume: u64::MAX,
            },
        ]);
        assert_eq!(series.total_volume(), u64::MAX as u128 * 2);
        assert!(series.has_volume());
    }

    #[test]
    fn dividend_totals() {
        let divs = DividendSeries::new(vec![
            DividendRow {
                timestamp: ts(2024, 5, 10),
                amount: 0.25,
            },
            DividendRow {
                timestamp: ts(2024, 2, 9),
                amount: 0.24,
            },
        ]);
        assert_eq!(divs.len(), 2);
        assert_eq!(divs.rows()[0].amount, 0.24);
        assert!((divs.total_paid() - 0.49).abs() < 1e-12);
    }
}

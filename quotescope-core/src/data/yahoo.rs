//! Yahoo Finance data provider.
//!
//! Both queries hit Yahoo's v8 chart API. The history query asks for
//! `range`/`interval` directly; the dividend query asks for the full range at
//! monthly sampling and only reads the `events.dividends` block.
//!
//! Timestamps arrive as UTC epochs. They are shifted into the exchange's wall
//! clock (from `meta.exchangeTimezoneName`, falling back to `meta.gmtoffset`)
//! and stored without an offset.
//!
//! There is no retry and, unless configured, no timeout: a slow provider
//! blocks the caller until it answers.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, info};

use super::provider::{DataError, DataProvider};
use crate::config::ProviderConfig;
use crate::domain::{DividendRow, DividendSeries, Frequency, PriceRow, PriceSeries, Span};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    events: Option<Events>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Events {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Converts provider epochs into the exchange's naive wall clock.
struct ExchangeClock {
    tz: Option<Tz>,
    gmtoffset: i64,
}

impl ExchangeClock {
    fn from_meta(meta: Option<&ChartMeta>) -> Self {
        match meta {
            Some(meta) => Self {
                tz: meta
                    .exchange_timezone_name
                    .as_deref()
                    .and_then(|name| name.parse::<Tz>().ok()),
                gmtoffset: meta.gmtoffset,
            },
            None => Self {
                tz: None,
                gmtoffset: 0,
            },
        }
    }

    fn naive(&self, ts: i64) -> Result<NaiveDateTime, DataError> {
        let utc = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;
        Ok(match self.tz {
            Some(tz) => utc.with_timezone(&tz).naive_local(),
            None => TimeDelta::try_seconds(self.gmtoffset)
                .and_then(|offset| utc.checked_add_signed(offset))
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!(
                        "invalid gmtoffset: {}",
                        self.gmtoffset
                    ))
                })?
                .naive_utc(),
        })
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, DataError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Issue one chart request. `None` means the provider has no data for the identifier.
    fn request(
        &self,
        identifier: &str,
        range: &str,
        interval: &str,
    ) -> Result<Option<ChartData>, DataError> {
        if identifier.trim().is_empty() {
            return Err(DataError::InvalidIdentifier(identifier.to_string()));
        }

        let url = chart_url(&self.base_url, identifier, range, interval)?;
        info!(%url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        debug!(status, bytes = body.len(), "chart response received");
        decode(identifier, status, &body)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(
        &self,
        identifier: &str,
        span: Span,
        frequency: Frequency,
    ) -> Result<PriceSeries, DataError> {
        match self.request(identifier, span.code(), frequency.code())? {
            Some(data) => parse_history(data),
            None => Ok(PriceSeries::default()),
        }
    }

    fn fetch_dividends(&self, identifier: &str) -> Result<DividendSeries, DataError> {
        match self.request(identifier, Span::Max.code(), Frequency::Monthly.code())? {
            Some(data) => parse_dividends(data),
            None => Ok(DividendSeries::default()),
        }
    }
}

/// Build the chart API URL. The identifier is percent-encoded as one path segment.
fn chart_url(
    base_url: &str,
    identifier: &str,
    range: &str,
    interval: &str,
) -> Result<reqwest::Url, DataError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| DataError::Client(format!("invalid base URL '{base_url}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| DataError::Client(format!("base URL '{base_url}' cannot carry a path")))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", identifier]);
    url.query_pairs_mut()
        .append_pair("range", range)
        .append_pair("interval", interval)
        .append_pair("events", "div")
        .append_pair("includePrePost", "false");
    Ok(url)
}

/// Interpret a chart response body.
///
/// A provider "Not Found" is not an error: the identifier simply has no data.
fn decode(identifier: &str, status: u16, body: &str) -> Result<Option<ChartData>, DataError> {
    let success = (200..300).contains(&status);

    let resp: ChartResponse = match serde_json::from_str(body) {
        Ok(resp) => resp,
        Err(e) if success => {
            return Err(DataError::ResponseFormatChanged(format!(
                "failed to parse response for {identifier}: {e}"
            )));
        }
        Err(_) => {
            return Err(DataError::HttpStatus {
                status,
                identifier: identifier.to_string(),
            });
        }
    };

    if let Some(err) = resp.chart.error {
        if err.code == "Not Found" {
            debug!(identifier, "provider has no data for identifier");
            return Ok(None);
        }
        return Err(DataError::ResponseFormatChanged(format!(
            "{}: {}",
            err.code, err.description
        )));
    }

    if !success {
        return Err(DataError::HttpStatus {
            status,
            identifier: identifier.to_string(),
        });
    }

    Ok(resp.chart.result.and_then(|r| r.into_iter().next()))
}

/// Turn chart data into price rows. Periods without a close are dropped.
fn parse_history(data: ChartData) -> Result<PriceSeries, DataError> {
    let Some(timestamps) = data.timestamp else {
        return Ok(PriceSeries::default());
    };

    let clock = ExchangeClock::from_meta(data.meta.as_ref());
    let quote = data
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
        rows.push(PriceRow {
            timestamp: clock.naive(ts)?,
            close,
            volume,
        });
    }

    Ok(PriceSeries::new(rows))
}

fn parse_dividends(data: ChartData) -> Result<DividendSeries, DataError> {
    let clock = ExchangeClock::from_meta(data.meta.as_ref());
    let Some(events) = data.events else {
        return Ok(DividendSeries::default());
    };

    let rows = events
        .dividends
        .into_values()
        .filter(|e| e.amount.is_finite())
        .map(|e| {
            Ok(DividendRow {
                timestamp: clock.naive(e.date)?,
                amount: e.amount,
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(DividendSeries::new(rows))
}

//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, the
//! in-memory static provider) so the session can be driven without network
//! access in tests.

use thiserror::Error;

use crate::domain::{DividendSeries, Frequency, PriceSeries, Span};

/// Structured error types for provider calls.
///
/// These are displayable in both CLI and TUI contexts; the session surfaces
/// them as a single "request failed" message.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for '{identifier}'")]
    HttpStatus { status: u16, identifier: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Trait for data providers.
///
/// Both queries are read-only and keyed by the instrument identifier. An
/// identifier the provider does not know yields an empty series, not an
/// error.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Historical close/volume rows for `identifier` over `span`, sampled at `frequency`.
    fn fetch_history(
        &self,
        identifier: &str,
        span: Span,
        frequency: Frequency,
    ) -> Result<PriceSeries, DataError>;

    /// Full dividend history for `identifier`.
    fn fetch_dividends(&self, identifier: &str) -> Result<DividendSeries, DataError>;
}

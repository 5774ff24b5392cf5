//! QuoteScope Core: instrument history lookup and spreadsheet export.
//!
//! This crate holds everything behind the form:
//! - Form selections and their provider codes
//! - Price and dividend series with timezone-naive timestamps
//! - The `DataProvider` trait, the Yahoo Finance provider and a fixture provider
//! - The query session that applies the empty/zero-volume/dividend rules
//! - Two-sheet `.xlsx` export
//! - TOML configuration and localized labels

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod locale;
pub mod session;

pub use config::AppConfig;
pub use data::{DataError, DataProvider, StaticProvider, YahooProvider};
pub use domain::{DividendSeries, Frequency, InputSelection, PriceSeries, Span};
pub use export::{ExportArtifact, ExportError, SpreadsheetExporter};
pub use locale::Locale;
pub use session::{Notice, NoticeLevel, QueryReport, QuerySession, SessionError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the provider trait object and session types can
    /// cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Box<dyn DataProvider>>();
        require_sync::<Box<dyn DataProvider>>();
        require_send::<QueryReport>();
        require_send::<SessionError>();
        require_sync::<SpreadsheetExporter>();
    }
}

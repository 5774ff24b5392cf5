//! Query session: one trigger → fetch → reshape → report → optional export.
//!
//! Fetching returns `Result<FetchedData, DataError>`; building the report
//! consumes it. Every failure path is a [`SessionError`] variant, and any of
//! them aborts the remaining steps for that trigger.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::data::{DataError, DataProvider};
use crate::domain::{DividendSeries, InputSelection, PriceSeries};
use crate::export::{ExportArtifact, ExportError, SpreadsheetExporter};
use crate::locale::Locale;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("request failed: {0}")]
    Fetch(#[from] DataError),

    #[error("request failed: {0}")]
    Export(#[from] ExportError),
}

impl SessionError {
    /// The underlying message without the "request failed" prefix.
    pub fn detail(&self) -> String {
        match self {
            SessionError::Fetch(e) => e.to_string(),
            SessionError::Export(e) => e.to_string(),
        }
    }
}

/// Both series, as returned by the provider.
#[derive(Debug, Clone, Default)]
pub struct FetchedData {
    pub prices: PriceSeries,
    pub dividends: DividendSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// A user-facing message produced while building the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Everything one trigger produced.
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub selection: InputSelection,
    pub notices: Vec<Notice>,
    /// The fetched price series (possibly empty).
    pub prices: PriceSeries,
    /// Closing price line; present whenever the price series is non-empty.
    pub price_chart: Option<Vec<(NaiveDateTime, f64)>>,
    /// Volume bars; present only when some period traded.
    pub volume_chart: Option<Vec<(NaiveDateTime, u64)>>,
    pub dividend_table: Option<DividendSeries>,
    pub export: Option<ExportArtifact>,
}

impl QueryReport {
    fn empty(selection: InputSelection) -> Self {
        Self {
            selection,
            notices: Vec::new(),
            prices: PriceSeries::default(),
            price_chart: None,
            volume_chart: None,
            dividend_table: None,
            export: None,
        }
    }

    pub fn has_level(&self, level: NoticeLevel) -> bool {
        self.notices.iter().any(|n| n.level == level)
    }
}

/// Runs triggers against a provider and an exporter.
pub struct QuerySession<'a> {
    provider: &'a dyn DataProvider,
    exporter: &'a SpreadsheetExporter,
    locale: Locale,
}

impl<'a> QuerySession<'a> {
    pub fn new(
        provider: &'a dyn DataProvider,
        exporter: &'a SpreadsheetExporter,
        locale: Locale,
    ) -> Self {
        Self {
            provider,
            exporter,
            locale,
        }
    }

    /// Full cycle for one trigger.
    pub fn run(&self, selection: &InputSelection) -> Result<QueryReport, SessionError> {
        info!(
            identifier = %selection.identifier,
            frequency = selection.frequency.code(),
            span = selection.span.code(),
            provider = self.provider.name(),
            "query triggered"
        );
        let result = self
            .fetch(selection)
            .map_err(SessionError::from)
            .and_then(|data| self.report(selection, data));
        if let Err(e) = &result {
            error!(identifier = %selection.identifier, error = %e, "query aborted");
        }
        result
    }

    /// Request both series. Dividends are fetched even when prices come back empty.
    pub fn fetch(&self, selection: &InputSelection) -> Result<FetchedData, DataError> {
        let identifier = selection.identifier.as_str();
        if identifier.is_empty() {
            return Err(DataError::InvalidIdentifier(selection.identifier.clone()));
        }
        let prices = self
            .provider
            .fetch_history(identifier, selection.span, selection.frequency)?;
        let dividends = self.provider.fetch_dividends(identifier)?;
        info!(
            identifier,
            price_rows = prices.len(),
            dividend_rows = dividends.len(),
            "series fetched"
        );
        Ok(FetchedData { prices, dividends })
    }

    /// Apply the branching rules to fetched data, writing the export when dividends exist.
    pub fn report(
        &self,
        selection: &InputSelection,
        data: FetchedData,
    ) -> Result<QueryReport, SessionError> {
        let labels = self.locale.labels();
        let mut report = QueryReport::empty(selection.clone());
        let FetchedData { prices, dividends } = data;

        if prices.is_empty() {
            warn!(identifier = %selection.identifier, "no price data");
            report
                .notices
                .push(Notice::new(NoticeLevel::Warning, labels.no_data_warning));
            return Ok(report);
        }

        report.notices.push(Notice::new(
            NoticeLevel::Success,
            labels.data_retrieved_for(&selection.identifier),
        ));
        report.price_chart = Some(prices.closes());

        if prices.has_volume() {
            report.volume_chart = Some(prices.volumes());
        } else {
            report
                .notices
                .push(Notice::new(NoticeLevel::Info, labels.no_volume_note));
        }

        if dividends.is_empty() {
            report
                .notices
                .push(Notice::new(NoticeLevel::Info, labels.no_dividends_note));
        } else {
            let artifact = self
                .exporter
                .write(&selection.identifier, &prices, &dividends)?;
            report.notices.push(Notice::new(
                NoticeLevel::Success,
                format!("{}: {}", labels.export_ready, artifact.file_name),
            ));
            report.export = Some(artifact);
            report.dividend_table = Some(dividends);
        }

        report.prices = prices;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticProvider;
    use crate::domain::{Frequency, Span};

    fn run(identifier: &str) -> (tempfile::TempDir, Result<QueryReport, SessionError>) {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticProvider::demo();
        let exporter = SpreadsheetExporter::new(dir.path(), Locale::English);
        let session = QuerySession::new(&provider, &exporter, Locale::English);
        let sel = InputSelection::new(identifier, Frequency::Daily, Span::OneMonth);
        let result = session.run(&sel);
        (dir, result)
    }

    #[test]
    fn dividend_payer_gets_everything() {
        let (dir, result) = run("AAPL");
        let report = result.unwrap();
        assert_eq!(report.price_chart.as_ref().unwrap().len(), report.prices.len());
        assert!(report.volume_chart.is_some());
        assert_eq!(report.dividend_table.as_ref().unwrap().len(), 4);
        let export = report.export.unwrap();
        assert_eq!(export.path, dir.path().join("AAPL_full_data.xlsx"));
        assert!(export.path.exists());
    }

    #[test]
    fn zero_volume_has_note_and_no_volume_chart() {
        let (dir, result) = run("^TNX");
        let report = result.unwrap();
        assert!(report.price_chart.is_some());
        assert!(report.volume_chart.is_none());
        assert!(report
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Info && n.message.contains("volume")));
        assert!(report.export.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn no_dividends_no_export() {
        let (_dir, result) = run("TSLA");
        let report = result.unwrap();
        assert!(report.volume_chart.is_some());
        assert!(report.dividend_table.is_none());
        assert!(report.export.is_none());
    }

    #[test]
    fn unknown_identifier_is_a_warning_only() {
        let (_dir, result) = run("NOPE");
        let report = result.unwrap();
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].level, NoticeLevel::Warning);
        assert!(report.price_chart.is_none());
        assert!(report.export.is_none());
    }

    #[test]
    fn empty_prices_skip_dividends_even_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticProvider::demo();
        let exporter = SpreadsheetExporter::new(dir.path(), Locale::English);
        let session = QuerySession::new(&provider, &exporter, Locale::English);
        let sel = InputSelection::default();
        let mut data = session.fetch(&sel).unwrap();
        assert!(!data.dividends.is_empty());
        data.prices = PriceSeries::default();
        let report = session.report(&sel, data).unwrap();
        assert!(report.dividend_table.is_none());
        assert!(report.export.is_none());
        assert!(report.has_level(NoticeLevel::Warning));
    }

    #[test]
    fn provider_failure_is_request_failed() {
        let (_dir, result) = run("FAIL");
        let err = result.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(_)));
        assert!(err.to_string().starts_with("request failed"));
        assert!(err.detail().contains("forced failure"));
    }

    #[test]
    fn blank_identifier_rejected() {
        let (_dir, result) = run("   ");
        assert!(matches!(
            result.unwrap_err(),
            SessionError::Fetch(DataError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn selection_codes_reach_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticProvider::new();
        let exporter = SpreadsheetExporter::new(dir.path(), Locale::English);
        let session = QuerySession::new(&provider, &exporter, Locale::English);
        let sel = InputSelection::new("MSFT", Frequency::Monthly, Span::Max);
        session.run(&sel).unwrap();
        let req = &provider.requests()[0];
        assert_eq!(req.span.code(), "max");
        assert_eq!(req.frequency.code(), "1mo");
    }

    #[test]
    fn notices_follow_locale() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticProvider::demo();
        let exporter = SpreadsheetExporter::new(dir.path(), Locale::Spanish);
        let session = QuerySession::new(&provider, &exporter, Locale::Spanish);
        let report = session
            .run(&InputSelection::new("TSLA", Frequency::Daily, Span::OneMonth))
            .unwrap();
        assert_eq!(report.notices[0].message, "Datos obtenidos para TSLA");
        assert_eq!(
            report.notices[1].message,
            "No se encontraron dividendos para este activo."
        );
    }
}

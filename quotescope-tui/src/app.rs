//! Application state: single-owner, main-thread only.
//!
//! The form state, the last report and the status line all live here. A
//! trigger runs the query session synchronously against the owned provider.

use std::path::PathBuf;

use tracing::{error, info, warn};

use quotescope_core::{
    DataProvider, Frequency, InputSelection, Locale, QueryReport, QuerySession, Span,
    SpreadsheetExporter,
};

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identifier,
    Frequency,
    Span,
    Fetch,
}

impl Field {
    const ORDER: [Field; 4] = [Field::Identifier, Field::Frequency, Field::Span, Field::Fetch];

    pub fn index(self) -> usize {
        match self {
            Field::Identifier => 0,
            Field::Frequency => 1,
            Field::Span => 2,
            Field::Fetch => 3,
        }
    }

    pub fn next(self) -> Field {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Field {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// The explicit form state, edited by key input and read by the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub identifier: String,
    pub frequency: Frequency,
    pub span: Span,
    pub focus: Field,
}

impl FormState {
    pub fn from_selection(selection: &InputSelection) -> Self {
        Self {
            identifier: selection.identifier.clone(),
            frequency: selection.frequency,
            span: selection.span,
            focus: Field::Identifier,
        }
    }

    pub fn selection(&self) -> InputSelection {
        InputSelection::new(self.identifier.as_str(), self.frequency, self.span)
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub locale: Locale,
    pub form: FormState,
    pub report: Option<QueryReport>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub dividend_scroll: usize,

    // Paths
    pub download_dir: PathBuf,
    pub state_path: PathBuf,

    provider: Box<dyn DataProvider>,
    exporter: SpreadsheetExporter,
}

impl AppState {
    pub fn new(
        provider: Box<dyn DataProvider>,
        exporter: SpreadsheetExporter,
        locale: Locale,
        selection: &InputSelection,
        download_dir: PathBuf,
        state_path: PathBuf,
    ) -> Self {
        Self {
            running: true,
            locale,
            form: FormState::from_selection(selection),
            report: None,
            status_message: None,
            dividend_scroll: 0,
            download_dir,
            state_path,
            provider,
            exporter,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one query for the current form state. Any failure replaces the
    /// previous report with a single error message; the form stays usable.
    pub fn trigger(&mut self) {
        let selection = self.form.selection();
        let session = QuerySession::new(&*self.provider, &self.exporter, self.locale);
        self.dividend_scroll = 0;
        match session.run(&selection) {
            Ok(report) => {
                let last = report.notices.last().cloned();
                self.report = Some(report);
                match last {
                    Some(n) if n.level == quotescope_core::NoticeLevel::Warning => {
                        self.set_warning(n.message)
                    }
                    Some(n) => self.set_status(n.message),
                    None => self.status_message = None,
                }
            }
            Err(e) => {
                self.report = None;
                let message = self.locale.labels().request_failed_with(e.detail());
                self.push_error(message, &selection.identifier);
            }
        }
    }

    /// Copy the last export into the download directory.
    pub fn download(&mut self) {
        let Some(artifact) = self.report.as_ref().and_then(|r| r.export.clone()) else {
            warn!("download requested without an export");
            self.set_warning(self.locale.labels().no_dividends_note);
            return;
        };
        match artifact.save_to(&self.download_dir) {
            Ok(dest) => {
                info!(dest = %dest.display(), "download saved");
                self.set_status(format!("{} → {}", artifact.file_name, dest.display()));
            }
            Err(e) => {
                let message = self.locale.labels().request_failed_with(&e);
                self.push_error(message, &artifact.file_name);
            }
        }
    }

    /// Log an error and show it as the single status message.
    pub fn push_error(&mut self, message: String, context: &str) {
        error!(context, %message, "request failed");
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

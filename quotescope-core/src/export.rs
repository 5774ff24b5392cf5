//! Spreadsheet export: a two-sheet `.xlsx` with prices/volume and dividends.
//!
//! Dates are written as `dd/mm/yyyy` strings and column headers come from the
//! active locale. The file lands in the export directory as
//! `{identifier}_full_data.xlsx`; a rerun for the same identifier overwrites it.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::info;

use crate::domain::{DividendSeries, PriceSeries};
use crate::locale::{Labels, Locale};

/// MIME type the artifact is offered with.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Date pattern used in every date cell.
pub const EXPORT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// A written spreadsheet, ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
    pub price_rows: usize,
    pub dividend_rows: usize,
}

impl ExportArtifact {
    /// Copy the artifact into `dir` (the user's download directory), keeping its name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let dest = dir.join(&self.file_name);
        if dest != self.path {
            std::fs::copy(&self.path, &dest).map_err(|source| ExportError::Io {
                path: dest.clone(),
                source,
            })?;
        }
        info!(dest = %dest.display(), "spreadsheet delivered");
        Ok(dest)
    }
}

pub fn format_export_date(ts: NaiveDateTime) -> String {
    ts.format(EXPORT_DATE_FORMAT).to_string()
}

/// File name for an identifier's export. Path separators are replaced so the
/// file always lands directly in the export directory.
pub fn export_file_name(identifier: &str) -> String {
    let stem: String = identifier
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{stem}_full_data.xlsx")
}

/// One row of the dividends sheet, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DividendExportRow {
    pub date: String,
    pub amount: f64,
}

/// Build the dividends sheet rows. Done before the workbook is written.
pub fn dividend_table(dividends: &DividendSeries) -> Vec<DividendExportRow> {
    dividends
        .rows()
        .iter()
        .map(|r| DividendExportRow {
            date: format_export_date(r.timestamp),
            amount: r.amount,
        })
        .collect()
}

/// Writes export spreadsheets into a fixed directory.
#[derive(Debug, Clone)]
pub struct SpreadsheetExporter {
    dir: PathBuf,
    locale: Locale,
}

impl SpreadsheetExporter {
    pub fn new(dir: impl Into<PathBuf>, locale: Locale) -> Self {
        Self {
            dir: dir.into(),
            locale,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(export_file_name(identifier))
    }

    pub fn write(
        &self,
        identifier: &str,
        prices: &PriceSeries,
        dividends: &DividendSeries,
    ) -> Result<ExportArtifact, ExportError> {
        let labels = self.locale.labels();
        let dividend_rows = dividend_table(dividends);

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        write_prices_sheet(sheet, labels, &header, prices)?;

        let sheet = workbook.add_worksheet();
        write_dividends_sheet(sheet, labels, &header, &dividend_rows)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let file_name = export_file_name(identifier);
        let path = self.dir.join(&file_name);
        workbook.save(&path)?;

        info!(
            path = %path.display(),
            price_rows = prices.len(),
            dividend_rows = dividend_rows.len(),
            "spreadsheet written"
        );

        Ok(ExportArtifact {
            path,
            file_name,
            mime: XLSX_MIME,
            price_rows: prices.len(),
            dividend_rows: dividend_rows.len(),
        })
    }
}

fn write_prices_sheet(
    sheet: &mut Worksheet,
    labels: &Labels,
    header: &Format,
    prices: &PriceSeries,
) -> Result<(), XlsxError> {
    sheet.set_name(labels.prices_sheet)?;
    sheet.write_string_with_format(0, 0, labels.date_column, header)?;
    sheet.write_string_with_format(0, 1, labels.close_column, header)?;
    sheet.write_string_with_format(0, 2, labels.volume_column, header)?;
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 16)?;

    for (i, row) in prices.rows().iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, format_export_date(row.timestamp))?;
        sheet.write_number(r, 1, row.close)?;
        sheet.write_number(r, 2, row.volume as f64)?;
    }
    Ok(())
}

fn write_dividends_sheet(
    sheet: &mut Worksheet,
    labels: &Labels,
    header: &Format,
    rows: &[DividendExportRow],
) -> Result<(), XlsxError> {
    sheet.set_name(labels.dividends_sheet)?;
    sheet.write_string_with_format(0, 0, labels.date_column, header)?;
    sheet.write_string_with_format(0, 1, labels.dividend_column, header)?;
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 16)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &row.date)?;
        sheet.write_number(r, 1, row.amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DividendRow;
    use chrono::NaiveDate;

    #[test]
    fn date_is_day_month_year() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 9)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(format_export_date(ts), "09/02/2024");
    }

    #[test]
    fn file_name_pattern() {
        assert_eq!(export_file_name("AAPL"), "AAPL_full_data.xlsx");
        assert_eq!(export_file_name(" ^GSPC "), "^GSPC_full_data.xlsx");
        assert_eq!(export_file_name("BRK/B"), "BRK_B_full_data.xlsx");
    }

    #[test]
    fn dividend_table_formats_dates() {
        let divs = DividendSeries::new(vec![DividendRow {
            timestamp: NaiveDate::from_ymd_opt(2023, 11, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            amount: 0.24,
        }]);
        assert_eq!(
            dividend_table(&divs),
            vec![DividendExportRow {
                date: "10/11/2023".into(),
                amount: 0.24,
            }]
        );
    }

    #[test]
    fn save_to_copies_into_directory() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let path = src_dir.path().join("X_full_data.xlsx");
        std::fs::write(&path, b"payload").unwrap();
        let artifact = ExportArtifact {
            path,
            file_name: "X_full_data.xlsx".into(),
            mime: XLSX_MIME,
            price_rows: 0,
            dividend_rows: 0,
        };
        let dest = artifact.save_to(dest_dir.path()).unwrap();
        assert_eq!(dest, dest_dir.path().join("X_full_data.xlsx"));
        assert_eq!(std::fs::read(dest).unwrap(), b"payload");
    }
}

//! User-facing wording: selector labels, notices, sheet names and column labels.
//!
//! Every string the session or the UI shows to a user comes from a [`Labels`]
//! table so the spreadsheet and the screen always agree on wording.

use serde::{Deserialize, Serialize};

/// Language used for labels, notices and export column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::English => &ENGLISH,
            Locale::Spanish => &SPANISH,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Spanish => "es",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "es" | "spanish" | "español" => Ok(Locale::Spanish),
            other => Err(format!("unknown locale '{other}' (expected 'en' or 'es')")),
        }
    }
}

/// Static label table for one locale.
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub identifier_prompt: &'static str,
    pub frequency_prompt: &'static str,
    pub span_prompt: &'static str,
    pub fetch_action: &'static str,
    pub download_action: &'static str,
    pub key_hints: &'static str,
    pub quit_hint: &'static str,

    /// Daily, Weekly, Monthly.
    pub frequencies: [&'static str; 3],
    /// 1 day, 1 month, 3 months, 6 months, 12 months, 5 years, maximum.
    pub spans: [&'static str; 7],

    pub price_chart_title: &'static str,
    pub volume_chart_title: &'static str,
    pub dividends_title: &'static str,

    pub data_retrieved: &'static str,
    pub no_data_warning: &'static str,
    pub no_volume_note: &'static str,
    pub no_dividends_note: &'static str,
    pub export_ready: &'static str,
    pub request_failed: &'static str,

    pub prices_sheet: &'static str,
    pub dividends_sheet: &'static str,
    pub date_column: &'static str,
    pub close_column: &'static str,
    pub volume_column: &'static str,
    pub dividend_column: &'static str,
}

impl Labels {
    pub fn data_retrieved_for(&self, identifier: &str) -> String {
        format!("{} {identifier}", self.data_retrieved)
    }

    pub fn request_failed_with(&self, message: impl std::fmt::Display) -> String {
        format!("{}: {message}", self.request_failed)
    }
}

static ENGLISH: Labels = Labels {
    title: "Instrument price, volume and dividend lookup",
    subtitle: "Closing price, traded volume and dividend payments for any stock, ETF, bond or crypto listed on Yahoo Finance.",
    identifier_prompt: "Ticker",
    frequency_prompt: "Price frequency",
    span_prompt: "Span",
    fetch_action: "Fetch data",
    download_action: "Download full spreadsheet (with dividends)",
    key_hints: "Tab:field ←/→:choose Enter:fetch",
    quit_hint: "Esc:quit",
    frequencies: ["Daily", "Weekly", "Monthly"],
    spans: [
        "1 day",
        "1 month",
        "3 months",
        "6 months",
        "12 months",
        "5 years",
        "Maximum available",
    ],
    price_chart_title: "Closing Price",
    volume_chart_title: "Traded Volume",
    dividends_title: "Dividend Payments",
    data_retrieved: "Data retrieved for",
    no_data_warning: "No data found for the selected criteria.",
    no_volume_note: "No volume available for this ticker (probably an index, rate or bond).",
    no_dividends_note: "No dividends found for this instrument.",
    export_ready: "Spreadsheet ready",
    request_failed: "Request failed",
    prices_sheet: "Prices and Volume",
    dividends_sheet: "Dividends",
    date_column: "Date",
    close_column: "Closing Price",
    volume_column: "Volume",
    dividend_column: "Dividend Paid",
};

static SPANISH: Labels = Labels {
    title: "Consulta de precios, volúmenes y dividendos de activos",
    subtitle: "Consulta el precio, volumen negociado y pagos de dividendos de cualquier acción, ETF, bono o cripto compatible con Yahoo Finance.",
    identifier_prompt: "Ticker (clave de pizarra)",
    frequency_prompt: "Frecuencia de precios",
    span_prompt: "Plazo",
    fetch_action: "Obtener datos",
    download_action: "Descargar Excel completo (con dividendos)",
    key_hints: "Tab:campo ←/→:elegir Enter:consultar",
    quit_hint: "Esc:salir",
    frequencies: ["Diaria", "Semanal", "Mensual"],
    spans: [
        "1 día",
        "1 mes",
        "3 meses",
        "6 meses",
        "12 meses",
        "5 años",
        "Máximo disponible",
    ],
    price_chart_title: "Precio de Cierre",
    volume_chart_title: "Volumen Negociado",
    dividends_title: "Pagos de Dividendos",
    data_retrieved: "Datos obtenidos para",
    no_data_warning: "No se encontraron datos para los criterios seleccionados.",
    no_volume_note: "No hay volumen disponible para este ticker (posiblemente sea un índice, tasa o bono).",
    no_dividends_note: "No se encontraron dividendos para este activo.",
    export_ready: "Excel listo",
    request_failed: "Ocurrió un error",
    prices_sheet: "Precios y Volumen",
    dividends_sheet: "Dividendos",
    date_column: "Fecha",
    close_column: "Precio de Cierre",
    volume_column: "Volumen",
    dividend_column: "Dividendo Pagado",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_locale_is_english() {
        assert_eq!(Locale::default(), Locale::English);
        assert_eq!(Locale::default().labels().close_column, "Closing Price");
    }

    #[test]
    fn parse_locale_codes() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Spanish);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn sheet_names_fit_spreadsheet_limit() {
        for locale in [Locale::English, Locale::Spanish] {
            let labels = locale.labels();
            assert!(labels.prices_sheet.chars().count() <= 31);
            assert!(labels.dividends_sheet.chars().count() <= 31);
        }
    }

    #[test]
    fn formatted_notices() {
        let labels = Locale::English.labels();
        assert_eq!(labels.data_retrieved_for("AAPL"), "Data retrieved for AAPL");
        assert_eq!(
            labels.request_failed_with("boom"),
            "Request failed: boom"
        );
    }
}

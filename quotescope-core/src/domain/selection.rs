//! Form selections and their provider codes.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Sampling frequency of the price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Provider interval code.
    pub fn code(self) -> &'static str {
        match self {
            Frequency::Daily => "1d",
            Frequency::Weekly => "1wk",
            Frequency::Monthly => "1mo",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn index(self) -> usize {
        match self {
            Frequency::Daily => 0,
            Frequency::Weekly => 1,
            Frequency::Monthly => 2,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        locale.labels().frequencies[self.index()]
    }

    pub fn next(self) -> Frequency {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Frequency {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    /// Accepts either the name (`daily`) or the provider code (`1d`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            code => Frequency::from_code(code)
                .ok_or_else(|| format!("unknown frequency '{code}' (daily, weekly, monthly)")),
        }
    }
}

/// Time span the history query covers, counted back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Span {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    TwelveMonths,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Span {
    pub const ALL: [Span; 7] = [
        Span::OneDay,
        Span::OneMonth,
        Span::ThreeMonths,
        Span::SixMonths,
        Span::TwelveMonths,
        Span::FiveYears,
        Span::Max,
    ];

    /// Provider range code.
    pub fn code(self) -> &'static str {
        match self {
            Span::OneDay => "1d",
            Span::OneMonth => "1mo",
            Span::ThreeMonths => "3mo",
            Span::SixMonths => "6mo",
            Span::TwelveMonths => "1y",
            Span::FiveYears => "5y",
            Span::Max => "max",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn index(self) -> usize {
        match self {
            Span::OneDay => 0,
            Span::OneMonth => 1,
            Span::ThreeMonths => 2,
            Span::SixMonths => 3,
            Span::TwelveMonths => 4,
            Span::FiveYears => 5,
            Span::Max => 6,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        locale.labels().spans[self.index()]
    }

    pub fn next(self) -> Span {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Span {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for Span {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "12mo" => Ok(Span::TwelveMonths),
            "maximum" => Ok(Span::Max),
            code => Span::from_code(code)
                .ok_or_else(|| format!("unknown span '{code}' (1d, 1mo, 3mo, 6mo, 1y, 5y, max)")),
        }
    }
}

/// The three form values read on each trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSelection {
    pub identifier: String,
    pub frequency: Frequency,
    pub span: Span,
}

impl InputSelection {
    pub fn new(identifier: impl Into<String>, frequency: Frequency, span: Span) -> Self {
        Self {
            identifier: identifier.into().trim().to_string(),
            frequency,
            span,
        }
    }
}

impl Default for InputSelection {
    fn default() -> Self {
        Self::new("AAPL", Frequency::default(), Span::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_codes() {
        assert_eq!(Frequency::Daily.code(), "1d");
        assert_eq!(Frequency::Weekly.code(), "1wk");
        assert_eq!(Frequency::Monthly.code(), "1mo");
    }

    #[test]
    fn span_codes() {
        let codes: Vec<&str> = Span::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, ["1d", "1mo", "3mo", "6mo", "1y", "5y", "max"]);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Frequency::Monthly.next(), Frequency::Daily);
        assert_eq!(Frequency::Daily.prev(), Frequency::Monthly);
        assert_eq!(Span::Max.next(), Span::OneDay);
        assert_eq!(Span::OneDay.prev(), Span::Max);
    }

    #[test]
    fn parse_names_and_codes() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("1mo".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("1y".parse::<Span>().unwrap(), Span::TwelveMonths);
        assert_eq!("MAX".parse::<Span>().unwrap(), Span::Max);
        assert!("2y".parse::<Span>().is_err());
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn selection_trims_identifier() {
        let sel = InputSelection::new("  msft ", Frequency::Daily, Span::OneMonth);
        assert_eq!(sel.identifier, "msft");
    }

    #[test]
    fn default_selection_matches_form_defaults() {
        let sel = InputSelection::default();
        assert_eq!(sel.identifier, "AAPL");
        assert_eq!(sel.frequency, Frequency::Daily);
        assert_eq!(sel.span, Span::OneDay);
    }

    #[test]
    fn labels_follow_locale() {
        assert_eq!(Span::Max.label(Locale::English), "Maximum available");
        assert_eq!(Span::Max.label(Locale::Spanish), "Máximo disponible");
        assert_eq!(Frequency::Weekly.label(Locale::Spanish), "Semanal");
    }
}

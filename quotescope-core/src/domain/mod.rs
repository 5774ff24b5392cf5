//! Domain types: form selections and the two fetched series.

pub mod selection;
pub mod series;

pub use selection::{Frequency, InputSelection, Span};
pub use series::{DividendRow, DividendSeries, PriceRow, PriceSeries};

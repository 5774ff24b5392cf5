//! QuoteScope TUI: single-page form for price, volume and dividend lookups.
//!
//! Layout:
//! 1. Header: title and subtitle in the active locale
//! 2. Form: identifier input, frequency and span selectors, fetch action
//! 3. Results: price chart, volume chart, notices and dividend table
//! 4. Status bar: key hints and the last status or error

pub mod app;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::AppState;

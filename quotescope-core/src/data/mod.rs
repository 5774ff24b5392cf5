//! Data providers: the Yahoo Finance chart API and an in-memory fixture provider.

pub mod fixture;
pub mod provider;
pub mod yahoo;

pub use fixture::StaticProvider;
pub use provider::{DataError, DataProvider};
pub use yahoo::YahooProvider;

//! Series fetching: provider boundary, Yahoo implementation, raw frame layout.

pub mod align;
pub mod provider;
pub mod yahoo;

pub use provider::{DataError, RawBar, RawFetch, SeriesFetcher, DATE_COLUMN, RAW_FIELDS};
pub use yahoo::YahooFetcher;

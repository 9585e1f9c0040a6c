//! Tickersheet Core — NSE daily price download and table normalization.
//!
//! This crate contains everything behind the `tickersheet` command:
//! - Index catalog and symbol resolution (display name ↔ provider symbol)
//! - Request types: instruments, time windows, price fields
//! - Series fetching behind the `SeriesFetcher` trait, with a Yahoo chart client
//! - Normalization of single- and multi-series results into one canonical table
//! - CSV and XLSX export
//! - The session slot holding the most recent successful table

pub mod catalog;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod normalize;
pub mod resolver;
pub mod session;
pub mod table;

pub use config::{ConfigError, ExportConfig, RequestConfig};
pub use data::{DataError, RawBar, RawFetch, SeriesFetcher, YahooFetcher};
pub use domain::{parse_ticker_list, FetchRequest, Instrument, Period, PriceField, TimeWindow};
pub use error::ValidationError;
pub use export::{export_csv, export_xlsx, write_export, ExportError, ExportFormat};
pub use normalize::normalize;
pub use session::Session;
pub use table::{CanonicalTable, TableRow, TableSummary};

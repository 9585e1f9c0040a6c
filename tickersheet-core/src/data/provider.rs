//! Series fetcher trait, raw result shapes, and structured error types.
//!
//! The `SeriesFetcher` trait abstracts over the market-data source so the
//! normalizer and session can be driven by a canned fetcher in tests.

use chrono::NaiveDateTime;
use polars::prelude::{DataFrame, PolarsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::TimeWindow;
use crate::error::ValidationError;

/// Name of the date axis column in every raw frame.
pub const DATE_COLUMN: &str = "Date";

/// Raw field labels carried by a fetch result, in provider order.
pub const RAW_FIELDS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Raw daily bar for one symbol, before it is laid out into frames.
///
/// `timestamp` is exchange-local and floored to midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Value for a raw field label; unknown labels read as missing.
    pub fn field(&self, label: &str) -> Option<f64> {
        match label {
            "Open" => self.open,
            "High" => self.high,
            "Low" => self.low,
            "Close" => self.close,
            "Adj Close" => self.adj_close,
            "Volume" => self.volume,
            _ => None,
        }
    }
}

/// Raw fetch result. The provider lays data out differently for one symbol
/// than for several, so the shape is carried as an explicit tag.
#[derive(Debug, Clone)]
pub enum RawFetch {
    /// One requested symbol: a `Date` column plus one column per raw field.
    SingleSeries { symbol: String, frame: DataFrame },
    /// Several requested symbols: raw field label → frame with a `Date`
    /// column plus one column per provider symbol.
    MultiSeries { fields: BTreeMap<String, DataFrame> },
}

impl RawFetch {
    /// True when the result carries no rows at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RawFetch::SingleSeries { frame, .. } => frame.height() == 0,
            RawFetch::MultiSeries { fields } => fields.values().all(|f| f.height() == 0),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            RawFetch::SingleSeries { .. } => "single-series",
            RawFetch::MultiSeries { .. } => "multi-series",
        }
    }
}

/// Structured error types for fetch and normalize operations.
///
/// Displayable in CLI context; `user_message` gives the actionable wording.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no data: {0}")]
    NoData(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("unexpected response shape: expected {expected}, observed {observed}")]
    DataShape { expected: String, observed: String },

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

impl DataError {
    pub(crate) fn shape(expected: impl Into<String>, observed: impl Into<String>) -> Self {
        DataError::DataShape {
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    /// Whether this error means "nothing came back", which includes every
    /// network-layer failure.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            DataError::NoData(_)
                | DataError::SymbolNotFound { .. }
                | DataError::NetworkUnreachable(_)
                | DataError::RateLimited { .. }
                | DataError::Http { .. }
        )
    }

    /// Message for the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            DataError::Validation(e) => e.to_string(),
            e if e.is_no_data() => {
                "No data received. Please check the ticker symbols and try again.".to_string()
            }
            DataError::DataShape { .. } => format!(
                "The data provider returned an unexpected layout ({self}). Its format may have changed."
            ),
            other => format!("Error fetching data: {other}"),
        }
    }
}

/// Source of raw time series.
pub trait SeriesFetcher {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch daily series for `symbols` over `window`.
    ///
    /// One symbol yields `SingleSeries`, several yield `MultiSeries`. Symbols
    /// the provider has no data for may be missing from the result.
    fn fetch(&self, symbols: &[String], window: &TimeWindow) -> Result<RawFetch, DataError>;
}

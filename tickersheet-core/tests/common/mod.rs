//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::Cell;
use tickersheet_core::data::align::{multi_series, single_series};
use tickersheet_core::{DataError, RawBar, RawFetch, SeriesFetcher, TimeWindow};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn bar(date: NaiveDate, open: f64, close: f64) -> RawBar {
    RawBar {
        timestamp: date.and_hms_opt(0, 0, 0).unwrap(),
        open: Some(open),
        high: Some(open.max(close) + 1.0),
        low: Some(open.min(close) - 1.0),
        close: Some(close),
        adj_close: Some(close * 0.99),
        volume: Some(1_000_000.0),
    }
}

/// Three sessions of a steadily rising series, starting at `base`.
pub fn series(base: f64) -> Vec<RawBar> {
    vec![
        bar(d(2024, 1, 2), base, base + 1.0),
        bar(d(2024, 1, 3), base + 1.0, base + 2.0),
        bar(d(2024, 1, 4), base + 2.0, base + 3.0),
    ]
}

/// Serves canned bars per provider symbol.
///
/// Symbols are laid out in the order they were registered, not the order
/// they were requested, so column-order handling is exercised. Symbols with
/// no registered bars are left out, as the real provider does.
pub struct StaticFetcher {
    bars: Vec<(String, Vec<RawBar>)>,
    calls: Cell<usize>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.bars.push((symbol.to_string(), bars));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl SeriesFetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, symbols: &[String], _window: &TimeWindow) -> Result<RawFetch, DataError> {
        self.calls.set(self.calls.get() + 1);
        let found: Vec<(String, Vec<RawBar>)> = self
            .bars
            .iter()
            .filter(|(symbol, _)| symbols.contains(symbol))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(DataError::NoData(format!("no data for {symbols:?}")));
        }
        if symbols.len() == 1 {
            single_series(&found[0].0, &found[0].1)
        } else {
            multi_series(&found)
        }
    }
}

/// Returns the same raw result for every request.
pub struct CannedFetcher(pub RawFetch);

impl SeriesFetcher for CannedFetcher {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch(&self, _symbols: &[String], _window: &TimeWindow) -> Result<RawFetch, DataError> {
        Ok(self.0.clone())
    }
}

//! Session — the one "current table" slot and the cycle that fills it.
//!
//! A cycle is validate → resolve → fetch → normalize. The slot is only
//! written after a cycle succeeds, so a failed cycle leaves the previous
//! table in place for preview and export.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::data::{DataError, SeriesFetcher};
use crate::domain::FetchRequest;
use crate::normalize::normalize;
use crate::resolver::{build_rename_map, resolve_instruments, to_provider_symbols};
use crate::table::CanonicalTable;

#[derive(Debug, Default)]
pub struct Session {
    current: Option<CanonicalTable>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table from the most recent successful cycle.
    pub fn current(&self) -> Option<&CanonicalTable> {
        self.current.as_ref()
    }

    /// Display names of the held table's instruments.
    pub fn symbols(&self) -> &[String] {
        self.current
            .as_ref()
            .map(CanonicalTable::instruments)
            .unwrap_or_default()
    }

    /// Run one fetch cycle and, on success, replace the held table.
    pub fn run_cycle(
        &mut self,
        fetcher: &dyn SeriesFetcher,
        request: &FetchRequest,
        today: NaiveDate,
    ) -> Result<&CanonicalTable, DataError> {
        match build_table(fetcher, request, today) {
            Ok(table) => {
                info!(
                    rows = table.len(),
                    columns = table.instruments().len(),
                    "fetched {} rows of data",
                    table.len()
                );
                let held: &CanonicalTable = self.current.insert(table);
                Ok(held)
            }
            Err(e) => {
                error!(error = %e, fetcher = fetcher.name(), "fetch cycle failed");
                Err(e)
            }
        }
    }
}

/// The cycle itself; pure apart from the fetcher call.
fn build_table(
    fetcher: &dyn SeriesFetcher,
    request: &FetchRequest,
    today: NaiveDate,
) -> Result<CanonicalTable, DataError> {
    request.validate(today)?;
    let instruments = resolve_instruments(&request.tickers, &request.indices)?;
    // Collisions must fail before any network traffic.
    build_rename_map(&instruments)?;
    let symbols = to_provider_symbols(&instruments);

    let raw = fetcher.fetch(&symbols, &request.window)?;
    normalize(&raw, &instruments, request.price_field)
}

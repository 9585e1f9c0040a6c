//! Canonical table — one row per date, one column per instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{DataError, DATE_COLUMN};

/// Day-first rendering used by every display and export path.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// One trading date with a value per instrument, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Tidy output of a fetch cycle.
///
/// Invariants: rows are strictly ascending by date, every row has one value
/// slot per instrument column, and column names are display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    instruments: Vec<String>,
    rows: Vec<TableRow>,
}

/// Quick statistics over the date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    /// Calendar days between the first and last row.
    pub span_days: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CanonicalTable {
    /// Build a table, checking the row invariants.
    pub fn from_rows(instruments: Vec<String>, rows: Vec<TableRow>) -> Result<Self, DataError> {
        for row in &rows {
            if row.values.len() != instruments.len() {
                return Err(DataError::shape(
                    format!("{} values per row", instruments.len()),
                    format!("{} values on {}", row.values.len(), row.date),
                ));
            }
        }
        if let Some(pair) = rows.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(DataError::shape(
                "strictly ascending dates",
                format!("{} followed by {}", pair[0].date, pair[1].date),
            ));
        }
        Ok(Self { instruments, rows })
    }

    /// All column names, starting with the date column.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.instruments.iter().map(String::as_str))
            .collect()
    }

    /// Instrument display names in column order.
    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one instrument column, by display name.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.instruments.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Value at a date for an instrument, if both exist and the cell is set.
    pub fn value(&self, date: NaiveDate, name: &str) -> Option<f64> {
        let idx = self.instruments.iter().position(|n| n == name)?;
        let row = self
            .rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])?;
        row.values[idx]
    }

    /// First `n` rows, for on-screen preview.
    pub fn head(&self, n: usize) -> &[TableRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn summary(&self) -> Option<TableSummary> {
        let start = self.rows.first()?.date;
        let end = self.rows.last()?.date;
        Some(TableSummary {
            rows: self.rows.len(),
            span_days: (end - start).num_days(),
            start,
            end,
        })
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

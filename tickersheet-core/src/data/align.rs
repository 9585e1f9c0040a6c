//! Lay fetched bars out into the provider's raw frame shapes.
//!
//! Several symbols are aligned to the union of their timestamps. Gaps stay
//! null (no forward-fill): a holiday on one exchange is not a price.

use chrono::NaiveDateTime;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::provider::{DataError, RawBar, RawFetch, DATE_COLUMN, RAW_FIELDS};

/// One symbol: `Date` plus a column per raw field.
pub fn single_series(symbol: &str, bars: &[RawBar]) -> Result<RawFetch, DataError> {
    let timestamps: Vec<NaiveDateTime> = bars.iter().map(|b| b.timestamp).collect();
    let mut columns = vec![date_column(&timestamps)?];
    for label in RAW_FIELDS {
        let values: Vec<Option<f64>> = bars.iter().map(|b| b.field(label)).collect();
        columns.push(Column::from(Series::new(label.into(), values)));
    }
    Ok(RawFetch::SingleSeries {
        symbol: symbol.to_string(),
        frame: DataFrame::new(columns)?,
    })
}

/// Several symbols: one frame per raw field, one column per symbol.
///
/// Column order follows `symbol_bars`; the date axis is the sorted union of
/// every symbol's timestamps.
pub fn multi_series(symbol_bars: &[(String, Vec<RawBar>)]) -> Result<RawFetch, DataError> {
    let mut all_timestamps = BTreeSet::new();
    for (_, bars) in symbol_bars {
        all_timestamps.extend(bars.iter().map(|b| b.timestamp));
    }
    let timestamps: Vec<NaiveDateTime> = all_timestamps.into_iter().collect();

    // Per symbol: timestamp → bar
    let lookups: Vec<(&str, HashMap<NaiveDateTime, &RawBar>)> = symbol_bars
        .iter()
        .map(|(symbol, bars)| {
            let by_ts: HashMap<NaiveDateTime, &RawBar> =
                bars.iter().map(|b| (b.timestamp, b)).collect();
            (symbol.as_str(), by_ts)
        })
        .collect();

    let mut fields = BTreeMap::new();
    for label in RAW_FIELDS {
        let mut columns = vec![date_column(&timestamps)?];
        for (symbol, by_ts) in &lookups {
            let values: Vec<Option<f64>> = timestamps
                .iter()
                .map(|ts| by_ts.get(ts).and_then(|b| b.field(label)))
                .collect();
            columns.push(Column::from(Series::new((*symbol).into(), values)));
        }
        fields.insert(label.to_string(), DataFrame::new(columns)?);
    }

    Ok(RawFetch::MultiSeries { fields })
}

/// Millisecond datetime column, the provider's native date axis.
fn date_column(timestamps: &[NaiveDateTime]) -> Result<Column, DataError> {
    let millis: Vec<i64> = timestamps
        .iter()
        .map(|ts| ts.and_utc().timestamp_millis())
        .collect();
    let series = Series::new(DATE_COLUMN.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(Column::from(series))
}

//! Table normalizer — reshapes a raw fetch result into the canonical table.
//!
//! The raw layout depends on how many symbols were requested. The shape is
//! decided once, by matching on the `RawFetch` tag; after that both layouts
//! are reduced to the same `FieldSlice` (a date axis plus one value series
//! per provider symbol) and go through a single rename/reorder path.
//!
//! Steps:
//! 1. pick the layout from the tag
//! 2. select the configured price field
//! 3. extract the date axis as calendar dates, rejecting duplicates
//! 4. rename provider symbols to display names, dropping unmapped series
//! 5. order columns as tickers then indices, each in request order
//! 6. drop dates where no instrument has a value, sort ascending

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::data::{DataError, RawFetch, DATE_COLUMN};
use crate::domain::{Instrument, PriceField};
use crate::error::ValidationError;
use crate::resolver::build_rename_map;
use crate::table::{CanonicalTable, TableRow};

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One price field, reduced to a date axis and per-symbol values.
struct FieldSlice {
    dates: Vec<NaiveDate>,
    series: Vec<(String, Vec<Option<f64>>)>,
}

/// Reshape `raw` into a canonical table for `instruments`.
pub fn normalize(
    raw: &RawFetch,
    instruments: &[Instrument],
    price_field: PriceField,
) -> Result<CanonicalTable, DataError> {
    if instruments.is_empty() {
        return Err(ValidationError::NoInstruments.into());
    }
    let rename = build_rename_map(instruments)?;

    if raw.is_empty() {
        return Err(DataError::NoData(format!(
            "{} result has no rows",
            raw.shape_name()
        )));
    }

    let slice = select_field(raw, instruments.len(), price_field)?;
    debug!(
        shape = raw.shape_name(),
        dates = slice.dates.len(),
        series = slice.series.len(),
        field = %price_field,
        "selected price field"
    );

    // Provider symbol → display name; anything the request did not ask for goes.
    let mut by_name: HashMap<&str, &[Option<f64>]> = HashMap::with_capacity(slice.series.len());
    for (symbol, values) in &slice.series {
        match rename.display_name(symbol) {
            Some(name) => {
                by_name.insert(name, values.as_slice());
            }
            None => warn!(symbol = %symbol, "dropping series with no matching instrument"),
        }
    }

    let ordered: Vec<&Instrument> = instruments
        .iter()
        .filter(|i| !i.is_index())
        .chain(instruments.iter().filter(|i| i.is_index()))
        .collect();

    let columns: Vec<Option<&[Option<f64>]>> = ordered
        .iter()
        .map(|inst| {
            let found = by_name.get(inst.display_name()).copied();
            if found.is_none() {
                warn!(
                    instrument = %inst,
                    symbol = %inst.provider_symbol(),
                    "provider returned no series for instrument, column left empty"
                );
            }
            found
        })
        .collect();

    let mut rows: Vec<TableRow> = Vec::with_capacity(slice.dates.len());
    for (i, date) in slice.dates.iter().enumerate() {
        let values: Vec<Option<f64>> = columns
            .iter()
            .map(|col| col.and_then(|values| values[i]))
            .collect();
        if values.iter().all(Option::is_none) {
            continue;
        }
        rows.push(TableRow {
            date: *date,
            values,
        });
    }

    if rows.is_empty() {
        return Err(DataError::NoData(format!(
            "no {price_field} values for any requested instrument"
        )));
    }
    rows.sort_by_key(|r| r.date);

    let names = ordered
        .iter()
        .map(|inst| inst.display_name().to_string())
        .collect();
    CanonicalTable::from_rows(names, rows)
}

/// Step 1 and 2: the only place the raw layout is inspected.
fn select_field(
    raw: &RawFetch,
    instrument_count: usize,
    price_field: PriceField,
) -> Result<FieldSlice, DataError> {
    let label = price_field.column_name();
    match raw {
        RawFetch::SingleSeries { symbol, frame } => {
            if instrument_count != 1 {
                return Err(DataError::shape(
                    format!("multi-series layout for {instrument_count} instruments"),
                    "single-series layout",
                ));
            }
            let dates = date_axis(frame)?;
            let values = value_column(frame, label)?;
            Ok(FieldSlice {
                dates,
                series: vec![(symbol.clone(), values)],
            })
        }
        RawFetch::MultiSeries { fields } => {
            let frame = fields.get(label).ok_or_else(|| {
                let seen: Vec<&str> = fields.keys().map(String::as_str).collect();
                DataError::shape(
                    format!("'{label}' field"),
                    format!("fields [{}]", seen.join(", ")),
                )
            })?;
            let dates = date_axis(frame)?;
            let series = column_names(frame)
                .into_iter()
                .filter(|name| name != DATE_COLUMN)
                .map(|name| {
                    let values = value_column(frame, &name)?;
                    Ok((name, values))
                })
                .collect::<Result<Vec<_>, DataError>>()?;
            Ok(FieldSlice { dates, series })
        }
    }
}

/// Step 3: `Date` or `Datetime` column → calendar dates, one per row.
fn date_axis(frame: &DataFrame) -> Result<Vec<NaiveDate>, DataError> {
    let column = frame.column(DATE_COLUMN).map_err(|_| {
        DataError::shape(
            format!("'{DATE_COLUMN}' column"),
            format!("columns [{}]", column_names(frame).join(", ")),
        )
    })?;

    let as_date = match column.dtype() {
        DataType::Date => column.clone(),
        DataType::Datetime(_, _) => column.cast(&DataType::Date)?,
        other => {
            return Err(DataError::shape(
                format!("'{DATE_COLUMN}' of date or datetime type"),
                format!("{other:?}"),
            ))
        }
    };
    let days = as_date.cast(&DataType::Int32)?;

    let mut seen = HashSet::with_capacity(frame.height());
    let mut dates = Vec::with_capacity(frame.height());
    for (row, day) in days.i32()?.into_iter().enumerate() {
        let day = day.ok_or_else(|| {
            DataError::shape("a date on every row", format!("null date at row {row}"))
        })?;
        let date = NaiveDate::from_num_days_from_ce_opt(day + UNIX_EPOCH_DAYS_FROM_CE)
            .ok_or_else(|| DataError::shape("a representable date", format!("day number {day}")))?;
        if !seen.insert(date) {
            return Err(DataError::shape(
                "one row per date",
                format!("{date} appears more than once"),
            ));
        }
        dates.push(date);
    }
    Ok(dates)
}

/// A numeric column as `f64` cells; nulls stay unset.
fn value_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    let column = frame.column(name).map_err(|_| {
        DataError::shape(
            format!("'{name}' column"),
            format!("columns [{}]", column_names(frame).join(", ")),
        )
    })?;

    let numeric = matches!(
        column.dtype(),
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
            | DataType::Null
    );
    if !numeric {
        return Err(DataError::shape(
            format!("numeric '{name}' column"),
            format!("{:?}", column.dtype()),
        ));
    }

    let floats = column.cast(&DataType::Float64)?;
    let values = floats.f64()?.into_iter().collect();
    Ok(values)
}

fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect()
}

//! Export — CSV and XLSX renderings of the canonical table.
//!
//! Both formats share the same contract: header row is the canonical column
//! names, dates read day-first, values keep their full precision, unset
//! cells stay empty. File names embed the export date as `YYYYMMDD`.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::table::{format_date, CanonicalTable};

/// Sheet name used for spreadsheet exports.
pub const SHEET_NAME: &str = "Stock Data";

/// Excel number format for the date column.
const EXCEL_DATE_FORMAT: &str = "dd-mm-yyyy";

/// Errors from the export layer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// `nse_data_YYYYMMDD.<ext>`
pub fn export_file_name(format: ExportFormat, export_date: NaiveDate) -> String {
    format!(
        "nse_data_{}.{}",
        export_date.format("%Y%m%d"),
        format.extension()
    )
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Render the table as CSV with `DD-MM-YYYY` dates and no index column.
pub fn export_csv(table: &CanonicalTable) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(table.column_names())?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(format_date(row.date));
        // `{}` on f64 is the shortest text that parses back to the same value
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(data)?)
}

// ─── XLSX ───────────────────────────────────────────────────────────

/// Render the table as a single-sheet workbook.
///
/// Dates are real Excel dates with a day-first number format, so the
/// spreadsheet can sort and filter on them.
pub fn export_xlsx(table: &CanonicalTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(EXCEL_DATE_FORMAT);
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in table.column_names().into_iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (i, row) in table.rows().iter().enumerate() {
        let r = (i + 1) as u32;
        let date = ExcelDateTime::from_ymd(
            row.date.year() as u16,
            row.date.month() as u8,
            row.date.day() as u8,
        )?;
        sheet.write_datetime_with_format(r, 0, &date, &date_format)?;
        for (j, value) in row.values.iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(r, (j + 1) as u16, *v)?;
            }
        }
    }
    sheet.set_column_width(0, 12)?;

    Ok(workbook.save_to_buffer()?)
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write one export into `dir`, named for `export_date`. Returns the path.
pub fn write_export(
    table: &CanonicalTable,
    format: ExportFormat,
    dir: &Path,
    export_date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => export_csv(table)?.into_bytes(),
        ExportFormat::Xlsx => export_xlsx(table)?,
    };

    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_file_name(format, export_date));
    std::fs::write(&path, &bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), rows = table.len(), "export written");
    Ok(path)
}

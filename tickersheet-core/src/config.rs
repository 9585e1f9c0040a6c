//! Request files — a saved download request in TOML.
//!
//! ```toml
//! tickers = ["RELIANCE", "TCS"]
//! indices = ["NIFTY 50"]
//! period = "1y"            # or start/end, never both
//! price_field = "adj_close"
//!
//! [export]
//! formats = ["csv", "xlsx"]
//! out_dir = "exports"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{FetchRequest, Period, PriceField, TimeWindow};
use crate::error::ValidationError;
use crate::export::ExportFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read request file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse request TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("set either `period` or `start`/`end`, not both")]
    PeriodAndRange,

    #[error("`start` and `end` must be given together")]
    HalfRange,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub formats: Vec<ExportFormat>,
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub indices: Vec<String>,
    pub period: Option<Period>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub price_field: PriceField,
    #[serde(default)]
    pub export: ExportConfig,
}

impl RequestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and check the window fields; instruments are checked later.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.window_spec()?;
        Ok(config)
    }

    fn window_spec(&self) -> Result<Option<(NaiveDate, NaiveDate)>, ConfigError> {
        match (self.period, self.start, self.end) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ConfigError::PeriodAndRange),
            (_, Some(start), Some(end)) => Ok(Some((start, end))),
            (_, None, None) => Ok(None),
            _ => Err(ConfigError::HalfRange),
        }
    }

    /// The window this file asks for; a missing window is the default period.
    pub fn window(&self, today: NaiveDate) -> Result<TimeWindow, ConfigError> {
        match self.window_spec()? {
            Some((start, end)) => Ok(TimeWindow::range(start, end, today)?),
            None => Ok(TimeWindow::Period(self.period.unwrap_or_default())),
        }
    }

    /// Tickers stay as written; they are resolved when the cycle runs.
    pub fn into_request(self, today: NaiveDate) -> Result<FetchRequest, ConfigError> {
        let window = self.window(today)?;
        Ok(FetchRequest::new(
            self.tickers,
            self.indices,
            window,
            self.price_field,
            today,
        )?)
    }
}

//! Time windows — named trailing periods or explicit date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Named trailing period, resolved by the provider relative to the request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::Max,
    ];

    /// Provider code, also accepted on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::Max => "max",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::OneMonth => "1 Month",
            Period::ThreeMonths => "3 Months",
            Period::SixMonths => "6 Months",
            Period::OneYear => "1 Year",
            Period::TwoYears => "2 Years",
            Period::FiveYears => "5 Years",
            Period::TenYears => "10 Years",
            Period::Max => "Maximum Available",
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.code() == needle)
            .ok_or_else(|| ValidationError::UnknownPeriod(s.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The span of history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    Period(Period),
    /// Explicit range; `end` is exclusive, as the provider treats it.
    Range { start: NaiveDate, end: NaiveDate },
}

impl TimeWindow {
    /// Build an explicit range, rejecting empty, inverted, or future windows.
    pub fn range(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let window = Self::Range { start, end };
        window.validate(today)?;
        Ok(window)
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        let Self::Range { start, end } = *self else {
            return Ok(());
        };
        if start >= end {
            return Err(ValidationError::EmptyWindow { start, end });
        }
        for date in [start, end] {
            if date > today {
                return Err(ValidationError::FutureDate { date, today });
            }
        }
        Ok(())
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::Period(Period::default())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Period(p) => write!(f, "{p}"),
            Self::Range { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PriceField, TimeWindow};
use crate::error::ValidationError;

/// A validated download request, ready for a fetch cycle.
///
/// Tickers and indices are kept as the user gave them; resolution to
/// instruments happens inside the cycle so that a bad ticker surfaces as a
/// cycle error rather than at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub tickers: Vec<String>,
    pub indices: Vec<String>,
    pub window: TimeWindow,
    pub price_field: PriceField,
}

impl FetchRequest {
    pub fn new(
        tickers: Vec<String>,
        indices: Vec<String>,
        window: TimeWindow,
        price_field: PriceField,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            tickers,
            indices,
            window,
            price_field,
        };
        request.validate(today)?;
        Ok(request)
    }

    /// Checks that must pass before any network traffic.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.instrument_count() == 0 {
            return Err(ValidationError::NoInstruments);
        }
        self.window.validate(today)
    }

    pub fn instrument_count(&self) -> usize {
        self.tickers.len() + self.indices.len()
    }
}

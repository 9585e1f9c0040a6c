use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Which parallel value series to extract per instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Actual closing price, as published by NSE.
    #[default]
    Close,
    /// Close adjusted for splits and dividends.
    AdjClose,
    Open,
}

impl PriceField {
    pub const ALL: [PriceField; 3] = [PriceField::Close, PriceField::AdjClose, PriceField::Open];

    /// Label of this field in a raw fetch result.
    pub fn column_name(self) -> &'static str {
        match self {
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Open => "Open",
        }
    }
}

impl FromStr for PriceField {
    type Err = ValidationError;

    /// Accepts the raw label ("Adj Close") as well as snake/kebab forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "close" => Ok(PriceField::Close),
            "adjclose" => Ok(PriceField::AdjClose),
            "open" => Ok(PriceField::Open),
            _ => Err(ValidationError::UnknownPriceField(s.to_string())),
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_spellings() {
        assert_eq!("Adj Close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert_eq!("adj-close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert_eq!("adj_close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert_eq!("CLOSE".parse::<PriceField>().unwrap(), PriceField::Close);
        assert!("high".parse::<PriceField>().is_err());
    }

    #[test]
    fn display_matches_raw_label() {
        for field in PriceField::ALL {
            assert_eq!(field.to_string(), field.column_name());
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog;
use crate::error::ValidationError;

/// Yahoo Finance suffix for NSE-listed equities.
pub const NSE_SUFFIX: &str = ".NS";

const MAX_TICKER_LEN: usize = 20;

/// A requested instrument: a user ticker or a catalog index.
///
/// The display name is what ends up as a column header; the provider symbol is
/// what the fetcher sends to Yahoo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// NSE equity, stored upper-cased and without the `.NS` suffix.
    Ticker(String),
    /// NIFTY index with its catalog symbol.
    Index { name: String, symbol: String },
}

impl Instrument {
    /// Normalize and validate a free-text ticker.
    pub fn ticker(input: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_ticker(input);
        if normalized.is_empty() {
            return Err(ValidationError::InvalidTicker {
                input: input.to_string(),
                reason: "ticker is empty".into(),
            });
        }

        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::InvalidTicker {
                input: input.to_string(),
                reason: format!("{len} characters exceeds the maximum of {MAX_TICKER_LEN}"),
            });
        }

        if let Some(ch) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '_')))
        {
            return Err(ValidationError::InvalidTicker {
                input: input.to_string(),
                reason: format!("character '{ch}' is not allowed"),
            });
        }

        Ok(Self::Ticker(normalized))
    }

    /// Look up a catalog index by its exact display name.
    pub fn index(name: &str) -> Result<Self, ValidationError> {
        let symbol = catalog::provider_symbol(name).ok_or_else(|| ValidationError::UnknownIndex {
            name: name.to_string(),
        })?;
        Ok(Self::Index {
            name: name.to_string(),
            symbol: symbol.to_string(),
        })
    }

    /// User-facing name, used verbatim as the output column header.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ticker(ticker) => ticker,
            Self::Index { name, .. } => name,
        }
    }

    /// Identifier the data provider expects.
    pub fn provider_symbol(&self) -> String {
        match self {
            Self::Ticker(ticker) => format!("{ticker}{NSE_SUFFIX}"),
            Self::Index { symbol, .. } => symbol.clone(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Trim, upper-case, and drop a trailing `.NS` the user may have typed anyway.
fn normalize_ticker(input: &str) -> String {
    let upper = input.trim().to_ascii_uppercase();
    match upper.strip_suffix(NSE_SUFFIX) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => upper,
    }
}

/// Split a free-text ticker list (one per line, commas also accepted).
///
/// Blank entries are skipped; the remaining entries are normalized but not
/// validated, so `Instrument::ticker` still reports bad input with context.
pub fn parse_ticker_list(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(normalize_ticker)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_upper_cased_and_suffixed() {
        let inst = Instrument::ticker("  reliance ").unwrap();
        assert_eq!(inst.display_name(), "RELIANCE");
        assert_eq!(inst.provider_symbol(), "RELIANCE.NS");
        assert!(!inst.is_index());
    }

    #[test]
    fn typed_suffix_is_not_doubled() {
        let inst = Instrument::ticker("tcs.ns").unwrap();
        assert_eq!(inst.display_name(), "TCS");
        assert_eq!(inst.provider_symbol(), "TCS.NS");
    }

    #[test]
    fn ticker_allows_nse_punctuation() {
        assert!(Instrument::ticker("M&M").is_ok());
        assert!(Instrument::ticker("BAJAJ-AUTO").is_ok());
    }

    #[test]
    fn ticker_rejects_bad_input() {
        assert!(matches!(
            Instrument::ticker("   "),
            Err(ValidationError::InvalidTicker { .. })
        ));
        assert!(matches!(
            Instrument::ticker("TATA MOTORS"),
            Err(ValidationError::InvalidTicker { .. })
        ));
        assert!(matches!(
            Instrument::ticker(&"A".repeat(21)),
            Err(ValidationError::InvalidTicker { .. })
        ));
    }

    #[test]
    fn index_uses_catalog_symbol() {
        let inst = Instrument::index("NIFTY BANK").unwrap();
        assert_eq!(inst.display_name(), "NIFTY BANK");
        assert_eq!(inst.provider_symbol(), "^NSEBANK");
        assert!(inst.is_index());
    }

    #[test]
    fn unknown_index_is_rejected() {
        assert_eq!(
            Instrument::index("NIFTY MOON"),
            Err(ValidationError::UnknownIndex {
                name: "NIFTY MOON".into()
            })
        );
    }

    #[test]
    fn ticker_list_parsing() {
        let parsed = parse_ticker_list("reliance\n\n  tcs \nINFY.NS, hdfcbank\n");
        assert_eq!(parsed, vec!["RELIANCE", "TCS", "INFY", "HDFCBANK"]);
    }
}

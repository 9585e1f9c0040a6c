//! Symbol resolution between user-facing names and provider symbols.
//!
//! Everything here is a pure function of its input and the static catalog.

use std::collections::HashMap;

use crate::domain::Instrument;
use crate::error::ValidationError;

/// Provider symbol → display name. Injective by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    by_symbol: HashMap<String, String>,
}

impl RenameMap {
    pub fn display_name(&self, provider_symbol: &str) -> Option<&str> {
        self.by_symbol.get(provider_symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

/// Resolve tickers then indices, each in input order.
pub fn resolve_instruments<T, I>(
    tickers: &[T],
    index_names: &[I],
) -> Result<Vec<Instrument>, ValidationError>
where
    T: AsRef<str>,
    I: AsRef<str>,
{
    let mut instruments = Vec::with_capacity(tickers.len() + index_names.len());
    for ticker in tickers {
        instruments.push(Instrument::ticker(ticker.as_ref())?);
    }
    for name in index_names {
        instruments.push(Instrument::index(name.as_ref())?);
    }
    Ok(instruments)
}

pub fn to_provider_symbols(instruments: &[Instrument]) -> Vec<String> {
    instruments.iter().map(Instrument::provider_symbol).collect()
}

/// Build the inverse map used to rename result columns.
///
/// Two instruments sharing a provider symbol (e.g. the same ticker typed
/// twice) would make the output ambiguous, so that is rejected here.
pub fn build_rename_map(instruments: &[Instrument]) -> Result<RenameMap, ValidationError> {
    let mut by_symbol: HashMap<String, String> = HashMap::with_capacity(instruments.len());
    for inst in instruments {
        let symbol = inst.provider_symbol();
        if let Some(existing) = by_symbol.get(&symbol) {
            return Err(ValidationError::SymbolCollision {
                symbol,
                first: existing.clone(),
                second: inst.display_name().to_string(),
            });
        }
        by_symbol.insert(symbol, inst.display_name().to_string());
    }
    Ok(RenameMap { by_symbol })
}

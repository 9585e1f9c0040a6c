use chrono::NaiveDate;
use thiserror::Error;

/// Bad or inconsistent request input.
///
/// Always recoverable: the message tells the user what to change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("add at least one ticker or select an index")]
    NoInstruments,

    #[error("invalid ticker '{input}': {reason}")]
    InvalidTicker { input: String, reason: String },

    #[error("unknown index '{name}' (run `tickersheet indices` for the list)")]
    UnknownIndex { name: String },

    #[error("'{first}' and '{second}' both resolve to provider symbol {symbol}")]
    SymbolCollision {
        symbol: String,
        first: String,
        second: String,
    },

    #[error("start date {start} must be before end date {end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },

    #[error("date {date} is in the future (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("unknown period '{0}' (expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, max)")]
    UnknownPeriod(String),

    #[error("unknown price field '{0}' (expected Close, Adj Close or Open)")]
    UnknownPriceField(String),
}

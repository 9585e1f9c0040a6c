//! Domain types: instruments, time windows, price fields, requests.

pub mod instrument;
pub mod price_field;
pub mod request;
pub mod window;

pub use instrument::{parse_ticker_list, Instrument, NSE_SUFFIX};
pub use price_field::PriceField;
pub use request::FetchRequest;
pub use window::{Period, TimeWindow};

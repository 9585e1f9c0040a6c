//! End-to-end fetch cycles against canned fetchers.

mod common;

use common::{bar, d, series, CannedFetcher, StaticFetcher};
use std::collections::BTreeMap;
use tickersheet_core::data::align::{multi_series, single_series};
use tickersheet_core::resolver::{resolve_instruments, to_provider_symbols};
use tickersheet_core::{
    normalize, DataError, FetchRequest, Instrument, Period, PriceField, RawFetch, Session,
    TimeWindow, ValidationError,
};

fn today() -> chrono::NaiveDate {
    d(2024, 6, 30)
}

fn request(tickers: &[&str], indices: &[&str], price_field: PriceField) -> FetchRequest {
    FetchRequest::new(
        tickers.iter().map(|s| s.to_string()).collect(),
        indices.iter().map(|s| s.to_string()).collect(),
        TimeWindow::Period(Period::OneYear),
        price_field,
        today(),
    )
    .unwrap()
}

#[test]
fn single_ticker_yields_date_and_ticker_columns() {
    let fetcher = StaticFetcher::new().with("TCS.NS", series(3850.0));
    let mut session = Session::new();

    let table = session
        .run_cycle(&fetcher, &request(&["tcs"], &[], PriceField::Close), today())
        .unwrap();

    assert_eq!(table.column_names(), vec!["Date", "TCS"]);
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.column("TCS").unwrap(),
        vec![Some(3851.0), Some(3852.0), Some(3853.0)]
    );
    assert_eq!(session.symbols(), ["TCS".to_string()]);
}

#[test]
fn columns_follow_request_order_not_provider_order() {
    // The provider lists the index first and the tickers reversed.
    let fetcher = StaticFetcher::new()
        .with("^NSEI", series(21_000.0))
        .with("TCS.NS", series(3850.0))
        .with("RELIANCE.NS", series(2500.0));
    let mut session = Session::new();

    let table = session
        .run_cycle(
            &fetcher,
            &request(&["RELIANCE", "TCS"], &["NIFTY 50"], PriceField::Close),
            today(),
        )
        .unwrap();

    assert_eq!(
        table.column_names(),
        vec!["Date", "RELIANCE", "TCS", "NIFTY 50"]
    );
    assert_eq!(table.value(d(2024, 1, 3), "NIFTY 50"), Some(21_002.0));
    assert_eq!(table.value(d(2024, 1, 3), "RELIANCE"), Some(2502.0));
}

#[test]
fn unknown_index_is_rejected_before_fetching() {
    let err = resolve_instruments(&["TCS"], &["NIFTY MOONSHOT"]).unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownIndex {
            name: "NIFTY MOONSHOT".into()
        }
    );

    let fetcher = StaticFetcher::new().with("TCS.NS", series(3850.0));
    let mut session = Session::new();
    let req = FetchRequest {
        tickers: vec!["TCS".into()],
        indices: vec!["NIFTY MOONSHOT".into()],
        window: TimeWindow::default(),
        price_field: PriceField::Close,
    };
    let err = session.run_cycle(&fetcher, &req, today()).unwrap_err();
    assert!(matches!(err, DataError::Validation(_)));
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn empty_result_keeps_the_previous_table() {
    let good = StaticFetcher::new().with("TCS.NS", series(3850.0));
    let req = request(&["TCS"], &[], PriceField::Close);
    let mut session = Session::new();
    let before = session.run_cycle(&good, &req, today()).unwrap().clone();

    let empty = CannedFetcher(single_series("TCS.NS", &[]).unwrap());
    let err = session.run_cycle(&empty, &req, today()).unwrap_err();

    assert!(matches!(err, DataError::NoData(_)));
    assert!(err.user_message().contains("check the ticker symbols"));
    assert_eq!(session.current(), Some(&before));
}

#[test]
fn shape_error_keeps_the_previous_table() {
    let good = StaticFetcher::new()
        .with("TCS.NS", series(3850.0))
        .with("INFY.NS", series(1500.0));
    let req = request(&["TCS", "INFY"], &[], PriceField::Close);
    let mut session = Session::new();
    let before = session.run_cycle(&good, &req, today()).unwrap().clone();

    // Only the open prices come back.
    let RawFetch::MultiSeries { fields } = multi_series(&[
        ("TCS.NS".to_string(), series(3850.0)),
        ("INFY.NS".to_string(), series(1500.0)),
    ])
    .unwrap() else {
        panic!("expected multi-series layout");
    };
    let open_only: BTreeMap<String, _> = fields.into_iter().filter(|(k, _)| k == "Open").collect();
    let broken = CannedFetcher(RawFetch::MultiSeries { fields: open_only });
    let err = session.run_cycle(&broken, &req, today()).unwrap_err();

    assert!(matches!(err, DataError::DataShape { .. }));
    assert!(!err.is_no_data());
    assert_eq!(session.current(), Some(&before));
}

#[test]
fn missing_field_is_a_shape_error() {
    let RawFetch::MultiSeries { mut fields } = multi_series(&[
        ("TCS.NS".to_string(), series(3850.0)),
        ("INFY.NS".to_string(), series(1500.0)),
    ])
    .unwrap() else {
        panic!("expected multi-series layout");
    };
    fields.remove("Adj Close");
    let raw = RawFetch::MultiSeries { fields };

    let insts = resolve_instruments(&["TCS", "INFY"], &[] as &[&str]).unwrap();
    let err = normalize(&raw, &insts, PriceField::AdjClose).unwrap_err();
    assert!(matches!(err, DataError::DataShape { .. }));
    assert!(err.user_message().contains("format may have changed"));
}

#[test]
fn symbol_without_data_becomes_an_empty_column() {
    let fetcher = StaticFetcher::new().with("TCS.NS", series(3850.0));
    let mut session = Session::new();

    let table = session
        .run_cycle(
            &fetcher,
            &request(&["TCS", "NOSUCHCO"], &[], PriceField::Close),
            today(),
        )
        .unwrap();

    assert_eq!(table.column_names(), vec!["Date", "TCS", "NOSUCHCO"]);
    assert_eq!(table.column("NOSUCHCO").unwrap(), vec![None, None, None]);
}

#[test]
fn gaps_stay_unset_and_dates_are_unioned() {
    let reliance = vec![bar(d(2024, 1, 2), 2500.0, 2510.0), bar(d(2024, 1, 4), 2510.0, 2520.0)];
    let tcs = vec![bar(d(2024, 1, 3), 3850.0, 3860.0)];
    let fetcher = StaticFetcher::new()
        .with("RELIANCE.NS", reliance)
        .with("TCS.NS", tcs);
    let mut session = Session::new();

    let table = session
        .run_cycle(
            &fetcher,
            &request(&["RELIANCE", "TCS"], &[], PriceField::Open),
            today(),
        )
        .unwrap();

    let dates: Vec<_> = table.rows().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
    assert_eq!(
        table.column("RELIANCE").unwrap(),
        vec![Some(2500.0), None, Some(2510.0)]
    );
    assert_eq!(table.column("TCS").unwrap(), vec![None, Some(3850.0), None]);
}

#[test]
fn price_field_selects_the_series() {
    let fetcher = StaticFetcher::new().with("^NSEBANK", series(47_000.0));
    let mut session = Session::new();

    let table = session
        .run_cycle(
            &fetcher,
            &request(&[], &["NIFTY BANK"], PriceField::AdjClose),
            today(),
        )
        .unwrap();

    assert_eq!(table.column_names(), vec!["Date", "NIFTY BANK"]);
    let first = table.rows()[0].values[0].unwrap();
    assert!((first - 47_001.0 * 0.99).abs() < 1e-9);
}

#[test]
fn single_and_multi_layouts_agree() {
    let bars = series(3850.0);
    let tcs = vec![Instrument::ticker("TCS").unwrap()];

    let single = single_series("TCS.NS", &bars).unwrap();
    let multi = multi_series(&[
        ("TCS.NS".to_string(), bars.clone()),
        ("IGNORED.NS".to_string(), series(10.0)),
    ])
    .unwrap();

    for field in PriceField::ALL {
        let a = normalize(&single, &tcs, field).unwrap();
        let b = normalize(&multi, &tcs, field).unwrap();
        assert_eq!(a, b, "layouts disagree on {field}");
    }
}

#[test]
fn resolution_is_repeatable() {
    let tickers = ["reliance", " tcs.ns ", "HDFCBANK"];
    let indices = ["NIFTY IT", "NIFTY 50"];

    let first = to_provider_symbols(&resolve_instruments(&tickers, &indices).unwrap());
    let second = to_provider_symbols(&resolve_instruments(&tickers, &indices).unwrap());

    assert_eq!(first, second);
    assert_eq!(
        first,
        vec!["RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "^CNXIT", "^NSEI"]
    );
}

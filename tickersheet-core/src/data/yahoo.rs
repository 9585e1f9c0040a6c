//! Yahoo Finance series fetcher.
//!
//! Fetches daily bars from Yahoo's v8 chart API, one request per symbol, and
//! lays them out into the raw frame shapes. Requests are bounded by a 30s
//! timeout and never retried.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; anything unexpected in the payload surfaces as `DataShape`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::align::{multi_series, single_series};
use super::provider::{DataError, RawBar, RawFetch, SeriesFetcher};
use crate::domain::TimeWindow;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds (19800 for NSE).
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance fetcher.
pub struct YahooFetcher {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl YahooFetcher {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the fetcher at another chart endpoint (a mirror or a local stub).
    pub fn with_base_url(base_url: &str) -> Result<Self, DataError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DataError::NetworkUnreachable(format!("invalid base URL: {e}")))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Build the chart API URL for a symbol and window.
    fn chart_url(&self, symbol: &str, window: &TimeWindow) -> Result<Url, DataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataError::NetworkUnreachable("base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(symbol);
        {
            let mut query = url.query_pairs_mut();
            match window {
                TimeWindow::Period(period) => {
                    query.append_pair("range", period.code());
                }
                TimeWindow::Range { start, end } => {
                    query.append_pair("period1", &midnight_utc(*start).to_string());
                    query.append_pair("period2", &midnight_utc(*end).to_string());
                }
            }
            query
                .append_pair("interval", "1d")
                .append_pair("includeAdjustedClose", "true");
        }
        Ok(url)
    }

    /// Fetch and parse one symbol.
    fn fetch_symbol(&self, symbol: &str, window: &TimeWindow) -> Result<Vec<RawBar>, DataError> {
        let url = self.chart_url(symbol, window)?;
        debug!(%url, "requesting chart");

        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DataError::NetworkUnreachable(format!("timed out fetching {symbol}: {e}"))
            } else {
                DataError::NetworkUnreachable(format!("request for {symbol} failed: {e}"))
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        // Unknown symbols come back as 404 with a JSON error body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = resp.text().map_err(|e| {
            DataError::NetworkUnreachable(format!("failed to read response for {symbol}: {e}"))
        })?;
        parse_chart(symbol, &body)
    }
}

impl SeriesFetcher for YahooFetcher {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbols: &[String], window: &TimeWindow) -> Result<RawFetch, DataError> {
        let mut fetched: Vec<(String, Vec<RawBar>)> = Vec::with_capacity(symbols.len());
        let mut first_error = None;

        for symbol in symbols {
            match self.fetch_symbol(symbol, window) {
                Ok(bars) => {
                    debug!(symbol = %symbol, bars = bars.len(), "fetched series");
                    fetched.push((symbol.clone(), bars));
                }
                Err(e) if e.is_no_data() => {
                    warn!(symbol = %symbol, error = %e, "no data for symbol, leaving it out");
                    first_error.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        if fetched.is_empty() {
            return Err(first_error
                .unwrap_or_else(|| DataError::NoData("no symbols were requested".into())));
        }

        info!(
            requested = symbols.len(),
            received = fetched.len(),
            %window,
            "fetch complete"
        );

        if symbols.len() == 1 {
            let (symbol, bars) = &fetched[0];
            single_series(symbol, bars)
        } else {
            multi_series(&fetched)
        }
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Parse a chart API payload into bars.
fn parse_chart(symbol: &str, body: &str) -> Result<Vec<RawBar>, DataError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        DataError::shape("chart JSON payload", format!("unparseable body for {symbol}: {e}"))
    })?;

    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::NoData(format!("{symbol}: {}: {}", err.code, err.description)),
        None => DataError::shape("chart.result or chart.error", "neither present"),
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::shape("one chart result", "empty result array"))?;

    // A valid symbol with no trading days in the window has no timestamps.
    let Some(timestamps) = data.timestamp else {
        return Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        });
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::shape("indicators.quote[0]", "empty quote array"))?;

    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let mut bars: Vec<RawBar> = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let timestamp = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .map(|dt| local_midnight(dt.naive_utc()))
            .ok_or_else(|| DataError::shape("unix timestamp", ts.to_string()))?;

        let bar = RawBar {
            timestamp,
            open: quote.open.get(i).copied().flatten(),
            high: quote.high.get(i).copied().flatten(),
            low: quote.low.get(i).copied().flatten(),
            close: quote.close.get(i).copied().flatten(),
            adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
            volume: quote.volume.get(i).copied().flatten(),
        };

        // Skip rows where every field is missing (non-trading days)
        if bar.open.is_none()
            && bar.high.is_none()
            && bar.low.is_none()
            && bar.close.is_none()
            && bar.volume.is_none()
        {
            continue;
        }

        // Yahoo occasionally repeats the latest session; keep the newest row.
        match bars.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => bars.push(bar),
        }
    }

    if bars.is_empty() {
        return Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        });
    }

    Ok(bars)
}

fn local_midnight(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(chrono::NaiveTime::MIN)
}

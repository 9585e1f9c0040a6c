//! Tickersheet CLI — fetch, preview, and export NSE daily price tables.
//!
//! Commands:
//! - `fetch` — download one price field for tickers and indices, print a
//!   preview with quick statistics, and optionally write CSV/XLSX exports
//! - `indices` — list the index catalog

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickersheet_core::catalog::NIFTY_INDICES;
use tickersheet_core::table::format_date;
use tickersheet_core::{
    parse_ticker_list, write_export, CanonicalTable, ExportFormat, Period, PriceField,
    RequestConfig, Session, YahooFetcher,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickersheet",
    about = "Tickersheet — NSE daily price downloader",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a price table for NSE tickers and indices.
    Fetch(FetchArgs),
    /// List the NIFTY indices that can be requested with --index.
    Indices,
}

#[derive(clap::Args)]
struct FetchArgs {
    /// NSE ticker without suffix (e.g. RELIANCE). Repeatable.
    #[arg(long = "ticker", short = 't')]
    tickers: Vec<String>,

    /// File with one ticker per line.
    #[arg(long)]
    tickers_file: Option<PathBuf>,

    /// Index name from `tickersheet indices` (e.g. "NIFTY 50"). Repeatable.
    #[arg(long = "index", short = 'i')]
    indices: Vec<String>,

    /// Trailing period: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, max. Defaults to 1y.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    period: Option<String>,

    /// Start date (YYYY-MM-DD).
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// End date (YYYY-MM-DD), exclusive.
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Price field: close, adj-close, open. Defaults to close.
    #[arg(long)]
    price: Option<String>,

    /// Request file (TOML). Flags given on the command line take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a CSV export.
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Write an XLSX export.
    #[arg(long, default_value_t = false)]
    xlsx: bool,

    /// Directory for exports. Defaults to the current directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Number of rows shown in the preview.
    #[arg(long, default_value_t = 10)]
    preview_rows: usize,
}

fn main() -> Result<()> {
    // Logs go to stderr so the table on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => run_fetch(args),
        Commands::Indices => {
            run_indices();
            Ok(())
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let config = merge_config(&args)?;
    let formats = config.export.formats.clone();
    let out_dir = config
        .export
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let request = match config.into_request(today) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    info!(
        tickers = request.tickers.len(),
        indices = request.indices.len(),
        window = %request.window,
        price = %request.price_field,
        "fetching data"
    );

    let fetcher = YahooFetcher::new()?;
    let mut session = Session::new();
    let table = match session.run_cycle(&fetcher, &request, today) {
        Ok(table) => table,
        Err(e) => {
            error!(cause = ?e, "fetch failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    println!("Successfully fetched {} rows of data", table.len());
    print_preview(table, args.preview_rows);
    print_statistics(table);

    for format in formats {
        let path = write_export(table, format, &out_dir, today)
            .with_context(|| format!("writing {} export", format.extension()))?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

/// Request file first, then command-line flags on top.
fn merge_config(args: &FetchArgs) -> Result<RequestConfig> {
    let mut config = match &args.config {
        Some(path) => RequestConfig::from_file(path)?,
        None => RequestConfig::default(),
    };

    let mut tickers = args.tickers.clone();
    if let Some(path) = &args.tickers_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading tickers file {}", path.display()))?;
        tickers.extend(parse_ticker_list(&text));
    }
    if !tickers.is_empty() {
        config.tickers = tickers;
    }
    if !args.indices.is_empty() {
        config.indices = args.indices.clone();
    }

    if let Some(period) = &args.period {
        config.period = Some(period.parse::<Period>()?);
        config.start = None;
        config.end = None;
    }
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        config.start = Some(parse_date(start)?);
        config.end = Some(parse_date(end)?);
        config.period = None;
    }

    if let Some(price) = &args.price {
        config.price_field = price.parse::<PriceField>()?;
    }

    for (wanted, format) in [(args.csv, ExportFormat::Csv), (args.xlsx, ExportFormat::Xlsx)] {
        if wanted && !config.export.formats.contains(&format) {
            config.export.formats.push(format);
        }
    }
    if let Some(dir) = &args.out_dir {
        config.export.out_dir = Some(dir.clone());
    }

    Ok(config)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn run_indices() {
    println!("{:<32} {:<14}", "Index", "Symbol");
    println!("{}", "-".repeat(46));
    for (name, symbol) in NIFTY_INDICES {
        println!("{name:<32} {symbol:<14}");
    }
}

fn print_preview(table: &CanonicalTable, rows: usize) {
    let widths: Vec<usize> = table
        .instruments()
        .iter()
        .map(|name| name.len().max(12))
        .collect();

    println!();
    println!("=== Data Preview ===");
    let mut header = format!("{:<12}", "Date");
    for (name, width) in table.instruments().iter().zip(widths.iter().copied()) {
        header.push_str(&format!(" {name:>width$}"));
    }
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for row in table.head(rows) {
        let mut line = format!("{:<12}", format_date(row.date));
        for (value, width) in row.values.iter().zip(widths.iter().copied()) {
            let cell = value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into());
            line.push_str(&format!(" {cell:>width$}"));
        }
        println!("{line}");
    }
    if table.len() > rows {
        println!("Showing first {} of {} rows", rows, table.len());
    }
}

fn print_statistics(table: &CanonicalTable) {
    let Some(summary) = table.summary() else {
        return;
    };
    println!();
    println!("--- Quick Statistics ---");
    println!("Total Rows:     {}", summary.rows);
    println!("Date Range:     {} days", summary.span_days);
    println!("Start Date:     {}", format_date(summary.start));
    println!("End Date:       {}", format_date(summary.end));
    println!();
}

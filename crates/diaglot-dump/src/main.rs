use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{Level, warn};
use tracing_subscriber::EnvFilter;

use diaglot_core::catalog::Catalog;
use diaglot_core::provider::{DiagnosticProvider, FileProvider};
use diaglot_core::series::{DataPoint, TimeSeries};
use diaglot_core::store::TimeSeriesStore;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "diaglot-dump",
    about = "Derive chart series from a diagnostic batch and print them"
)]
struct Cli {
    /// Path to a .json or .json.zst diagnostic batch
    #[arg(env = "DIAGLOT_INPUT")]
    path: PathBuf,

    /// Series to print; group targets (disks_utils, disks_iops,
    /// replication_lags) expand to their family. Repeatable. Default: all.
    #[arg(short, long = "target", value_name = "NAME")]
    targets: Vec<String>,

    /// Output the selected series as a JSON array of {target, datapoints}
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut provider = FileProvider::new(&cli.path);
    let data = match provider.load() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.path.display());
            std::process::exit(1);
        }
    };

    let store = TimeSeriesStore::new();
    store.rebuild_from(&data);
    let catalog = store.catalog();

    let selected = select(&catalog, &cli.targets);

    if cli.json {
        print_json(&selected);
    } else {
        print_table(&catalog, &selected);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("diaglot_core={level},diaglot_dump={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves requested targets, or every series when none were given.
fn select<'a>(catalog: &'a Catalog, targets: &[String]) -> Vec<&'a TimeSeries> {
    if targets.is_empty() {
        return catalog.iter().collect();
    }
    let mut out = Vec::new();
    for target in targets {
        let found = catalog.expand(target);
        if found.is_empty() {
            warn!(name = %target, "unknown target");
        }
        out.extend(found);
    }
    out
}

// ── Formatting helpers ───────────────────────────────────────────────────────

fn fmt_ts_ms(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 100.0 || v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SeriesJson<'a> {
    target: &'a str,
    datapoints: &'a [DataPoint],
}

fn print_json(selected: &[&TimeSeries]) {
    let out: Vec<SeriesJson<'_>> = selected
        .iter()
        .map(|ts| SeriesJson {
            target: &ts.target,
            datapoints: &ts.datapoints,
        })
        .collect();
    match serde_json::to_string_pretty(&out) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}

fn print_table(catalog: &Catalog, selected: &[&TimeSeries]) {
    if let Some(info) = catalog.server_info() {
        println!("Server info: {info}");
    }
    println!(
        "Series: {}  Points: {}",
        catalog.len(),
        catalog.point_count()
    );
    println!();
    println!(
        "  {:<28} {:>6}  {:<19}  {:<19}  {:>10}",
        "Target", "Points", "First", "Last", "Last value"
    );
    println!("  {}", "─".repeat(90));
    for ts in selected {
        let first = ts.datapoints.first();
        let last = ts.last();
        println!(
            "  {:<28} {:>6}  {:<19}  {:<19}  {:>10}",
            ts.target,
            ts.len(),
            first.map(|p| fmt_ts_ms(p.timestamp_ms)).unwrap_or_else(|| "-".into()),
            last.map(|p| fmt_ts_ms(p.timestamp_ms)).unwrap_or_else(|| "-".into()),
            last.map(|p| fmt_value(p.value)).unwrap_or_else(|| "-".into()),
        );
    }
}

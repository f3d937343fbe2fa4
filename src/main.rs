use analytics::{AnalyticsEngine, IrParameters, IrSummary, RunReport, SkippedComparison, summarize};
use anyhow::{Context, Result, bail};
use api_client::{PriceSource, SnapshotSource, SnapshotStore, YahooClient, fetch_all};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, Provider};
use core_types::Bar;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use timeseries::{DEFAULT_INDEX, TimeSeriesTable, merge_all};

mod logging;

const TABLE_FILE: &str = "information_ratios.csv";
const SUMMARY_FILE: &str = "ir_summary.json";

/// The main entry point for the information-ratio pipeline.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (optional)
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)?;
    let _log_guard = logging::init(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Fetch => handle_fetch(&config).await,
        Commands::Analyze(args) => handle_analyze(&config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Rolling information ratios of instruments against a benchmark.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars for every configured symbol and save them as CSV snapshots.
    Fetch,
    /// Compute bare and risk-adjusted information ratios and write the results.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Where to read prices from. Overrides `data.provider`.
    #[arg(long, value_enum)]
    provider: Option<Provider>,
}

/// Contents of the JSON summary written next to the result table.
#[derive(Serialize)]
struct SummaryReport<'a> {
    benchmark: &'a str,
    window: usize,
    risk_free_rate: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    instruments: Vec<&'a str>,
    summaries: &'a [IrSummary],
    skipped: &'a [SkippedComparison],
}

// ==============================================================================
// Fetch Command Logic
// ==============================================================================

async fn handle_fetch(config: &Config) -> Result<()> {
    let client = YahooClient::new(&config.data.yahoo_base_url)?;
    let fetched = download(&client, config).await;
    if fetched.is_empty() {
        bail!("No symbol could be fetched");
    }

    let store = SnapshotStore::new(&config.data.snapshot_dir);
    let saved = save_snapshots(&store, &fetched);
    if saved == 0 {
        bail!("No snapshot could be written to {}", store.dir().display());
    }

    tracing::info!(
        saved,
        requested = config.analysis.symbols.len(),
        directory = %store.dir().display(),
        "Snapshots written."
    );
    Ok(())
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

async fn handle_analyze(config: &Config, args: AnalyzeArgs) -> Result<()> {
    let analysis = &config.analysis;
    let store = SnapshotStore::new(&config.data.snapshot_dir);
    let provider = args.provider.unwrap_or(config.data.provider);

    let fetched = match provider {
        Provider::Yahoo => {
            let client = YahooClient::new(&config.data.yahoo_base_url)?;
            let fetched = download(&client, config).await;
            // Keep what was downloaded so later runs can work offline.
            save_snapshots(&store, &fetched);
            fetched
        }
        Provider::Snapshot => download(&SnapshotSource::new(store), config).await,
    };
    if !fetched.iter().any(|(symbol, _)| *symbol == analysis.benchmark) {
        bail!("No prices available for the benchmark '{}'", analysis.benchmark);
    }

    let start = analysis.start_date;
    let end = analysis.end_date_or_today();
    let mut table = build_table(&fetched, start, end)?;
    tracing::info!(rows = table.len(), columns = table.width(), "Aligned price table built.");

    let engine = AnalyticsEngine::new(IrParameters {
        benchmark: analysis.benchmark.clone(),
        window: analysis.window,
        risk_free_rate: analysis.risk_free_rate,
    });
    let symbols: Vec<String> = fetched.iter().map(|(symbol, _)| symbol.clone()).collect();
    let report = engine.run(&mut table, &symbols);
    let summaries = summarize(&table, &report.computed);

    std::fs::create_dir_all(&config.data.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.data.output_dir.display())
    })?;

    let table_path = config.data.output_dir.join(TABLE_FILE);
    let file = create(&table_path)?;
    table
        .write_csv(file)
        .with_context(|| format!("Failed to write {}", table_path.display()))?;

    let summary_path = config.data.output_dir.join(SUMMARY_FILE);
    let summary = SummaryReport {
        benchmark: &analysis.benchmark,
        window: analysis.window,
        risk_free_rate: analysis.risk_free_rate,
        start_date: start,
        end_date: end,
        instruments: symbols.iter().map(String::as_str).collect(),
        summaries: &summaries,
        skipped: &report.skipped,
    };
    serde_json::to_writer_pretty(create(&summary_path)?, &summary)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    print_summary(&summaries, &report);
    tracing::info!(
        table = %table_path.display(),
        summary = %summary_path.display(),
        computed = report.computed.len(),
        skipped = report.skipped.len(),
        "Analysis complete."
    );
    Ok(())
}

/// Fetches every configured symbol with a progress bar, skipping failures.
async fn download<S: PriceSource>(source: &S, config: &Config) -> Vec<(String, Vec<Bar>)> {
    let analysis = &config.analysis;
    let progress_bar = ProgressBar::new(analysis.symbols.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }

    let fetched = fetch_all(
        source,
        &analysis.symbols,
        analysis.start_date,
        analysis.end_date_or_today(),
        |symbol| {
            progress_bar.set_message(format!("{symbol} done"));
            progress_bar.inc(1);
        },
    )
    .await;

    progress_bar.finish_with_message(format!(
        "{} of {} symbols",
        fetched.len(),
        analysis.symbols.len()
    ));
    fetched
}

/// Saves one snapshot per symbol and returns how many were written.
/// A symbol that cannot be saved is logged and skipped.
fn save_snapshots(store: &SnapshotStore, fetched: &[(String, Vec<Bar>)]) -> usize {
    fetched
        .iter()
        .filter(|(symbol, bars)| match store.save(symbol, bars) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "Failed to save snapshot, skipping.");
                false
            }
        })
        .count()
}

/// Aligns every instrument on a calendar of all days in `start..=end`.
fn build_table(
    fetched: &[(String, Vec<Bar>)],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TimeSeriesTable> {
    let mut tables = Vec::with_capacity(fetched.len() + 1);
    tables.push(TimeSeriesTable::calendar(start, end)?);
    for (symbol, bars) in fetched {
        let table = TimeSeriesTable::from_bars(symbol, bars)
            .with_context(|| format!("Failed to tabulate bars of '{symbol}'"))?;
        tables.push(table);
    }

    Ok(merge_all(&tables, DEFAULT_INDEX, DEFAULT_INDEX)?)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

fn print_summary(summaries: &[IrSummary], report: &RunReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Column", "Investment", "Variant", "Obs", "Mean", "Std", "Min", "Max", "Last",
    ]);
    for summary in summaries {
        table.add_row(vec![
            summary.column.clone(),
            summary.investment.clone(),
            summary.variant.to_string(),
            summary.observations.to_string(),
            format_ratio(summary.mean),
            format_ratio(summary.std_dev),
            format_ratio(summary.min),
            format_ratio(summary.max),
            format_ratio(summary.last),
        ]);
    }
    println!("{table}");

    for skipped in &report.skipped {
        println!("Skipped {} ({}): {}", skipped.investment, skipped.variant, skipped.reason);
    }
}

//! QuantLab CLI: single runs, batch studies and the strategy catalogue.
//!
//! Commands:
//! - `run`: backtest one strategy (or all bundled ones) on a bar file or synthetic bars
//! - `batch`: run a TOML-configured symbol × period × strategy study
//! - `strategies`: list bundled strategies with their default parameters

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quantlab_core::data::{read_bars_csv, read_bars_parquet, CsvDirectoryProvider, DataProvider};
use quantlab_core::domain::BarSeries;
use quantlab_core::strategies::StrategySpec;
use quantlab_runner::report::{
    bottom_n, comparison_table, consistency, consistency_table, period_summary,
    period_summary_table, results_table, return_matrix, top_n, write_records_csv,
    write_result_json,
};
use quantlab_runner::{
    load_series, run_batch, run_single, LoadOptions, PeriodSplit, RunConfig,
    DEFAULT_INITIAL_CAPITAL,
};

#[derive(Parser)]
#[command(
    name = "quantlab",
    about = "QuantLab CLI: long-only signal backtesting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest a strategy on one symbol.
    Run {
        /// Bar file (.csv or .parquet) with Date/Open/High/Low/Close[/Volume] columns.
        #[arg(long, conflicts_with = "synthetic")]
        data: Option<PathBuf>,

        /// Generate seeded synthetic bars instead of reading a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Symbol label (and synthetic seed). Defaults to the file stem or SPY.
        #[arg(long)]
        symbol: Option<String>,

        /// Start date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: Option<String>,

        /// Strategy type, e.g. sma_crossover, rsi, dca (see `quantlab strategies`).
        #[arg(long, default_value = "sma_crossover")]
        strategy: String,

        /// Run every bundled strategy and print a comparison table.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Starting capital.
        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        /// Write the full result (metrics and per-bar frame) as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Run a batch study from a TOML config file.
    Batch {
        /// Path to the TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Write one CSV row per symbol/period/strategy.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Rows in the best/worst rankings (yearly split only).
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// List bundled strategies and their default parameters.
    Strategies,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            synthetic,
            symbol,
            start,
            end,
            strategy,
            all,
            capital,
            json,
        } => run_cmd(RunArgs {
            data,
            synthetic,
            symbol,
            start: parse_date(start.as_deref())?,
            end: parse_date(end.as_deref())?,
            strategy,
            all,
            capital,
            json,
        }),
        Commands::Batch { config, csv, top } => batch_cmd(&config, csv.as_deref(), top),
        Commands::Strategies => strategies_cmd(),
    }
}

struct RunArgs {
    data: Option<PathBuf>,
    synthetic: bool,
    symbol: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    strategy: String,
    all: bool,
    capital: f64,
    json: Option<PathBuf>,
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
        })
        .transpose()
}

fn run_cmd(args: RunArgs) -> Result<()> {
    if let (Some(start), Some(end)) = (args.start, args.end) {
        if start > end {
            bail!("--start {start} is after --end {end}");
        }
    }

    let series = match (&args.data, args.synthetic) {
        (Some(path), _) => load_file(path, args.symbol.as_deref(), args.start, args.end)?,
        (None, true) => {
            let symbol = args.symbol.as_deref().unwrap_or("SPY");
            let opts = LoadOptions {
                start: args.start,
                end: args.end,
                synthetic: true,
            };
            let loaded = load_series(symbol, None, &opts)?;
            println!("Using synthetic bars for {symbol} (not market data)");
            loaded.series
        }
        (None, false) => bail!("one of --data or --synthetic is required"),
    };
    println!(
        "Loaded {} bars: {} to {}",
        series.len(),
        series.first().timestamp.date(),
        series.last().timestamp.date()
    );

    if args.all {
        let mut results = Vec::new();
        for spec in StrategySpec::all_defaults() {
            results.push(run_single(&series, &spec, args.capital)?);
        }
        println!();
        print!("{}", results_table(&results));
        return Ok(());
    }

    let Some(spec) = StrategySpec::from_kind(&args.strategy) else {
        bail!(
            "unknown strategy '{}'. Run `quantlab strategies` for the list",
            args.strategy
        );
    };
    let result = run_single(&series, &spec, args.capital)?;
    println!("{}", result.summary_report());

    if let Some(path) = &args.json {
        write_result_json(path, &result)?;
        println!("Result saved to: {}", path.display());
    }
    Ok(())
}

fn load_file(
    path: &Path,
    symbol: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<BarSeries> {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let symbol = symbol.or(stem);
    let series = match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => read_bars_parquet(path, symbol)?,
        _ => read_bars_csv(path, symbol)?,
    };
    if start.is_none() && end.is_none() {
        return Ok(series);
    }

    let from = start
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .context("invalid start date")?;
    let to = end
        .unwrap_or(NaiveDate::MAX)
        .and_hms_opt(23, 59, 59)
        .context("invalid end date")?;
    series
        .slice_between(from, to)
        .with_context(|| format!("no bars in {} within the requested range", path.display()))
}

fn batch_cmd(config_path: &Path, csv: Option<&Path>, top: usize) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    info!(run_id = %config.run_id()?, "loaded config");

    let provider = config.data.dir.as_ref().map(CsvDirectoryProvider::new);
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    let outcome = run_batch(&config, provider_ref)?;
    for failure in &outcome.failures {
        eprintln!(
            "Failed: {} {} {}: {}",
            failure.symbol,
            failure.period.as_deref().unwrap_or("*"),
            failure.strategy.as_deref().unwrap_or("*"),
            failure.error
        );
    }
    if outcome.is_empty() {
        bail!("batch produced no results");
    }

    let rule = "=".repeat(96);
    if outcome.has_synthetic() {
        println!("NOTE: some results were computed on synthetic bars");
    }

    if config.batch.split == PeriodSplit::Yearly {
        for symbol in &config.data.symbols {
            if outcome.records.iter().any(|r| &r.symbol == symbol) {
                println!("\n{rule}\nTOTAL RETURNS (%): {symbol}\n{rule}");
                print!("{}", return_matrix(&outcome.records, symbol));
            }
        }
        println!("\n{rule}\nTOP {top} COMBINATIONS (by Total Return)\n{rule}");
        print!("{}", comparison_table(&top_n(&outcome.records, top)));
        println!("\n{rule}\nBOTTOM {top} COMBINATIONS (by Total Return)\n{rule}");
        print!("{}", comparison_table(&bottom_n(&outcome.records, top)));
        println!("\n{rule}\nYEARLY SUMMARY\n{rule}");
        print!("{}", period_summary_table(&period_summary(&outcome.records)));
    } else {
        println!("\n{rule}\nSTRATEGY COMPARISON\n{rule}");
        print!("{}", comparison_table(&outcome.records));
    }

    println!("\n{rule}\nSTRATEGY CONSISTENCY\n{rule}");
    print!("{}", consistency_table(&consistency(&outcome.records)));

    if let Some(path) = csv {
        write_records_csv(path, &outcome.records)?;
        println!("\nRecords saved to: {}", path.display());
    }
    Ok(())
}

fn strategies_cmd() -> Result<()> {
    println!("{:<16} {:<40} Defaults", "Type", "Label");
    println!("{}", "-".repeat(96));
    for spec in StrategySpec::all_defaults() {
        let defaults = serde_json::to_string(&spec)?;
        println!("{:<16} {:<40} {defaults}", spec.kind(), spec.label());
    }
    Ok(())
}

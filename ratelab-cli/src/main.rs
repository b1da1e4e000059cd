//! RateLab CLI — rate recommendations from config and market files.
//!
//! Commands:
//! - `recommend` — load config and CSV inputs, compute, print and optionally export
//! - `validate` — check a TOML config and print its version

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ratelab_core::{BatchOutcome, RmsConfig};
use ratelab_runner::{
    assemble_signals, export_csv, export_json, load_availability, load_config, load_events,
    load_market, BatchRunner, BatchSummary,
};

#[derive(Parser)]
#[command(name = "ratelab", about = "RateLab CLI — hotel rate recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute up / down / hold recommendations for every date in a market file.
    Recommend {
        /// Path to the RMS TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Market CSV: date,current_rate,competitor_median_rate,demand_index,rack_rate,pickup_velocity.
        #[arg(long)]
        market: PathBuf,

        /// Availability CSV: date,room_type,available (summed per date).
        #[arg(long)]
        availability: Option<PathBuf>,

        /// Events CSV: name,start,end,impact.
        #[arg(long)]
        events: Option<PathBuf>,

        /// Reference date for the last-minute window (YYYY-MM-DD). Defaults to the
        /// config's `calendar.as_of`, then today.
        #[arg(long)]
        as_of: Option<String>,

        /// Evaluate dates on a single thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Write the outcome to this file; the extension picks the format (.json or .csv).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a TOML config and print its version.
    Validate {
        /// Path to the RMS TOML config.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            config,
            market,
            availability,
            events,
            as_of,
            sequential,
            output,
        } => run_recommend(
            &config,
            &market,
            availability.as_deref(),
            events.as_deref(),
            as_of.as_deref(),
            sequential,
            output.as_deref(),
        ),
        Commands::Validate { config } => run_validate(&config),
    }
}

fn run_recommend(
    config_path: &Path,
    market_path: &Path,
    availability_path: Option<&Path>,
    events_path: Option<&Path>,
    as_of: Option<&str>,
    sequential: bool,
    output: Option<&Path>,
) -> Result<()> {
    let format = output.map(output_format).transpose()?;

    let config = load_config(config_path)?;
    let as_of = match as_of {
        Some(s) => Some(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of '{s}', expected YYYY-MM-DD"))?,
        ),
        None => config.calendar().as_of,
    };
    let config = config.with_as_of(as_of.unwrap_or_else(|| chrono::Local::now().date_naive()))?;

    let market = load_market(market_path)?;
    let availability = match availability_path {
        Some(path) => load_availability(path)?,
        None => BTreeMap::new(),
    };
    let events = match events_path {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };
    let signals = assemble_signals(&market, &availability, &events)?;
    tracing::debug!(dates = signals.len(), events = events.len(), "signals assembled");

    let outcome = BatchRunner::new()
        .with_parallelism(!sequential)
        .run(&signals, &config);

    print_table(&outcome);
    print_summary(&BatchSummary::from_outcome(&outcome));

    if let (Some(path), Some(format)) = (output, format) {
        match format {
            OutputFormat::Json => export_json(&outcome, path)?,
            OutputFormat::Csv => export_csv(&outcome, path)?,
        }
        println!("Outcome saved to: {}", path.display());
    }

    Ok(())
}

fn run_validate(config_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read '{}'", config_path.display()))?;
    let config = RmsConfig::from_toml(&content)?.validate()?;
    println!("Config OK");
    println!("Version:        {}", config.version());
    println!("Strategy:       {}", config.strategy());
    println!(
        "Price bounds:   {:.2} – {:.2} (step {:.2})",
        config.config().min_price,
        config.config().max_price,
        config.config().price_step
    );
    println!(
        "ADR guardrail:  {:.2} – {:.2}",
        config.config().min_adr,
        config.config().max_adr
    );
    match config.capacity() {
        Some(capacity) => println!("Capacity:       {capacity} rooms"),
        None => println!("Capacity:       not configured"),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Json,
    Csv,
}

fn output_format(path: &Path) -> Result<OutputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(OutputFormat::Json),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(OutputFormat::Csv),
        _ => bail!(
            "unsupported output '{}': use a .json or .csv extension",
            path.display()
        ),
    }
}

fn print_table(outcome: &BatchOutcome) {
    println!(
        "{:<10}  {:<5}  {:>9}  {:>9}  {:>7}  {:<4}  {:<18}  {:>7}",
        "date", "act", "current", "suggested", "change", "auto", "rule", "P"
    );
    for r in &outcome.recommendations {
        println!(
            "{:<10}  {:<5}  {:>9.2}  {:>9.2}  {:>6.1}%  {:<4}  {:<18}  {:>7.3}",
            r.date.to_string(),
            r.action.as_str(),
            r.current_rate,
            r.suggested_price,
            r.magnitude_pct,
            if r.auto_approvable { "yes" } else { "no" },
            r.rationale.rule.as_str(),
            r.rationale.pressure.net,
        );
        for w in &r.rationale.warnings {
            println!("            ! {}", w.as_str());
        }
    }
    for d in &outcome.indeterminate {
        println!(
            "{:<10}  --     data unavailable ({})",
            d.date.to_string(),
            d.reason.as_str()
        );
    }
}

fn print_summary(s: &BatchSummary) {
    println!();
    println!("=== Recommendation Summary ===");
    println!("Config:         {}", &s.config_version[..12.min(s.config_version.len())]);
    println!("Dates:          {}", s.total_dates);
    println!("Up / Down / Hold: {} / {} / {}", s.up, s.down, s.hold);
    println!("Auto-approve:   {} ({} need review)", s.auto_approvable, s.needs_review);
    println!("Indeterminate:  {}", s.indeterminate);
    if let Some(m) = s.mean_magnitude_pct {
        println!("Mean change:    {m:+.2}%");
    }
    match s.average_suggested {
        Some(avg) => println!("Average price:  {avg:.2} ({:?})", s.adr_status),
        None => println!("Average price:  n/a"),
    }
}

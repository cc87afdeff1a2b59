//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::cache_adapter::{CachedDataPort, FileCache};
use crate::adapters::chart_svg::SvgChartAdapter;
use crate::adapters::console_table::render_metrics_table;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::comparison::{parse_leverages, run_comparison, Comparison, ComparisonConfig};
use crate::domain::config_validation::validate_config;
use crate::domain::error::LevsimError;
use crate::domain::leverage::ExpenseMode;
use crate::domain::period::Period;
use crate::ports::cache_port::PriceCache;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "levsim",
    about = "Simulate daily-leveraged price series and compare their performance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate leverage levels for a ticker and print the metrics table
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: String,
        /// Named period; only `max` is supported. Defaults to `max`
        #[arg(short, long, conflicts_with_all = ["start", "end"])]
        period: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Comma-separated leverage levels, overriding the config
        #[arg(short, long)]
        leverages: Option<String>,
        /// Write an SVG chart to this path, overriding the config
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Log-scale chart axis, overriding `[report] log_scale`
        #[arg(long, conflicts_with = "no_log_scale")]
        log_scale: bool,
        /// Linear chart axis, overriding `[report] log_scale`
        #[arg(long)]
        no_log_scale: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete every cached price table
    ClearCache {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run {
            config,
            ticker,
            period,
            start,
            end,
            leverages,
            chart,
            log_scale,
            no_log_scale,
        } => run_simulation(&RunArgs {
            config,
            ticker,
            period,
            start,
            end,
            leverages,
            chart,
            log_scale: match (log_scale, no_log_scale) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }),
        Command::Validate { config } => run_validate(&config),
        Command::ClearCache { config } => run_clear_cache(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, LevsimError> {
    FileConfigAdapter::from_file(path).map_err(|e| LevsimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub struct RunArgs {
    pub config: PathBuf,
    pub ticker: String,
    pub period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub leverages: Option<String>,
    pub chart: Option<PathBuf>,
    /// `None` defers to `[report] log_scale`.
    pub log_scale: Option<bool>,
}

fn run_simulation(args: &RunArgs) -> Result<(), LevsimError> {
    info!("Loading config from {}", args.config.display());
    let config = load_config(&args.config)?;
    validate_config(&config)?;

    let mut cmp_config = build_comparison_config(&config)?;
    if let Some(list) = &args.leverages {
        cmp_config.leverages = parse_leverages(list)?;
    }
    let period = resolve_period(
        args.period.as_deref(),
        args.start.as_deref(),
        args.end.as_deref(),
    )?;
    let data_port = build_data_port(&config);

    let comparison = run_pipeline(data_port.as_ref(), &args.ticker, &period, &cmp_config)?;
    println!("{}", render_metrics_table(&comparison.table));

    let chart_path = args
        .chart
        .clone()
        .or_else(|| config.get_string("report", "chart_path").map(PathBuf::from));
    if let Some(path) = chart_path {
        write_chart(&comparison, &path, resolve_log_scale(args.log_scale, &config))?;
    }
    Ok(())
}

pub fn build_comparison_config(
    config: &dyn ConfigPort,
) -> Result<ComparisonConfig, LevsimError> {
    let defaults = ComparisonConfig::default();

    let leverages = match config.get_string("simulation", "leverages") {
        Some(s) => parse_leverages(&s)?,
        None => defaults.leverages,
    };
    let expense_mode = match config.get_string("simulation", "expense_mode") {
        Some(s) => s
            .parse::<ExpenseMode>()
            .map_err(|reason| LevsimError::ConfigInvalid {
                section: "simulation".into(),
                key: "expense_mode".into(),
                reason,
            })?,
        None => defaults.expense_mode,
    };

    Ok(ComparisonConfig {
        leverages,
        annual_expense_ratio: config.get_double(
            "simulation",
            "annual_expense_ratio",
            defaults.annual_expense_ratio,
        ),
        expense_mode,
    })
}

/// An explicit CLI choice wins; otherwise `[report] log_scale`, default off.
pub fn resolve_log_scale(flag: Option<bool>, config: &dyn ConfigPort) -> bool {
    flag.unwrap_or_else(|| config.get_bool("report", "log_scale", false))
}

/// `named` defaults to `max`. A range may only be combined with `max`.
pub fn resolve_period(
    named: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Period, LevsimError> {
    let parse = |s: &str, field: &str| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LevsimError::invalid(format!("invalid {field} date '{s}', expected YYYY-MM-DD"))
        })
    };

    let named = named.map(|n| n.trim().to_lowercase());
    if let Some(other) = named.as_deref().filter(|n| *n != "max") {
        return Err(if start.is_some() || end.is_some() {
            LevsimError::invalid(format!(
                "period '{other}' cannot be combined with --start/--end"
            ))
        } else {
            LevsimError::invalid(format!(
                "unsupported period '{other}' (use max or --start/--end)"
            ))
        });
    }

    match (start, end) {
        (Some(s), Some(e)) => Period::range(parse(s, "start")?, parse(e, "end")?),
        (None, None) => Ok(Period::Max),
        _ => Err(LevsimError::invalid("--start and --end must be given together")),
    }
}

/// CSV directory provider, behind the disk cache when `[data] cache_dir` is set.
pub fn build_data_port(config: &dyn ConfigPort) -> Box<dyn DataPort> {
    let data_dir = PathBuf::from(config.get_string("data", "data_dir").unwrap_or_default());
    let csv = CsvAdapter::new(data_dir);

    match config
        .get_string("data", "cache_dir")
        .filter(|s| !s.trim().is_empty())
    {
        Some(dir) => Box::new(CachedDataPort::new(csv, FileCache::new(PathBuf::from(dir)))),
        None => Box::new(csv),
    }
}

pub fn run_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    period: &Period,
    cmp_config: &ComparisonConfig,
) -> Result<Comparison, LevsimError> {
    let ticker = ticker.trim().to_uppercase();
    let series = data_port.fetch_prices(&ticker, period)?;
    info!(
        "Loaded {} closes for {} ({} to {})",
        series.len(),
        ticker,
        series.first_date(),
        series.last_date()
    );

    let specs = cmp_config.specs()?;
    info!(
        "Simulating {} leverage levels (annual fee {}, expense mode {})",
        specs.len(),
        cmp_config.annual_expense_ratio,
        cmp_config.expense_mode
    );
    run_comparison(&series, &specs)
}

pub fn write_chart(
    comparison: &Comparison,
    path: &PathBuf,
    log_scale: bool,
) -> Result<(), LevsimError> {
    let adapter = SvgChartAdapter { log_scale };
    adapter.write(
        &comparison.table,
        &comparison.chart_series(),
        &path.to_string_lossy(),
    )?;
    info!("Chart written to: {}", path.display());
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), LevsimError> {
    info!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let cmp_config = build_comparison_config(&config)?;

    let labels: Vec<String> = cmp_config.specs()?.iter().map(|s| s.label()).collect();
    println!("leverages:     {}", labels.join(", "));
    println!("annual fee:    {}", cmp_config.annual_expense_ratio);
    println!("expense mode:  {}", cmp_config.expense_mode);
    println!("Configuration is valid.");
    Ok(())
}

fn run_clear_cache(config_path: &PathBuf) -> Result<(), LevsimError> {
    let config = load_config(config_path)?;
    let Some(dir) = config
        .get_string("data", "cache_dir")
        .filter(|s| !s.trim().is_empty())
    else {
        return Err(LevsimError::ConfigMissing {
            section: "data".into(),
            key: "cache_dir".into(),
        });
    };

    let removed = FileCache::new(PathBuf::from(&dir)).clear()?;
    info!("Removed {} cached price tables from {}", removed, dir);
    Ok(())
}

//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{self, AnalysisSummary};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::CrosstraderError;
use crate::domain::series::AnalyzedSeries;
use crate::domain::simulator::{OverdraftPolicy, SimulationConfig};
use crate::domain::symbols::SymbolDirectory;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crosstrader", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a crossover analysis
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Search the symbol directory
    Search {
        #[arg(short, long)]
        query: String,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Show the available data range for symbol(s)
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            output,
            dry_run,
        } => run_analyze(&config, symbol.as_deref(), output.as_ref(), dry_run),
        Command::Search {
            query,
            config,
            limit,
        } => run_search(&query, &config, limit),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), &config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CrosstraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Analysis parameters resolved from configuration plus CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub initial_investment: f64,
    pub overdraft: OverdraftPolicy,
}

pub fn build_analysis_params(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<AnalysisParams, CrosstraderError> {
    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => adapter.get_string("analysis", "symbol").ok_or_else(|| {
            CrosstraderError::ConfigMissing {
                section: "analysis".into(),
                key: "symbol".into(),
            }
        })?,
    };

    let start_date = read_date(adapter, "start_date")?;
    let end_date = read_date(adapter, "end_date")?;

    let overdraft = if adapter.get_bool("analysis", "allow_overdraft", true) {
        OverdraftPolicy::Permit
    } else {
        OverdraftPolicy::CapAtCash
    };

    Ok(AnalysisParams {
        symbol,
        start_date,
        end_date,
        short_window: usize::try_from(adapter.get_int("analysis", "short_window", 20))
            .unwrap_or(0),
        long_window: usize::try_from(adapter.get_int("analysis", "long_window", 100))
            .unwrap_or(0),
        initial_investment: adapter.get_double("analysis", "initial_investment", 10_000.0),
        overdraft,
    })
}

fn read_date(adapter: &dyn ConfigPort, key: &str) -> Result<NaiveDate, CrosstraderError> {
    let raw = adapter.get_string("analysis", key).ok_or_else(|| {
        CrosstraderError::ConfigMissing {
            section: "analysis".into(),
            key: key.into(),
        }
    })?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| CrosstraderError::ConfigInvalid {
        section: "analysis".into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

pub fn run_analyze(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate
    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Resolve parameters
    let params = match build_analysis_params(&adapter, symbol_override) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if dry_run {
        eprintln!("\nResolved analysis parameters:");
        eprintln!("  symbol:             {}", params.symbol);
        eprintln!(
            "  date range:         {} to {}",
            params.start_date, params.end_date
        );
        eprintln!(
            "  windows:            short={}, long={}",
            params.short_window, params.long_window
        );
        eprintln!("  initial investment: {:.2}", params.initial_investment);
        eprintln!("  overdraft policy:   {:?}", params.overdraft);
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 4: Optional symbol directory for display names
    let display_name = match adapter.get_string("data", "symbols_file") {
        Some(path) => match SymbolDirectory::from_json_file(&path) {
            Ok(directory) => directory.name_of(&params.symbol).map(str::to_string),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
        None => None,
    };

    // Stage 5: Fetch price bars
    let csv_dir = match adapter.get_string("data", "csv_dir") {
        Some(d) => d,
        None => {
            let err = CrosstraderError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let data_port = CsvAdapter::new(PathBuf::from(csv_dir));

    let bars = match data_port.fetch_ohlcv(&params.symbol, params.start_date, params.end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if bars.is_empty() {
        let err = CrosstraderError::NoData {
            symbol: params.symbol.clone(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }
    eprintln!("Fetched {} bars for {}", bars.len(), params.symbol);

    // Stage 6: Generate signals and simulate the portfolio
    let sim_config = SimulationConfig {
        initial_investment: params.initial_investment,
        overdraft: params.overdraft,
    };
    let series = match analysis::analyze_with(
        bars,
        params.short_window,
        params.long_window,
        &sim_config,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 7: Console summary
    let summary = AnalysisSummary::compute(&series, params.initial_investment);
    print_summary(&params, display_name.as_deref(), &series, &summary);

    // Stage 8: Write the CSV report
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report.csv"));
    let report = CsvReportAdapter::new();
    match report.write(&series, &output.to_string_lossy()) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_summary(
    params: &AnalysisParams,
    display_name: Option<&str>,
    series: &AnalyzedSeries,
    summary: &AnalysisSummary,
) {
    match display_name {
        Some(name) => eprintln!("\n=== {} ({}) ===", name, params.symbol),
        None => eprintln!("\n=== {} ===", params.symbol),
    }
    eprintln!(
        "Windows: short={}, long={}",
        params.short_window, params.long_window
    );

    eprintln!("\n=== Trade Signals ===");
    let trades = series.trade_log();
    if trades.is_empty() {
        eprintln!("  (no trades)");
    } else {
        for trade in &trades {
            eprintln!(
                "  {}  {:<4}  {:>6} @ {:.2}",
                trade.date, trade.side, trade.size, trade.price
            );
        }
    }

    eprintln!("\n=== Investment Return ===");
    eprintln!("Initial investment: ${:.2}", summary.initial_investment);
    eprintln!("Final value:        ${:.2}", summary.final_value);
    eprintln!("Total return:       {:.2}%", summary.total_return_pct);
}

pub fn run_search(query: &str, config_path: &PathBuf, limit: usize) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols_file = match adapter.get_string("data", "symbols_file") {
        Some(p) => p,
        None => {
            let err = CrosstraderError::ConfigMissing {
                section: "data".into(),
                key: "symbols_file".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let directory = match SymbolDirectory::from_json_file(&symbols_file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let matches = directory.search(query, limit);
    if matches.is_empty() {
        eprintln!("No matches for {:?}", query);
    } else {
        for entry in matches {
            println!("{}\t{}", entry.code, entry.name);
        }
    }
    ExitCode::SUCCESS
}

pub fn run_info(symbol: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let csv_dir = match adapter.get_string("data", "csv_dir") {
        Some(d) => d,
        None => {
            let err = CrosstraderError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let data_port = CsvAdapter::new(PathBuf::from(csv_dir));

    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => match data_port.list_symbols() {
            Ok(list) => list,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
        return ExitCode::SUCCESS;
    }

    for sym in &symbols {
        match data_port.get_data_range(sym) {
            Ok(Some((first, last, bars))) => {
                println!("{}: {} to {} ({} bars)", sym, first, last, bars);
            }
            Ok(None) => println!("{}: no data", sym),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

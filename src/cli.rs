//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::scenario_text::load_scenario;
use crate::adapters::submission_text::TextSubmission;
use crate::domain::config_validation::{
    EVALUATION_SECTION, LOG_LEVELS, LOGGING_SECTION, parse_max_trades_per_day,
    validate_evaluation_config, validate_logging_config,
};
use crate::domain::error::TradescoreError;
use crate::domain::replay::{EvaluationConfig, EvaluationReport, Variant, evaluate};
use crate::domain::scenario::Scenario;
use crate::logging::init_logger;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "tradescore", about = "Trading submission validator and scorer")]
pub struct Cli {
    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a submission against a scenario and print its score
    Evaluate {
        scenario: PathBuf,
        submission: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Rule preset: base or strict
        #[arg(long)]
        variant: Option<Variant>,
        #[arg(long)]
        max_trades_per_day: Option<usize>,
        /// Write the executed trades to this CSV file
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Summarise a scenario file
    Inspect { scenario: PathBuf },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationOverrides {
    pub variant: Option<Variant>,
    pub max_trades_per_day: Option<usize>,
}

pub fn run(cli: Cli) -> ExitCode {
    let log_level = cli.log_level.as_deref();
    match cli.command {
        Command::Evaluate {
            scenario,
            submission,
            config,
            variant,
            max_trades_per_day,
            ledger,
        } => run_evaluate(
            &scenario,
            &submission,
            config.as_ref(),
            EvaluationOverrides {
                variant,
                max_trades_per_day,
            },
            ledger.as_deref(),
            log_level,
        ),
        Command::Inspect { scenario } => run_inspect(&scenario, log_level),
        Command::Validate { config } => run_validate(&config, log_level),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradescoreError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Picks the log level: command line first, then `[logging] level`, then
/// [`DEFAULT_LOG_LEVEL`].
pub fn resolve_log_level(
    cli_level: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, TradescoreError> {
    validate_logging_config(config)?;
    let level = cli_level
        .map(str::to_string)
        .or_else(|| config.get_string(LOGGING_SECTION, "level"))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        .trim()
        .to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(TradescoreError::ConfigInvalid {
            section: LOGGING_SECTION.to_string(),
            key: "level".to_string(),
            reason: format!("level must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
    Ok(level)
}

/// Builds the effective rules: the variant preset, refined by explicit
/// `[evaluation]` keys, then by command-line overrides.
pub fn build_evaluation_config(
    adapter: &dyn ConfigPort,
    overrides: &EvaluationOverrides,
) -> Result<EvaluationConfig, TradescoreError> {
    validate_evaluation_config(adapter)?;

    let variant = match overrides.variant {
        Some(v) => v,
        None => match adapter.get_string(EVALUATION_SECTION, "variant") {
            Some(s) => s
                .parse::<Variant>()
                .map_err(|e| TradescoreError::ConfigInvalid {
                    section: EVALUATION_SECTION.to_string(),
                    key: "variant".to_string(),
                    reason: e.to_string(),
                })?,
            None => Variant::Base,
        },
    };

    let preset = EvaluationConfig::for_variant(variant);
    let mut config = EvaluationConfig {
        include_portfolio_valuation: adapter.get_bool(
            EVALUATION_SECTION,
            "include_portfolio_valuation",
            preset.include_portfolio_valuation,
        ),
        reject_duplicate_security_per_day: adapter.get_bool(
            EVALUATION_SECTION,
            "reject_duplicate_security_per_day",
            preset.reject_duplicate_security_per_day,
        ),
        max_trades_per_day: parse_max_trades_per_day(adapter)?
            .unwrap_or(preset.max_trades_per_day),
    };

    if let Some(limit) = overrides.max_trades_per_day {
        if limit == 0 {
            return Err(TradescoreError::ConfigInvalid {
                section: EVALUATION_SECTION.to_string(),
                key: "max_trades_per_day".to_string(),
                reason: "max_trades_per_day must be a positive integer or none".to_string(),
            });
        }
        config.max_trades_per_day = Some(limit);
    }

    Ok(config)
}

/// Loads both inputs and replays the submission.
pub fn evaluate_files(
    scenario_path: &Path,
    submission_path: &Path,
    config: EvaluationConfig,
) -> Result<EvaluationReport, TradescoreError> {
    let scenario = load_scenario(scenario_path)?;
    let submission = TextSubmission::load(submission_path)?;
    info!(?config, "evaluating submission");
    Ok(evaluate(&scenario, &mut submission.reader(), config))
}

fn run_evaluate(
    scenario_path: &Path,
    submission_path: &Path,
    config_path: Option<&PathBuf>,
    overrides: EvaluationOverrides,
    ledger_path: Option<&Path>,
    log_level: Option<&str>,
) -> ExitCode {
    let adapter = match config_path {
        Some(path) => match load_config(path) {
            Ok(a) => a,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };

    match resolve_log_level(log_level, &adapter) {
        Ok(level) => init_logger(&level),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let config = match build_evaluation_config(&adapter, &overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = match evaluate_files(scenario_path, submission_path, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}", report.summary_line());

    if let Some(path) = ledger_path {
        if let Err(e) = CsvLedgerAdapter.write(&report, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        info!(path = %path.display(), trades = report.trades_executed(), "ledger written");
    }

    match report.outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => (&TradescoreError::Evaluation(e)).into(),
    }
}

/// One-screen summary of a scenario.
pub fn describe_scenario(scenario: &Scenario) -> String {
    let mut out = format!(
        "Securities: {}  Days: {}  Start capital: {}\n",
        scenario.security_count(),
        scenario.num_days(),
        scenario.start_capital()
    );
    let width = scenario
        .securities()
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    out.push_str(&format!(
        "{:<width$}  {:>10}  {:>12}  {:>12}\n",
        "NAME", "STOCK", "FIRST", "FINAL"
    ));
    for security in scenario.securities() {
        let first = security.prices.first().map(|p| p.to_string()).unwrap_or_default();
        let last = security.final_price().map(|p| p.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{:<width$}  {:>10}  {:>12}  {:>12}\n",
            security.name, security.stock_available, first, last
        ));
    }
    out
}

fn run_inspect(scenario_path: &Path, log_level: Option<&str>) -> ExitCode {
    match resolve_log_level(log_level, &FileConfigAdapter::empty()) {
        Ok(level) => init_logger(&level),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    match load_scenario(scenario_path) {
        Ok(scenario) => {
            print!("{}", describe_scenario(&scenario));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf, log_level: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let level = match resolve_log_level(log_level, &adapter) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logger(&level);

    let config = match build_evaluation_config(&adapter, &EvaluationOverrides::default()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Config validated successfully");
    println!(
        "include_portfolio_valuation = {}",
        config.include_portfolio_valuation
    );
    println!(
        "reject_duplicate_security_per_day = {}",
        config.reject_duplicate_security_per_day
    );
    match config.max_trades_per_day {
        Some(n) => println!("max_trades_per_day = {n}"),
        None => println!("max_trades_per_day = none"),
    }
    println!("log_level = {level}");
    ExitCode::SUCCESS
}

//! Run configuration management
//!
//! Handles loading the run configuration from a TOML file, environment
//! variables and CLI arguments.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`RISK_SIM_*`)
//! 3. Config file
//! 4. Default values
//!
//! Dates in the file are quoted `YYYY-MM-DD` strings:
//!
//! ```toml
//! tickers = ["SPY", "AGG"]
//! weights = [0.6, 0.4]
//! benchmark = "SPY"
//! model = "jump_diffusion"
//!
//! [jump_params]
//! intensity = 0.1
//! mean_log_jump = -0.05
//! std_log_jump = 0.1
//!
//! [[stress_scenarios]]
//! name = "2020 COVID Crash"
//! start = "2020-02-19"
//! end = "2020-03-23"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use sim_core::SimResult;
use sim_engine::mc::{PathStorage, PricePolicy, SimulationConfig, DEFAULT_PRICE_FLOOR, MAX_SIMULATIONS};
use sim_models::calibration::{JumpParams, ReturnCalibrator, DEFAULT_PERIODS_PER_YEAR, MIN_WINDOW};
use sim_models::models::ModelKind;
use sim_risk::metrics::{DrawdownMode, RiskCalculator};
use sim_risk::portfolio::{AggregationBasis, PortfolioWeights};
use sim_risk::stress::{PresetScenario, StressReplayer, StressScenario};

use crate::error::{CliError, Result};

/// Environment variable overriding the seed.
pub const ENV_SEED: &str = "RISK_SIM_SEED";
/// Environment variable overriding the simulation count.
pub const ENV_N_SIMULATIONS: &str = "RISK_SIM_N_SIMULATIONS";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "RISK_SIM_LOG_LEVEL";
/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "RISK_SIM_DATA_DIR";

/// Log levels supported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-run parameters
    Trace,
    /// Run parameters
    Debug,
    /// Component boundaries
    #[default]
    Info,
    /// Clamped prices and degraded metrics
    Warn,
    /// Failures only
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::InvalidArgument(format!(
                "invalid log level {}, expected one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Complete description of one simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Portfolio tickers
    pub tickers: Vec<String>,
    /// Capital weights, aligned with `tickers`
    pub weights: Vec<f64>,
    /// Benchmark ticker for stress replay
    pub benchmark: String,
    /// Number of Monte Carlo simulations
    pub n_simulations: usize,
    /// Trailing observations used for calibration
    pub calibration_window: usize,
    /// Simulation horizon in years
    pub horizon_years: f64,
    /// Time steps over the horizon
    pub n_steps: usize,
    /// Stochastic model
    pub model: ModelKind,
    /// Jump parameters; defaults apply when the jump model has none
    pub jump_params: Option<JumpParams>,
    /// Historical windows to replay
    pub stress_scenarios: Vec<StressScenario>,
    /// VaR/CVaR confidence level
    pub var_confidence: f64,
    /// Master seed
    pub seed: u64,
    /// Observations per year in the price history
    pub periods_per_year: f64,
    /// Path storage mode
    pub storage: PathStorage,
    /// Drawdown summary mode
    pub drawdown_mode: DrawdownMode,
    /// Portfolio aggregation basis
    pub aggregation: AggregationBasis,
    /// Floor substituted for non-positive simulated prices
    pub price_floor: f64,
    /// Fail instead of clamping non-positive simulated prices
    pub reject_non_positive: bool,
    /// Business days a stress series may miss over a whole window
    pub max_missing_business_days: usize,
    /// Directory of `<TICKER>.csv` files
    pub data_dir: PathBuf,
    /// First date of history considered for calibration
    pub calibration_start: Option<NaiveDate>,
    /// Last date of history considered for calibration
    pub calibration_end: Option<NaiveDate>,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            weights: Vec::new(),
            benchmark: "SPY".to_string(),
            n_simulations: 10_000,
            calibration_window: 252,
            horizon_years: 1.0,
            n_steps: 252,
            model: ModelKind::Gbm,
            jump_params: None,
            stress_scenarios: PresetScenario::CovidCrash.scenario().into_iter().collect(),
            var_confidence: 0.95,
            seed: sim_engine::mc::DEFAULT_SEED,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            storage: PathStorage::Full,
            drawdown_mode: DrawdownMode::Worst,
            aggregation: AggregationBasis::Normalised,
            price_floor: DEFAULT_PRICE_FLOOR,
            reject_non_positive: false,
            max_missing_business_days: 1,
            data_dir: PathBuf::from("data"),
            calibration_start: None,
            calibration_end: None,
            log_level: LogLevel::Info,
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: RunConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies `RISK_SIM_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies `RISK_SIM_*` overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = parse_env(ENV_SEED, &seed)?;
        }
        if let Some(n) = lookup(ENV_N_SIMULATIONS) {
            self.n_simulations = parse_env(ENV_N_SIMULATIONS, &n)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<()> {
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(n) = cli.n_simulations {
            self.n_simulations = n;
        }
        if let Some(model) = cli.model {
            self.model = model;
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(CliError::Config(msg));

        if self.tickers.is_empty() {
            return fail("at least one ticker is required".to_string());
        }
        if self.weights.len() != self.tickers.len() {
            return fail(format!(
                "{} weights given for {} tickers",
                self.weights.len(),
                self.tickers.len()
            ));
        }
        if self.benchmark.trim().is_empty() {
            return fail("benchmark must not be empty".to_string());
        }
        if self.n_simulations == 0 || self.n_simulations > MAX_SIMULATIONS {
            return fail(format!(
                "n_simulations must be in 1..={}, got {}",
                MAX_SIMULATIONS, self.n_simulations
            ));
        }
        if self.calibration_window < MIN_WINDOW {
            return fail(format!(
                "calibration_window must be at least {}, got {}",
                MIN_WINDOW, self.calibration_window
            ));
        }
        if !(self.horizon_years > 0.0 && self.horizon_years.is_finite()) {
            return fail(format!("horizon_years must be positive, got {}", self.horizon_years));
        }
        if self.n_steps == 0 {
            return fail("n_steps must be at least 1".to_string());
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return fail(format!(
                "var_confidence must lie in (0, 1), got {}",
                self.var_confidence
            ));
        }
        if !(self.periods_per_year > 0.0 && self.periods_per_year.is_finite()) {
            return fail(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            ));
        }
        if let (Some(start), Some(end)) = (self.calibration_start, self.calibration_end) {
            if start >= end {
                return fail(format!(
                    "calibration_start {} must precede calibration_end {}",
                    start, end
                ));
            }
        }
        Ok(())
    }

    /// Validated portfolio weights.
    pub fn portfolio_weights(&self) -> SimResult<PortfolioWeights> {
        PortfolioWeights::new(self.tickers.iter().cloned().zip(self.weights.iter().copied()))
    }

    /// Calibrator for the configured window.
    pub fn calibrator(&self) -> ReturnCalibrator {
        ReturnCalibrator::new(self.calibration_window).with_periods_per_year(self.periods_per_year)
    }

    /// History range fetched for calibration.
    pub fn calibration_range(&self) -> (NaiveDate, NaiveDate) {
        (
            self.calibration_start.unwrap_or(NaiveDate::MIN),
            self.calibration_end.unwrap_or(NaiveDate::MAX),
        )
    }

    /// Jump parameters in effect for the jump-diffusion model.
    pub fn jump_params_or_default(&self) -> JumpParams {
        self.jump_params.unwrap_or_default()
    }

    /// Engine configuration.
    pub fn simulation_config(&self) -> SimResult<SimulationConfig> {
        let policy = if self.reject_non_positive {
            PricePolicy::Reject
        } else {
            PricePolicy::Clamp {
                floor: self.price_floor,
            }
        };
        SimulationConfig::builder()
            .n_simulations(self.n_simulations)
            .n_steps(self.n_steps)
            .horizon_years(self.horizon_years)
            .seed(self.seed)
            .storage(self.storage)
            .price_policy(policy)
            .build()
    }

    /// Risk calculator at the configured confidence.
    pub fn risk_calculator(&self) -> SimResult<RiskCalculator> {
        Ok(RiskCalculator::new(self.var_confidence)?.with_drawdown_mode(self.drawdown_mode))
    }

    /// Stress replayer for the configured portfolio and benchmark.
    pub fn stress_replayer(&self) -> SimResult<StressReplayer> {
        Ok(StressReplayer::new(self.portfolio_weights()?, self.benchmark.clone())
            .with_max_missing_business_days(self.max_missing_business_days))
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("{}={} is not valid", key, value)))
}

/// CLI overrides
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Seed override
    pub seed: Option<u64>,
    /// Simulation count override
    pub n_simulations: Option<usize>,
    /// Model override
    pub model: Option<ModelKind>,
    /// Data directory override
    pub data_dir: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources, reading the process environment.
pub fn build_config(cli: &CliArgs) -> Result<RunConfig> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// Build configuration from all sources with an explicit environment.
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<RunConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    config.apply_env_with(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}

//! Run command implementation
//!
//! Full pipeline: calibrate from CSV history, simulate, aggregate, compute
//! risk metrics, replay stress scenarios and emit a JSON report.

use std::path::Path;

use sim_core::market_data::MarketDataProvider;
use sim_core::types::AssetSeries;
use sim_core::{SimError, SimResult};
use sim_engine::generator::PathGenerator;
use sim_models::calibration::CalibratedParams;
use sim_models::models::{BootstrapModel, ModelEnum, ModelKind};
use sim_risk::portfolio::PortfolioAggregator;
use sim_risk::stress::{StressResult, StressScenario};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::provider::CsvDataProvider;
use crate::report::{CalibrationSummary, RunReport, RunSummary};
use crate::Result;

/// Run the pipeline and write the report to `output` (stdout if `None`).
pub fn run(config: &RunConfig, output: Option<&Path>, pretty: bool) -> Result<()> {
    let report = execute(config)?;
    let json = report.to_json(pretty)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json)?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Run the pipeline and return the report.
pub fn execute(config: &RunConfig) -> Result<RunReport> {
    let provider = CsvDataProvider::new(&config.data_dir);
    info!(
        tickers = ?config.tickers,
        model = %config.model,
        n_simulations = config.n_simulations,
        data_dir = %config.data_dir.display(),
        "Starting simulation run"
    );

    // 1. Calibration
    let calibrator = config.calibrator();
    let (start, end) = config.calibration_range();
    let series = calibrator.fetch_series(&provider, &config.tickers, start, end)?;
    let params = calibrator.calibrate(&series)?;

    // 2. Simulation from the latest calibrated prices
    let model = build_model(config, &params, &series)?;
    let initial_prices: Vec<f64> = series.iter().map(AssetSeries::last_price).collect();
    let paths = PathGenerator::new(config.simulation_config()?).generate(
        &params,
        &model,
        &initial_prices,
    )?;

    // 3. Aggregation and risk
    let weights = config.portfolio_weights()?;
    let trajectories = PortfolioAggregator::new(config.aggregation).aggregate(&paths, &weights)?;
    let risk = config.risk_calculator()?.compute(&trajectories)?;

    // 4. Stress replay
    let stress = replay_scenarios(config, &provider)?;

    info!(
        var = risk.var,
        cvar = risk.cvar,
        scenarios = stress.len(),
        "Simulation run complete"
    );

    Ok(RunReport {
        run: RunSummary {
            model: config.model,
            seed: config.seed,
            n_simulations: paths.num_simulations(),
            n_steps: paths.num_steps(),
            horizon_years: paths.horizon_years(),
            clamped_prices: paths.clamped_count(),
        },
        calibration: CalibrationSummary::from(&params),
        risk,
        stress,
    })
}

fn build_model(
    config: &RunConfig,
    params: &CalibratedParams,
    series: &[AssetSeries],
) -> SimResult<ModelEnum> {
    match config.model {
        ModelKind::Gbm => ModelEnum::gbm(params),
        ModelKind::JumpDiffusion => ModelEnum::jump_diffusion(params, config.jump_params_or_default()),
        ModelKind::Bootstrap => {
            let implied = config.horizon_years * config.periods_per_year;
            if (implied - config.n_steps as f64).abs() >= 1.0 {
                warn!(
                    n_steps = config.n_steps,
                    implied_steps = implied,
                    "Bootstrap steps are observation periods; horizon_years does not rescale them"
                );
            }
            let model = BootstrapModel::from_series(series, config.calibration_window)?;
            Ok(ModelEnum::bootstrap(model))
        }
    }
}

fn replay_scenarios<P>(config: &RunConfig, provider: &P) -> Result<Vec<StressResult>>
where
    P: MarketDataProvider + ?Sized,
{
    if config.stress_scenarios.is_empty() {
        return Ok(Vec::new());
    }
    let replayer = config.stress_replayer()?;

    let mut results = Vec::with_capacity(config.stress_scenarios.len());
    for scenario in &config.stress_scenarios {
        let series = config
            .tickers
            .iter()
            .map(|ticker| fetch_window(provider, scenario, ticker))
            .collect::<SimResult<Vec<_>>>()?;
        let benchmark = fetch_window(provider, scenario, &config.benchmark)?;
        results.push(replayer.replay(scenario, &series, &benchmark)?);
    }
    Ok(results)
}

/// Provider failures inside a stress window are coverage gaps.
fn fetch_window<P>(provider: &P, scenario: &StressScenario, ticker: &str) -> SimResult<AssetSeries>
where
    P: MarketDataProvider + ?Sized,
{
    provider
        .fetch(ticker, scenario.start, scenario.end)
        .map_err(|e| SimError::ScenarioDataGap {
            scenario: scenario.name.clone(),
            ticker: ticker.to_string(),
            detail: e.to_string(),
        })
}

//! Property tests over simulated portfolios and historical replays.

use chrono::NaiveDate;
use proptest::prelude::*;
use sim_core::math::CorrelationMatrix;
use sim_core::types::{is_business_day, AssetSeries};
use sim_core::SimError;
use sim_engine::generator::PathGenerator;
use sim_engine::mc::SimulationConfig;
use sim_models::calibration::{CalibratedParams, JumpParams};
use sim_models::models::ModelEnum;
use sim_risk::metrics::{max_drawdown, DrawdownMode, RiskCalculator};
use sim_risk::portfolio::{aggregate, AggregationBasis, PortfolioWeights};
use sim_risk::stress::{PresetScenario, StressReplayer};

fn params(vol_a: f64, vol_b: f64, rho: f64) -> CalibratedParams {
    CalibratedParams::new(
        vec!["A".to_string(), "B".to_string()],
        vec![0.06, 0.03],
        vec![vol_a, vol_b],
        CorrelationMatrix::new(&[1.0, rho, rho, 1.0], 2).unwrap(),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every simulated trajectory has a drawdown in [0, 1] and CVaR >= VaR.
    #[test]
    fn test_simulated_risk_bounds(
        vol_a in 0.01..0.8_f64,
        vol_b in 0.01..0.8_f64,
        rho in -0.9..0.9_f64,
        weight in 0.0..=1.0_f64,
        intensity in 0.0..3.0_f64,
        seed in any::<u64>()
    ) {
        let params = params(vol_a, vol_b, rho);
        let model = ModelEnum::jump_diffusion(&params, JumpParams::new(intensity, -0.1, 0.1).unwrap())
            .unwrap();
        let config = SimulationConfig::builder()
            .n_simulations(200)
            .n_steps(26)
            .seed(seed)
            .build()
            .unwrap();
        let paths = PathGenerator::new(config)
            .generate(&params, &model, &[50.0, 25.0])
            .unwrap();
        let weights = PortfolioWeights::new([("A", weight), ("B", 1.0 - weight)]).unwrap();

        for basis in [AggregationBasis::Normalised, AggregationBasis::Price] {
            let trajectories = aggregate(&paths, &weights, basis).unwrap();
            for trajectory in trajectories.trajectories() {
                let dd = max_drawdown(trajectory);
                prop_assert!((0.0..=1.0).contains(&dd));
            }

            for mode in [DrawdownMode::Mean, DrawdownMode::Worst] {
                let report = RiskCalculator::new(0.95)
                    .unwrap()
                    .with_drawdown_mode(mode)
                    .compute(&trajectories)
                    .unwrap();
                prop_assert!(report.cvar >= report.var);
                prop_assert!((0.0..=1.0).contains(&report.max_drawdown));
            }
        }
    }

    /// The worst drawdown dominates the mean drawdown.
    #[test]
    fn test_worst_drawdown_dominates_mean(seed in any::<u64>(), vol in 0.05..0.6_f64) {
        let params = params(vol, vol, 0.2);
        let config = SimulationConfig::builder()
            .n_simulations(100)
            .n_steps(20)
            .seed(seed)
            .build()
            .unwrap();
        let paths = PathGenerator::new(config)
            .generate(&params, &ModelEnum::gbm(&params).unwrap(), &[1.0, 1.0])
            .unwrap();
        let weights = PortfolioWeights::new([("A", 0.5), ("B", 0.5)]).unwrap();
        let trajectories = aggregate(&paths, &weights, AggregationBasis::Normalised).unwrap();

        let worst = RiskCalculator::default().compute(&trajectories).unwrap();
        let mean = RiskCalculator::default()
            .with_drawdown_mode(DrawdownMode::Mean)
            .compute(&trajectories)
            .unwrap();
        prop_assert!(worst.max_drawdown >= mean.max_drawdown);
    }

    /// Replayed drawdowns stay in [0, 1] for arbitrary positive histories.
    #[test]
    fn test_replay_drawdown_bounds(
        moves in prop::collection::vec(-0.12..0.12_f64, 24),
        weight in 0.0..=1.0_f64
    ) {
        let scenario = PresetScenario::CovidCrash.scenario().unwrap();
        let dates = covid_dates();
        prop_assume!(dates.len() == moves.len());

        let walk = |scale: f64| {
            let mut price = 100.0;
            let mut prices = Vec::with_capacity(moves.len());
            for m in &moves {
                prices.push(price);
                price *= (scale * m).exp();
            }
            prices
        };
        let build = |ticker: &str, prices: Vec<f64>| {
            AssetSeries::new(ticker, dates.iter().copied().zip(prices)).unwrap()
        };

        let a = build("A", walk(1.0));
        let b = build("B", walk(-0.5));
        let bench = build("SPY", walk(0.8));
        let weights = PortfolioWeights::new([("A", weight), ("B", 1.0 - weight)]).unwrap();
        let result = StressReplayer::new(weights, "SPY")
            .replay(&scenario, &[a, b], &bench)
            .unwrap();

        prop_assert!((0.0..=1.0).contains(&result.max_drawdown_during_window));
        prop_assert!(result.portfolio_return > -1.0);
        prop_assert_eq!(result.observations, 24);
    }
}

fn covid_dates() -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 2, 19).unwrap();
    let end = NaiveDate::from_ymd_opt(2020, 3, 23).unwrap();
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .collect()
}

/// Two consecutive missing trading days inside the COVID window are a gap.
#[test]
fn test_covid_replay_with_gap() {
    let scenario = PresetScenario::CovidCrash.scenario().unwrap();
    let mut dates = covid_dates();
    // Tuesday 10 and Wednesday 11 March 2020
    dates.retain(|d| *d != NaiveDate::from_ymd_opt(2020, 3, 10).unwrap());
    dates.retain(|d| *d != NaiveDate::from_ymd_opt(2020, 3, 11).unwrap());

    let series = |ticker: &str| {
        AssetSeries::new(ticker, dates.iter().map(|d| (*d, 100.0))).unwrap()
    };
    let weights = PortfolioWeights::new([("A", 0.6), ("B", 0.4)]).unwrap();
    let err = StressReplayer::new(weights, "SPY")
        .replay(&scenario, &[series("A"), series("B")], &series("SPY"))
        .unwrap_err();

    match err {
        SimError::ScenarioDataGap { scenario, detail, .. } => {
            assert_eq!(scenario, "2020 COVID Crash");
            assert!(detail.contains("2 business days"), "{}", detail);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any two trading days missing from the COVID window fail the default
    /// replayer, adjacent or not; any single one is tolerated.
    #[test]
    fn test_any_two_missing_days_is_gap(i in 0..24usize, j in 0..24usize) {
        prop_assume!(i != j);
        let scenario = PresetScenario::CovidCrash.scenario().unwrap();
        let all = covid_dates();
        let build = |dates: &[NaiveDate], ticker: &str| {
            AssetSeries::new(ticker, dates.iter().map(|d| (*d, 100.0))).unwrap()
        };
        let replayer = || {
            StressReplayer::new(PortfolioWeights::new([("A", 0.5), ("B", 0.5)]).unwrap(), "SPY")
        };

        let one: Vec<NaiveDate> = all
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != i)
            .map(|(_, d)| *d)
            .collect();
        prop_assert!(replayer()
            .replay(&scenario, &[build(&one, "A"), build(&one, "B")], &build(&one, "SPY"))
            .is_ok());

        let two: Vec<NaiveDate> = all
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .map(|(_, d)| *d)
            .collect();
        let result = replayer().replay(
            &scenario,
            &[build(&two, "A"), build(&two, "B")],
            &build(&two, "SPY"),
        );
        prop_assert!(
            matches!(result, Err(SimError::ScenarioDataGap { .. })),
            "dropping {} and {} gave {:?}",
            i,
            j,
            result
        );
    }
}

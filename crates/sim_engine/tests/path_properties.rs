//! Integration tests for simulated path properties.

use approx::assert_relative_eq;
use proptest::prelude::*;
use sim_core::math::stats::{log_returns, mean, pearson};
use sim_core::math::CorrelationMatrix;
use sim_engine::generator::PathGenerator;
use sim_engine::mc::{ParallelConfig, SimulationConfig};
use sim_models::calibration::{CalibratedParams, JumpParams};
use sim_models::models::ModelEnum;

fn two_asset_params(rho: f64) -> CalibratedParams {
    CalibratedParams::new(
        vec!["EQ".to_string(), "BOND".to_string()],
        vec![0.08, 0.05],
        vec![0.2, 0.15],
        CorrelationMatrix::new(&[1.0, rho, rho, 1.0], 2).unwrap(),
    )
    .unwrap()
}

fn config(n_simulations: usize, n_steps: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .n_simulations(n_simulations)
        .n_steps(n_steps)
        .horizon_years(1.0)
        .seed(seed)
        .build()
        .unwrap()
}

/// Step log returns recover the input correlation.
#[test]
fn test_simulated_correlation_matches_input() {
    let params = two_asset_params(0.3);
    let model = ModelEnum::gbm(&params).unwrap();
    let paths = PathGenerator::new(config(400, 50, 7))
        .generate(&params, &model, &[100.0, 100.0])
        .unwrap();

    let mut ra = Vec::new();
    let mut rb = Vec::new();
    for i in 0..paths.num_simulations() {
        let a: Vec<f64> = (0..paths.stored_steps()).map(|t| paths.price(i, t, 0)).collect();
        let b: Vec<f64> = (0..paths.stored_steps()).map(|t| paths.price(i, t, 1)).collect();
        ra.extend(log_returns(&a));
        rb.extend(log_returns(&b));
    }
    let rho = pearson(&ra, &rb).unwrap();
    assert!((rho - 0.3).abs() < 0.03, "rho = {}", rho);
}

/// Mean terminal price matches S0 * exp(mu * T) for GBM.
#[test]
fn test_gbm_mean_terminal_price() {
    let params = two_asset_params(0.0);
    let model = ModelEnum::gbm(&params).unwrap();
    let paths = PathGenerator::new(config(20_000, 4, 11))
        .generate(&params, &model, &[100.0, 100.0])
        .unwrap();

    let terminal = paths.terminal_prices(0);
    assert_relative_eq!(mean(&terminal), 100.0 * 0.08_f64.exp(), max_relative = 0.01);
}

/// Jump compensation keeps the mean terminal price at S0 * exp(mu * T).
#[test]
fn test_jump_diffusion_mean_terminal_price() {
    let params = two_asset_params(0.3);
    let model = ModelEnum::jump_diffusion(&params, JumpParams::new(1.0, -0.1, 0.15).unwrap()).unwrap();
    let paths = PathGenerator::new(config(20_000, 12, 5))
        .generate(&params, &model, &[100.0, 100.0])
        .unwrap();

    assert_relative_eq!(
        mean(&paths.terminal_prices(1)),
        100.0 * 0.05_f64.exp(),
        max_relative = 0.01
    );
}

/// Different seeds give different paths; equal seeds identical ones.
#[test]
fn test_seed_controls_output() {
    let params = two_asset_params(0.5);
    let model = ModelEnum::gbm(&params).unwrap();
    let a = PathGenerator::new(config(300, 10, 1))
        .generate(&params, &model, &[1.0, 1.0])
        .unwrap();
    let b = PathGenerator::new(config(300, 10, 1))
        .with_parallel_config(ParallelConfig::sequential())
        .generate(&params, &model, &[1.0, 1.0])
        .unwrap();
    let c = PathGenerator::new(config(300, 10, 2))
        .generate(&params, &model, &[1.0, 1.0])
        .unwrap();

    assert_eq!(a.as_slice(), b.as_slice());
    assert_ne!(a.as_slice(), c.as_slice());
}

/// Simulation `i` does not depend on how many simulations are run.
#[test]
fn test_prefix_stability() {
    let params = two_asset_params(0.1);
    let model = ModelEnum::gbm(&params).unwrap();
    let small = PathGenerator::new(config(10, 5, 9))
        .generate(&params, &model, &[1.0, 1.0])
        .unwrap();
    let large = PathGenerator::new(config(1000, 5, 9))
        .generate(&params, &model, &[1.0, 1.0])
        .unwrap();
    assert_eq!(small.as_slice(), &large.as_slice()[..small.as_slice().len()]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Stored initial prices equal the inputs bit-for-bit and every price is positive.
    #[test]
    fn test_initial_prices_and_positivity(
        s0 in 1e-3..1e6_f64,
        s1 in 1e-3..1e6_f64,
        vol in 0.0..1.5_f64,
        seed in any::<u64>()
    ) {
        let params = CalibratedParams::new(
            vec!["A".to_string(), "B".to_string()],
            vec![0.05, -0.05],
            vec![vol, vol / 2.0],
            CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap(),
        )
        .unwrap();
        let model = ModelEnum::gbm(&params).unwrap();
        let paths = PathGenerator::new(config(20, 8, seed))
            .generate(&params, &model, &[s0, s1])
            .unwrap();

        for i in 0..paths.num_simulations() {
            prop_assert_eq!(paths.price(i, 0, 0).to_bits(), s0.to_bits());
            prop_assert_eq!(paths.price(i, 0, 1).to_bits(), s1.to_bits());
        }
        prop_assert!(paths.as_slice().iter().all(|p| p.is_finite() && *p > 0.0));
    }
}

//! Integration tests: calibration feeding the step models.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sim_core::market_data::InMemoryProvider;
use sim_core::types::AssetSeries;
use sim_core::SimError;
use sim_models::calibration::{ReturnCalibrator, MIN_WINDOW};
use sim_models::models::{BootstrapModel, ModelEnum, ModelKind, StepModel};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Builds a daily series from log returns.
fn series_from_returns(ticker: &str, s0: f64, returns: &[f64]) -> AssetSeries {
    let mut price = s0;
    let mut points = vec![(start(), price)];
    for (i, r) in returns.iter().enumerate() {
        price *= r.exp();
        points.push((start() + Duration::days(i as i64 + 1), price));
    }
    AssetSeries::new(ticker, points).unwrap()
}

/// Correlated synthetic returns with known daily moments.
fn synthetic_pair(n: usize, rho: f64) -> (Vec<f64>, Vec<f64>) {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for _ in 0..n {
        let z1: f64 = normal.sample(&mut rng);
        let z2: f64 = normal.sample(&mut rng);
        a.push(0.0004 + 0.01 * z1);
        b.push(0.0002 + 0.02 * (rho * z1 + (1.0 - rho * rho).sqrt() * z2));
    }
    (a, b)
}

#[test]
fn test_calibration_recovers_synthetic_moments() {
    let (ra, rb) = synthetic_pair(5000, 0.6);
    let a = series_from_returns("A", 100.0, &ra);
    let b = series_from_returns("B", 50.0, &rb);

    let params = ReturnCalibrator::new(5001).calibrate(&[a, b]).unwrap();

    assert_relative_eq!(params.volatility()[0], 0.01 * 252.0_f64.sqrt(), max_relative = 0.05);
    assert_relative_eq!(params.volatility()[1], 0.02 * 252.0_f64.sqrt(), max_relative = 0.05);
    assert!((params.correlation().get(0, 1) - 0.6).abs() < 0.05);
    assert_eq!(params.observations(), 5000);

    let cov01 = params.covariance()[1];
    let implied = params.volatility()[0] * params.volatility()[1] * params.correlation().get(0, 1);
    assert_relative_eq!(cov01, implied, max_relative = 1e-9);
}

#[test]
fn test_calibrated_params_drive_models() {
    let (ra, rb) = synthetic_pair(300, 0.2);
    let a = series_from_returns("A", 100.0, &ra);
    let b = series_from_returns("B", 50.0, &rb);
    let provider = InMemoryProvider::new()
        .with_series(a.clone())
        .with_series(b.clone());

    let params = ReturnCalibrator::new(250)
        .calibrate_from_provider(&provider, &["A", "B"], start(), start() + Duration::days(400))
        .unwrap();

    let gbm = ModelEnum::gbm(&params).unwrap();
    let boot = ModelEnum::bootstrap(BootstrapModel::from_series(&[a, b], 250).unwrap());
    assert_eq!(gbm.kind(), ModelKind::Gbm);
    assert_eq!(boot.num_assets(), params.num_assets());

    let mut rng = StdRng::seed_from_u64(1);
    let mut prices = [100.0, 50.0];
    for _ in 0..10 {
        gbm.advance(&mut prices, &[0.1, -0.1], 1.0 / 252.0, &mut rng);
        boot.advance(&mut prices, &[], 1.0 / 252.0, &mut rng);
    }
    assert!(prices.iter().all(|p| p.is_finite() && *p > 0.0));
}

#[test]
fn test_window_five_with_three_observations() {
    let s = series_from_returns("A", 100.0, &[0.01, -0.01]);
    assert_eq!(s.len(), 3);
    let err = ReturnCalibrator::new(5).calibrate(&[s]).unwrap_err();
    assert_eq!(
        err,
        SimError::InsufficientData {
            ticker: "A".to_string(),
            required: 5,
            available: 3,
        }
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Calibrated parameters form a valid correlation structure for any
    /// aligned histories and any admissible window.
    #[test]
    fn test_calibration_invariants(
        returns in prop::collection::vec(
            (-0.08..0.08_f64, -0.08..0.08_f64, -0.08..0.08_f64),
            2..60,
        ),
        window_offset in 0usize..60,
    ) {
        let cols: [Vec<f64>; 3] = [
            returns.iter().map(|r| r.0).collect(),
            returns.iter().map(|r| r.1).collect(),
            returns.iter().map(|r| r.2).collect(),
        ];
        let series: Vec<AssetSeries> = ["A", "B", "C"]
            .iter()
            .zip(&cols)
            .map(|(ticker, r)| series_from_returns(ticker, 100.0, r))
            .collect();
        let available = returns.len() + 1;
        let window = MIN_WINDOW + window_offset % (available - MIN_WINDOW + 1);

        let params = ReturnCalibrator::new(window).calibrate(&series).unwrap();
        let corr = params.correlation();

        prop_assert_eq!(params.observations(), window - 1);
        for i in 0..3 {
            prop_assert!(params.volatility()[i] >= 0.0);
            prop_assert!(params.drift()[i].is_finite());
            prop_assert_eq!(corr.get(i, i), 1.0);
            let variance = params.covariance()[i * 3 + i];
            prop_assert!((variance - params.volatility()[i].powi(2)).abs() <= 1e-9 * (1.0 + variance));
            for j in 0..3 {
                prop_assert!(corr.get(i, j).abs() <= 1.0);
                prop_assert_eq!(corr.get(i, j), corr.get(j, i));
            }
        }
    }

    /// Windows below the minimum never produce parameters.
    #[test]
    fn test_small_window_rejected(
        returns in prop::collection::vec(-0.05..0.05_f64, 1..20),
        window in 0usize..MIN_WINDOW,
    ) {
        let s = series_from_returns("A", 100.0, &returns);
        let result = ReturnCalibrator::new(window).calibrate(&[s]);
        let is_insufficient = matches!(result, Err(SimError::InsufficientData { .. }));
        prop_assert!(is_insufficient);
    }
}

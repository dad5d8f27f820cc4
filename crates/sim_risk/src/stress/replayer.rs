//! Deterministic replay of historical windows.

use chrono::NaiveDate;
use sim_core::types::{business_days_between, is_business_day, AssetSeries, PricePoint};
use sim_core::{SimError, SimResult};
use tracing::{debug, info};

use super::scenario::StressScenario;
use crate::metrics::max_drawdown;
use crate::portfolio::PortfolioWeights;

/// Default number of business days a series may miss over a whole window
/// (one market holiday).
pub const DEFAULT_MAX_MISSING_BUSINESS_DAYS: usize = 1;

/// Realised portfolio and benchmark performance over one scenario window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressResult {
    /// Scenario name
    pub scenario_name: String,
    /// Window start
    pub start: NaiveDate,
    /// Window end
    pub end: NaiveDate,
    /// Benchmark ticker
    pub benchmark: String,
    /// Buy-and-hold portfolio return over the window
    pub portfolio_return: f64,
    /// Benchmark return over the window
    pub benchmark_return: f64,
    /// Largest peak-to-trough portfolio loss inside the window, in [0, 1]
    pub max_drawdown_during_window: f64,
    /// Observations used
    pub observations: usize,
}

/// Replays historical windows against fixed portfolio weights.
///
/// The portfolio is bought at the first observation of the window and held:
/// `V_t = Σ w_a · P_a(t) / P_a(start)`. No randomness is involved.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sim_core::types::AssetSeries;
/// use sim_risk::portfolio::PortfolioWeights;
/// use sim_risk::stress::{StressReplayer, StressScenario};
///
/// // Monday 6 to Friday 10 January 2020
/// let d = |day| NaiveDate::from_ymd_opt(2020, 1, day).unwrap();
/// let series = |ticker: &str, prices: [f64; 5]| {
///     AssetSeries::new(ticker, (6..=10).map(d).zip(prices)).unwrap()
/// };
///
/// let a = series("A", [100.0, 90.0, 80.0, 85.0, 90.0]);
/// let b = series("B", [50.0, 50.0, 50.0, 50.0, 50.0]);
/// let bench = series("IDX", [10.0, 9.5, 9.0, 9.5, 9.8]);
///
/// let weights = PortfolioWeights::new([("A", 0.5), ("B", 0.5)]).unwrap();
/// let scenario = StressScenario::new("week", d(6), d(10)).unwrap();
/// let result = StressReplayer::new(weights, "IDX")
///     .replay(&scenario, &[a, b], &bench)
///     .unwrap();
///
/// assert!((result.portfolio_return + 0.05).abs() < 1e-12);
/// assert!((result.benchmark_return + 0.02).abs() < 1e-12);
/// assert!((result.max_drawdown_during_window - 0.1).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct StressReplayer {
    weights: PortfolioWeights,
    benchmark: String,
    max_missing_business_days: usize,
}

impl StressReplayer {
    /// Creates a replayer for `weights` compared against `benchmark`.
    pub fn new(weights: PortfolioWeights, benchmark: impl Into<String>) -> Self {
        Self {
            weights,
            benchmark: benchmark.into(),
            max_missing_business_days: DEFAULT_MAX_MISSING_BUSINESS_DAYS,
        }
    }

    /// Sets how many business days in total a series may miss over a window.
    pub fn with_max_missing_business_days(mut self, days: usize) -> Self {
        self.max_missing_business_days = days;
        self
    }

    /// Portfolio weights.
    pub fn weights(&self) -> &PortfolioWeights {
        &self.weights
    }

    /// Benchmark ticker.
    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// Replays one scenario.
    ///
    /// `series` must contain a history for every weighted ticker; extra
    /// series are ignored.
    ///
    /// # Errors
    ///
    /// - [`SimError::AssetMismatch`] when a weighted ticker has no series or
    ///   `benchmark` is not the configured benchmark
    /// - [`SimError::ScenarioDataGap`] when a series does not cover the
    ///   window, or series disagree on observation dates
    pub fn replay(
        &self,
        scenario: &StressScenario,
        series: &[AssetSeries],
        benchmark: &AssetSeries,
    ) -> SimResult<StressResult> {
        if benchmark.ticker() != self.benchmark {
            return Err(SimError::AssetMismatch(format!(
                "benchmark series {} given, {} configured",
                benchmark.ticker(),
                self.benchmark
            )));
        }

        let mut windows = Vec::with_capacity(self.weights.len());
        for (ticker, weight) in self.weights.iter() {
            let history = series
                .iter()
                .find(|s| s.ticker() == ticker)
                .ok_or_else(|| {
                    SimError::AssetMismatch(format!("no history for weighted asset {}", ticker))
                })?;
            let window = history.window(scenario.start, scenario.end);
            self.check_coverage(scenario, ticker, window)?;
            windows.push((ticker, weight, window));
        }

        let bench_window = benchmark.window(scenario.start, scenario.end);
        self.check_coverage(scenario, benchmark.ticker(), bench_window)?;

        // Coverage guarantees at least two observations per window
        let (reference, _, reference_window) = windows[0];
        let aligned = |points: &[PricePoint]| {
            points.len() == reference_window.len()
                && points
                    .iter()
                    .zip(reference_window)
                    .all(|(p, q)| p.date == q.date)
        };
        for &(ticker, _, window) in windows.iter().skip(1) {
            if !aligned(window) {
                return Err(dates_differ(scenario, ticker, reference));
            }
        }
        if !aligned(bench_window) {
            return Err(dates_differ(scenario, benchmark.ticker(), reference));
        }

        let observations = reference_window.len();
        let values: Vec<f64> = (0..observations)
            .map(|t| {
                windows
                    .iter()
                    .map(|(_, weight, window)| weight * window[t].price / window[0].price)
                    .sum()
            })
            .collect();

        let portfolio_return = values[observations - 1] / values[0] - 1.0;
        let benchmark_return = bench_window[observations - 1].price / bench_window[0].price - 1.0;
        let max_drawdown_during_window = max_drawdown(&values);

        info!(
            scenario = %scenario.name,
            portfolio_return,
            benchmark_return,
            max_drawdown = max_drawdown_during_window,
            observations,
            "Stress scenario replayed"
        );

        Ok(StressResult {
            scenario_name: scenario.name.clone(),
            start: scenario.start,
            end: scenario.end,
            benchmark: self.benchmark.clone(),
            portfolio_return,
            benchmark_return,
            max_drawdown_during_window,
            observations,
        })
    }

    /// Replays every scenario in order, stopping at the first failure.
    pub fn replay_all(
        &self,
        scenarios: &[StressScenario],
        series: &[AssetSeries],
        benchmark: &AssetSeries,
    ) -> SimResult<Vec<StressResult>> {
        scenarios
            .iter()
            .map(|scenario| self.replay(scenario, series, benchmark))
            .collect()
    }

    fn check_coverage(
        &self,
        scenario: &StressScenario,
        ticker: &str,
        window: &[PricePoint],
    ) -> SimResult<()> {
        let gap = |detail: String| SimError::ScenarioDataGap {
            scenario: scenario.name.clone(),
            ticker: ticker.to_string(),
            detail,
        };

        let (first, last) = match window {
            [] => {
                return Err(gap(format!(
                    "no observations between {} and {}",
                    scenario.start, scenario.end
                )))
            }
            [only] => return Err(gap(format!("single observation on {}", only.date))),
            [first, .., last] => (first.date, last.date),
        };

        // Leading shortfall, internal gaps and trailing shortfall, in order
        let leading = (scenario.start, first, missing_from(scenario.start, first));
        let trailing = (last, scenario.end, missing_from(scenario.end, last));
        let internal = window.windows(2).map(|pair| {
            let (from, to) = (pair[0].date, pair[1].date);
            (from, to, business_days_between(from, to))
        });
        let gaps = std::iter::once(leading)
            .chain(internal)
            .chain(std::iter::once(trailing));

        let mut total = 0;
        let mut widest: Option<(NaiveDate, NaiveDate, usize)> = None;
        for (from, to, missing) in gaps {
            total += missing;
            if missing > widest.map_or(0, |(_, _, m)| m) {
                widest = Some((from, to, missing));
            }
        }

        if total > self.max_missing_business_days {
            let (from, to, missing) = widest.unwrap_or((scenario.start, scenario.end, total));
            return Err(gap(format!(
                "{} business days missing (at most {} allowed), widest gap {} between {} and {}",
                total, self.max_missing_business_days, missing, from, to
            )));
        }

        debug!(ticker, observations = window.len(), "Scenario window covered");
        Ok(())
    }
}

/// Business days from the window `bound` (inclusive) to `observed` (exclusive),
/// in either direction.
fn missing_from(bound: NaiveDate, observed: NaiveDate) -> usize {
    if bound == observed {
        return 0;
    }
    let (lo, hi) = if bound < observed {
        (bound, observed)
    } else {
        (observed, bound)
    };
    business_days_between(lo, hi) + usize::from(is_business_day(bound))
}

fn dates_differ(scenario: &StressScenario, ticker: &str, reference: &str) -> SimError {
    SimError::ScenarioDataGap {
        scenario: scenario.name.clone(),
        ticker: ticker.to_string(),
        detail: format!("observation dates differ from {}", reference),
    }
}

//! StepModel trait: one time step of a multi-asset price model.
//!
//! The simulation engine owns the time loop, the random sub-streams and the
//! correlation of Gaussian shocks. A model only turns the current price vector
//! of one simulation into the next one.
//!
//! ## Design Philosophy
//!
//! - **Static dispatch only**: models are combined in
//!   [`ModelEnum`](super::ModelEnum), not `Box<dyn StepModel>`
//! - **Pre-correlated shocks**: `shocks[a]` is already `(L * Z)[a]`
//! - **Extra randomness** (jump counts, resampled rows) is drawn from the
//!   simulation's own generator passed as `rng`

use rand::Rng;

/// A model that advances all asset prices of one simulation by one step.
pub trait StepModel {
    /// Number of assets the model was built for.
    fn num_assets(&self) -> usize;

    /// Advances `prices` in place over a step of length `dt` years.
    ///
    /// `shocks` holds one correlated standard normal draw per asset.
    /// Implementations must not assume the prices are positive after the
    /// step; the engine applies its numeric policy afterwards.
    fn advance<R: Rng + ?Sized>(&self, prices: &mut [f64], shocks: &[f64], dt: f64, rng: &mut R);

    /// Whether [`StepModel::advance`] reads `shocks`.
    ///
    /// The engine skips drawing Gaussian shocks when this is `false`.
    fn uses_shocks(&self) -> bool {
        true
    }

    /// Short identifier used in logs and reports.
    fn model_name(&self) -> &'static str;
}

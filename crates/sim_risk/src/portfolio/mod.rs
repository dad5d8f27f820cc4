//! Portfolio construction and aggregation.
//!
//! - [`PortfolioWeights`]: validated long-only weights keyed by ticker
//! - [`PortfolioAggregator`]: fixed-weight combination of simulated paths
//! - [`PortfolioTrajectories`]: per-simulation value paths and terminal returns

mod aggregator;
mod weights;

pub use aggregator::{aggregate, AggregationBasis, PortfolioAggregator, PortfolioTrajectories};
pub use weights::{PortfolioWeights, WEIGHT_TOLERANCE};

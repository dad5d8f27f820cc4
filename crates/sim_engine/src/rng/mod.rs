//! # Random Number Generation
//!
//! Seeded generators for the path engine.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: one `u64` seed fixes every simulated number
//! - **Independence**: simulation `i` uses sub-stream `i`, so parallel and
//!   sequential runs produce identical bits
//! - **Efficiency**: batch normal generation into caller-owned buffers
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_engine::rng::SimRng;
//!
//! let mut rng = SimRng::for_simulation(42, 0);
//! let mut shocks = [0.0; 3];
//! rng.fill_normal(&mut shocks);
//! ```

pub mod prng;

pub use prng::SimRng;

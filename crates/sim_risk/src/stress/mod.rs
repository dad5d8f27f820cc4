//! Historical stress testing.
//!
//! Replays the realised prices of a named crisis window against the current
//! portfolio weights and a benchmark. Each series must cover the window on a
//! weekday calendar, tolerating short gaps such as market holidays.

mod replayer;
mod scenario;

pub use replayer::{StressReplayer, StressResult, DEFAULT_MAX_MISSING_BUSINESS_DAYS};
pub use scenario::{PresetScenario, StressScenario};

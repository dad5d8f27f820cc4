//! Historical stress windows.

use chrono::NaiveDate;
use sim_core::{SimError, SimResult};

/// A named historical window replayed against the current portfolio.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressScenario {
    /// Scenario name, e.g. "2020 COVID Crash"
    pub name: String,
    /// First day of the window (inclusive)
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
}

impl StressScenario {
    /// Creates a scenario.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidModelParameter`] unless `start < end`.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> SimResult<Self> {
        let name = name.into();
        if start >= end {
            return Err(SimError::invalid_parameter(
                format!("scenario '{}'", name),
                format!("start {} must precede end {}", start, end),
            ));
        }
        Ok(Self { name, start, end })
    }
}

/// Well-known equity crisis windows, peak to trough of the S&P 500.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresetScenario {
    /// 19 February 2020 to 23 March 2020
    CovidCrash,
    /// 9 October 2007 to 9 March 2009
    GlobalFinancialCrisis,
}

impl PresetScenario {
    /// All presets.
    pub fn all() -> [Self; 2] {
        [Self::CovidCrash, Self::GlobalFinancialCrisis]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CovidCrash => "2020 COVID Crash",
            Self::GlobalFinancialCrisis => "2008 Global Financial Crisis",
        }
    }

    /// Builds the scenario window.
    pub fn scenario(&self) -> SimResult<StressScenario> {
        let ((sy, sm, sd), (ey, em, ed)) = match self {
            Self::CovidCrash => ((2020, 2, 19), (2020, 3, 23)),
            Self::GlobalFinancialCrisis => ((2007, 10, 9), (2009, 3, 9)),
        };
        StressScenario::new(self.name(), ymd(sy, sm, sd)?, ymd(ey, em, ed)?)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> SimResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SimError::invalid_parameter("date", format!("{}-{}-{} is not a date", year, month, day))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_order_enforced() {
        let a = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        assert!(StressScenario::new("ok", a, b).is_ok());
        assert!(StressScenario::new("same", a, a).is_err());
        assert!(StressScenario::new("reversed", b, a).is_err());
    }

    #[test]
    fn test_covid_preset() {
        let s = PresetScenario::CovidCrash.scenario().unwrap();
        assert_eq!(s.name, "2020 COVID Crash");
        assert_eq!(s.start, NaiveDate::from_ymd_opt(2020, 2, 19).unwrap());
        assert_eq!(s.end, NaiveDate::from_ymd_opt(2020, 3, 23).unwrap());
    }

    #[test]
    fn test_all_presets_build() {
        for preset in PresetScenario::all() {
            let s = preset.scenario().unwrap();
            assert!(s.start < s.end);
            assert_eq!(s.name, preset.name());
        }
    }
}

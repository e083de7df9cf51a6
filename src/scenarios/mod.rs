mod averages;
mod consistency;
mod reconcile;

use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

pub use averages::highest_average_case;
pub use consistency::{city_id_weather_case, city_weather_case, status_case};
pub use reconcile::Reconciler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Status,
    CityWeather,
    CityIdWeather,
    HighestAverage,
    Discrepancy,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Status,
        Scenario::CityWeather,
        Scenario::CityIdWeather,
        Scenario::HighestAverage,
        Scenario::Discrepancy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Status => "status",
            Scenario::CityWeather => "city-weather",
            Scenario::CityIdWeather => "city-id-weather",
            Scenario::HighestAverage => "highest-average",
            Scenario::Discrepancy => "discrepancy",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown scenario '{}'", s).into())
    }
}

/// Pass/fail tally for one scenario; one case per city.
#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub passed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl ScenarioReport {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            passed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Logs the case outcome; a failure is kept and the run moves on.
    pub fn record<T>(&mut self, case: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                tracing::info!(scenario = self.scenario.name(), case, "passed");
                self.passed.push(case.to_string());
                Some(value)
            }
            Err(e) => {
                tracing::error!(scenario = self.scenario.name(), case, error = %e, "failed");
                self.failed.push((case.to_string(), e.to_string()));
                None
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

use std::time::Duration;

use crate::api::WeatherClient;
use crate::config::Config;
use crate::db::{Repository, WEATHER_TABLE};
use crate::error::Result;
use crate::input::CitySheet;
use crate::models::{CityCountry, WeatherRecord};
use crate::report;
use crate::scenarios::{
    city_id_weather_case, city_weather_case, highest_average_case, status_case, Reconciler,
    Scenario, ScenarioReport,
};
use crate::web::{PageDriver, StaticPageDriver, DEFAULT_WAIT};

/// Runs scenarios one after another. Each scenario opens its own store
/// connection (and page driver) and releases it before the next starts.
pub struct App {
    config: Config,
    client: WeatherClient,
    element_wait: Duration,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = WeatherClient::new(config.api_key.clone(), config.api_base_url.clone())?;
        Ok(Self {
            config,
            client,
            element_wait: DEFAULT_WAIT,
        })
    }

    #[cfg(test)]
    fn with_element_wait(mut self, wait: Duration) -> Self {
        self.element_wait = wait;
        self
    }

    pub async fn run(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for &scenario in scenarios {
            tracing::info!("Running scenario {}", scenario);
            let outcome = match self.run_scenario(scenario).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let mut outcome = ScenarioReport::new(scenario);
                    outcome.record::<()>("setup", Err(e));
                    outcome
                }
            };
            reports.push(outcome);
        }
        reports
    }

    async fn run_scenario(&self, scenario: Scenario) -> Result<ScenarioReport> {
        match scenario {
            Scenario::Status => Ok(self.run_status().await),
            Scenario::Discrepancy => self.run_discrepancy().await,
            other => self.run_store_scenario(other).await,
        }
    }

    async fn run_status(&self) -> ScenarioReport {
        let mut outcome = ScenarioReport::new(Scenario::Status);
        for city in &self.config.cities {
            let result = status_case(&self.client, city).await;
            outcome.record(city, result);
        }
        outcome
    }

    async fn run_store_scenario(&self, scenario: Scenario) -> Result<ScenarioReport> {
        let repository = Repository::new(&self.config.store_path).await?;
        let mut outcome = ScenarioReport::new(scenario);

        for city in &self.config.cities {
            let result = match scenario {
                Scenario::HighestAverage => highest_average_case(&self.client, &repository, city)
                    .await
                    .map(|_| ()),
                Scenario::CityIdWeather => city_id_weather_case(&self.client, &repository, city)
                    .await
                    .map(log_stored),
                _ => city_weather_case(&self.client, &repository, city)
                    .await
                    .map(log_stored),
            };
            outcome.record(city, result);
        }

        tracing::info!("{} rows in {}", repository.row_count().await?, WEATHER_TABLE);
        repository.close().await?;
        Ok(outcome)
    }

    async fn run_discrepancy(&self) -> Result<ScenarioReport> {
        let pairs = CitySheet::open(&self.config.cities_file, &self.config.sheet_name)?
            .city_country_pairs()?;
        let driver = StaticPageDriver::new()?;
        self.reconcile_pairs(&pairs, driver).await
    }

    /// Cross-source check over `pairs`. The driver is quit and the report
    /// written whatever the individual cities produced, and also when the
    /// store cannot be opened.
    pub async fn reconcile_pairs<D: PageDriver>(
        &self,
        pairs: &[CityCountry],
        mut driver: D,
    ) -> Result<ScenarioReport> {
        let repository = match Repository::new(&self.config.store_path).await {
            Ok(repository) => repository,
            Err(e) => {
                quit_driver(&mut driver).await;
                report::write_report(&self.config.reports_dir, &[])?;
                return Err(e);
            }
        };
        let mut outcome = ScenarioReport::new(Scenario::Discrepancy);

        let discrepancies = Reconciler::new(
            &repository,
            &mut driver,
            &self.config.web_base_url,
            self.element_wait,
        )
        .run(pairs, Vec::new(), &mut outcome)
        .await;

        quit_driver(&mut driver).await;
        let written = report::write_report(&self.config.reports_dir, &discrepancies);
        if let Err(e) = repository.close().await {
            tracing::warn!("Failed to close store after reconciliation: {}", e);
        }

        written?;
        Ok(outcome)
    }
}

async fn quit_driver<D: PageDriver + ?Sized>(driver: &mut D) {
    if let Err(e) = driver.quit().await {
        tracing::warn!("Failed to quit page driver: {}", e);
    }
}

fn log_stored(record: WeatherRecord) {
    tracing::info!(
        "{} stored at {} °C, feels like {} °C",
        record.city,
        record.temperature,
        record.feels_like
    );
}

use std::time::Duration;

use super::ScenarioReport;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{CityCountry, CityReadings, DiscrepancyRecord};
use crate::web::{PageDriver, WeatherTab};

/// Compares scraped readings per city with the values stored from the API.
pub struct Reconciler<'a, D: PageDriver + ?Sized> {
    repository: &'a Repository,
    driver: &'a mut D,
    base_url: &'a str,
    wait: Duration,
}

impl<'a, D: PageDriver + ?Sized> Reconciler<'a, D> {
    pub fn new(repository: &'a Repository, driver: &'a mut D, base_url: &'a str, wait: Duration) -> Self {
        Self {
            repository,
            driver,
            base_url,
            wait,
        }
    }

    /// `{base}/{country-slug}/{city-slug}`
    pub fn page_url(&self, pair: &CityCountry) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), pair.page_path())
    }

    /// Reconciles every pair in order. Mismatches are appended to
    /// `discrepancies`, which is handed back; per-city errors land in `outcome`.
    pub async fn run(
        &mut self,
        pairs: &[CityCountry],
        mut discrepancies: Vec<DiscrepancyRecord>,
        outcome: &mut ScenarioReport,
    ) -> Vec<DiscrepancyRecord> {
        for pair in pairs {
            let result = self.reconcile_city(pair).await;
            if let Some(Some(record)) = outcome.record(&pair.city, result) {
                discrepancies.push(record);
            }
        }
        discrepancies
    }

    pub async fn reconcile_city(&mut self, pair: &CityCountry) -> Result<Option<DiscrepancyRecord>> {
        let readings = self.gather(pair).await?;
        let discrepancy = readings.discrepancy()?;
        if discrepancy.is_some() {
            tracing::warn!("Discrepancy recorded for {}", pair.city);
        }
        Ok(discrepancy)
    }

    async fn gather(&mut self, pair: &CityCountry) -> Result<CityReadings> {
        let url = self.page_url(pair);
        self.driver.goto(&url).await?;

        let tab = WeatherTab::new(&*self.driver, self.wait);
        let city = pair.city.as_str();

        let web_temperature = tab.temperature().await?;
        let store_temperature = self.stored(city, "temperature").await?;
        tracing::info!("(Web) Temperature in {} is {}", city, web_temperature);
        tracing::info!("(DB) Temperature in {} is {} °C", city, store_temperature);

        let web_feels_like = tab.feels_like().await?;
        let store_feels_like = self.stored(city, "feels_like").await?;
        tracing::info!("(Web) Feels Like in {} is {}", city, web_feels_like);
        tracing::info!("(DB) Feels Like in {} is {} °C", city, store_feels_like);

        Ok(CityReadings {
            city: city.to_string(),
            web_temperature,
            web_feels_like,
            store_temperature,
            store_feels_like,
        })
    }

    async fn stored(&self, city: &str, column: &str) -> Result<f64> {
        self.repository
            .get_field(city, column)
            .await?
            .ok_or_else(|| AppError::MissingStoredValue {
                city: city.to_string(),
                column: column.to_string(),
            })
    }
}

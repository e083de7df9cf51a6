use super::reading::{format_reading, truncate_stored_reading, truncate_web_reading};
use crate::error::Result;

/// Web vs store readings for one city, as they appear in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscrepancyRecord {
    pub city: String,
    pub web_temperature_text: String,
    pub store_temperature_text: String,
    pub web_feels_like_text: String,
    pub store_feels_like_text: String,
}

/// Readings gathered for one city before comparison.
#[derive(Debug, Clone)]
pub struct CityReadings {
    pub city: String,
    pub web_temperature: String,
    pub web_feels_like: String,
    pub store_temperature: f64,
    pub store_feels_like: f64,
}

impl CityReadings {
    /// Compares integer parts; `Some` only when either pair disagrees.
    pub fn discrepancy(&self) -> Result<Option<DiscrepancyRecord>> {
        let temperature_matches = truncate_web_reading(&self.web_temperature)?
            == truncate_stored_reading(self.store_temperature)?;
        let feels_like_matches = truncate_web_reading(&self.web_feels_like)?
            == truncate_stored_reading(self.store_feels_like)?;

        if temperature_matches && feels_like_matches {
            return Ok(None);
        }

        Ok(Some(DiscrepancyRecord {
            city: self.city.clone(),
            web_temperature_text: self.web_temperature.clone(),
            store_temperature_text: store_text(self.store_temperature),
            web_feels_like_text: self.web_feels_like.clone(),
            store_feels_like_text: store_text(self.store_feels_like),
        }))
    }
}

fn store_text(value: f64) -> String {
    format!("{} °C", format_reading(value))
}

/// One row of `weather_data`; `city` is the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
}

/// A (city, country) pair as listed in the input spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCountry {
    pub city: String,
    pub country: String,
}

impl CityCountry {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }

    /// `united-states/new-york` for ("New York", "United States").
    pub fn page_path(&self) -> String {
        format!("{}/{}", slug(&self.country), slug(&self.city))
    }
}

pub fn slug(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

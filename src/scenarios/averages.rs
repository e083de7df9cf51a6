use crate::api::{Lookup, WeatherClient};
use crate::db::{Boundary, Repository, WEATHER_TABLE};
use crate::error::Result;
use crate::models::round2;

pub const AVERAGE_COLUMNS: [&str; 3] = ["min_temp", "max_temp", "average_temp"];
const COLUMN_TYPE: &str = "FLOAT";

/// Store-wide maximum average after a city's values were written.
#[derive(Debug, Clone, PartialEq)]
pub struct HighestAverage {
    pub city: Option<String>,
    pub average: Option<f64>,
}

/// Writes min/max/average for `city` into columns added on demand, then
/// looks up the hottest average across the store. The row for `city` must
/// already exist; otherwise the updates touch nothing.
pub async fn highest_average_case(
    client: &WeatherClient,
    repository: &Repository,
    city: &str,
) -> Result<HighestAverage> {
    let response = client.current_weather(Lookup::ByName, city).await?;
    let temp_min = response.metric("temp_min")?;
    let temp_max = response.metric("temp_max")?;
    let average = round2((temp_min + temp_max) / 2.0);

    tracing::info!("(OpenWeather API) The Lowest Temperature in {} is {} °C", city, temp_min);
    tracing::info!("(OpenWeather API) The Highest Temperature in {} is {} °C", city, temp_max);
    tracing::info!("(OpenWeather API) The Average Temperature in {} is {} °C", city, average);

    for column in AVERAGE_COLUMNS {
        repository
            .add_column_if_absent(WEATHER_TABLE, column, COLUMN_TYPE)
            .await?;
    }

    for (column, value) in AVERAGE_COLUMNS.into_iter().zip([temp_min, temp_max, average]) {
        repository.set_field(city, column, value).await?;
    }

    let highest = HighestAverage {
        average: repository
            .aggregate_boundary(Boundary::Max, "average_temp")
            .await?,
        city: repository
            .city_at_boundary(Boundary::Max, "average_temp")
            .await?,
    };

    tracing::info!(
        "(DB) {:?} is the city with the highest average temperature, {:?}°C",
        highest.city,
        highest.average
    );
    Ok(highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_range(server: &MockServer, city: &str, min: f64, max: f64) {
        Mock::given(method("GET"))
            .and(query_param("q", city))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "main": {"temp": min, "feels_like": min, "temp_min": min, "temp_max": max}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn tracks_the_hottest_average() {
        let server = MockServer::start().await;
        mock_range(&server, "Oslo", 2.0, 6.0).await;
        mock_range(&server, "Cairo", 25.5, 34.5).await;
        let client = WeatherClient::new("k".to_string(), server.uri()).unwrap();
        let repository = Repository::in_memory().await.unwrap();
        repository.upsert_weather("Oslo", 4.0, 3.0).await.unwrap();
        repository.upsert_weather("Cairo", 30.0, 31.0).await.unwrap();

        let first = highest_average_case(&client, &repository, "Oslo").await.unwrap();
        assert_eq!(first.city.as_deref(), Some("Oslo"));
        assert_eq!(first.average, Some(4.0));

        let second = highest_average_case(&client, &repository, "Cairo").await.unwrap();
        assert_eq!(second.city.as_deref(), Some("Cairo"));
        assert_eq!(second.average, Some(30.0));

        for column in AVERAGE_COLUMNS {
            assert!(repository.column_exists(WEATHER_TABLE, column).await.unwrap());
        }
    }

    #[tokio::test]
    async fn city_without_row_leaves_store_empty() {
        let server = MockServer::start().await;
        mock_range(&server, "Lima", 15.0, 19.0).await;
        let client = WeatherClient::new("k".to_string(), server.uri()).unwrap();
        let repository = Repository::in_memory().await.unwrap();

        let highest = highest_average_case(&client, &repository, "Lima").await.unwrap();
        assert_eq!(highest, HighestAverage { city: None, average: None });
    }
}

use crate::api::{Lookup, WeatherClient, WeatherResponse};
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::WeatherRecord;

const EXPECTED_STATUS: u16 = 200;

pub async fn status_case(client: &WeatherClient, city: &str) -> Result<()> {
    let actual = client.current_weather(Lookup::ByName, city).await?.status_code();
    tracing::info!("Expected status code {}, actual {}", EXPECTED_STATUS, actual);
    if actual != EXPECTED_STATUS {
        return Err(AppError::Assertion(format!(
            "expected status {} for {}, got {}",
            EXPECTED_STATUS, city, actual
        )));
    }
    Ok(())
}

/// Fetch by name, store, and read the values back.
pub async fn city_weather_case(
    client: &WeatherClient,
    repository: &Repository,
    city: &str,
) -> Result<WeatherRecord> {
    let response = client.current_weather(Lookup::ByName, city).await?;
    verify_round_trip(repository, city, &response).await
}

/// Resolve the city id by name, then fetch by id, store, and read back.
pub async fn city_id_weather_case(
    client: &WeatherClient,
    repository: &Repository,
    city: &str,
) -> Result<WeatherRecord> {
    let city_id = client
        .current_weather(Lookup::ByName, city)
        .await?
        .city_id()?;
    tracing::info!("(OpenWeather API) The ID of {} is {}", city, city_id);

    let response = client
        .current_weather(Lookup::ById, &city_id.to_string())
        .await?;
    verify_round_trip(repository, city, &response).await
}

async fn verify_round_trip(
    repository: &Repository,
    city: &str,
    response: &WeatherResponse,
) -> Result<WeatherRecord> {
    let temperature = response.metric("temp")?;
    let feels_like = response.metric("feels_like")?;
    tracing::info!("(OpenWeather API) Temperature in {} is {} °C", city, temperature);
    tracing::info!("(OpenWeather API) Feels Like in {} is {} °C", city, feels_like);

    repository.ensure_schema().await?;
    repository.upsert_weather(city, temperature, feels_like).await?;

    let stored_temperature = repository.get_field(city, "temperature").await?;
    let stored_feels_like = repository.get_field(city, "feels_like").await?;
    tracing::info!("(DB) Temperature in {} is {:?} °C", city, stored_temperature);
    tracing::info!("(DB) Feels Like in {} is {:?} °C", city, stored_feels_like);

    expect_stored("temperature", temperature, stored_temperature)?;
    expect_stored("feels_like", feels_like, stored_feels_like)?;

    Ok(WeatherRecord {
        city: city.to_string(),
        temperature,
        feels_like,
    })
}

fn expect_stored(column: &str, written: f64, read: Option<f64>) -> Result<()> {
    match read {
        Some(value) if value == written => Ok(()),
        other => Err(AppError::Assertion(format!(
            "{} written as {} but read back as {:?}",
            column, written, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_city(server: &MockServer, key: &str, value: &str, temp: f64, feels_like: f64) {
        Mock::given(method("GET"))
            .and(query_param(key, value))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2988507,
                "main": {"temp": temp, "feels_like": feels_like}
            })))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new("k".to_string(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn status_case_requires_200() {
        let server = MockServer::start().await;
        mock_city(&server, "q", "Paris", 20.0, 19.0).await;
        Mock::given(method("GET"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(status_case(&client, "Paris").await.is_ok());
        assert!(matches!(
            status_case(&client, "Atlantis").await,
            Err(AppError::Assertion(_))
        ));
    }

    #[tokio::test]
    async fn city_weather_round_trips_through_store() {
        let server = MockServer::start().await;
        mock_city(&server, "q", "Paris", 20.456, 19.994).await;
        let repository = Repository::in_memory().await.unwrap();

        let record = city_weather_case(&client(&server), &repository, "Paris")
            .await
            .unwrap();
        assert_eq!(record.temperature, 20.46);
        assert_eq!(record.feels_like, 19.99);
        assert_eq!(
            repository.get_field("Paris", "temperature").await.unwrap(),
            Some(20.46)
        );
    }

    #[tokio::test]
    async fn city_id_case_fetches_by_id() {
        let server = MockServer::start().await;
        mock_city(&server, "q", "Paris", 1.0, 1.0).await;
        mock_city(&server, "id", "2988507", 7.25, 5.5).await;
        let repository = Repository::in_memory().await.unwrap();

        let record = city_id_weather_case(&client(&server), &repository, "Paris")
            .await
            .unwrap();
        assert_eq!(record.temperature, 7.25);
        assert_eq!(
            repository.get_field("Paris", "feels_like").await.unwrap(),
            Some(5.5)
        );
    }

    #[tokio::test]
    async fn missing_metric_fails_the_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;
        let repository = Repository::in_memory().await.unwrap();

        let err = city_weather_case(&client(&server), &repository, "Paris")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::KeyMissing(_)));
        assert_eq!(repository.row_count().await.unwrap(), 0);
    }

    #[test]
    fn stored_value_must_match_exactly() {
        assert!(expect_stored("temperature", 1.5, Some(1.5)).is_ok());
        assert!(expect_stored("temperature", 1.5, Some(1.51)).is_err());
        assert!(expect_stored("temperature", 1.5, None).is_err());
    }
}

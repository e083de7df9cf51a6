use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::round2;

const USER_AGENT: &str = "weather-qa/0.1";

/// How the provider should find the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    ByName,
    ById,
}

impl Lookup {
    pub fn query_param(self) -> &'static str {
        match self {
            Lookup::ByName => "q",
            Lookup::ById => "id",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CurrentWeather {
    id: Option<i64>,
    #[serde(default)]
    main: BTreeMap<String, Value>,
}

/// Status and body of a current-weather call. Non-2xx responses are kept
/// as-is; callers inspect `status_code` themselves.
#[derive(Debug, Clone)]
pub struct WeatherResponse {
    status: StatusCode,
    body: CurrentWeather,
}

impl WeatherResponse {
    pub fn from_body(status: StatusCode, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|e| {
            tracing::debug!("Response body is not current weather JSON: {}", e);
            CurrentWeather::default()
        });
        Self { status, body }
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn city_id(&self) -> Result<i64> {
        self.body
            .id
            .ok_or_else(|| AppError::KeyMissing("id".to_string()))
    }

    /// `main.<key>` rounded to two decimals.
    pub fn metric(&self, key: &str) -> Result<f64> {
        self.body
            .main
            .get(key)
            .and_then(Value::as_f64)
            .map(round2)
            .ok_or_else(|| AppError::KeyMissing(format!("main.{}", key)))
    }
}

pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    pub async fn current_weather(&self, lookup: Lookup, value: &str) -> Result<WeatherResponse> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                (lookup.query_param(), value),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::info!(lookup = lookup.query_param(), value, status = status.as_u16(), "current weather");

        let text = response.text().await?;
        Ok(WeatherResponse::from_body(status, &text))
    }
}

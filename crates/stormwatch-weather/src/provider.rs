//! OpenWeatherMap client for current conditions and the 3-hourly forecast.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{Condition, ForecastEntry, LocationQuery, WeatherError, WeatherSnapshot};

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
const DEFAULT_UNITS: &str = "imperial";

/// Read-only weather data source.
///
/// Both lookups are keyed by the same [`LocationQuery`]. A location the source
/// does not know is an error; an empty forecast is not.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for `query`.
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError>;

    /// Full forecast series for `query`, in source order.
    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastEntry>, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

impl From<ApiCondition> for Condition {
    fn from(c: ApiCondition) -> Self {
        Self {
            label: c.main,
            description: c.description,
            icon: c.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    main: ApiMain,
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ApiForecastItem {
    dt_txt: String,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    main: Option<ApiForecastMain>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ApiForecastItem>,
}

impl CurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("response has no weather condition".into()))?;

        Ok(WeatherSnapshot {
            city: self.name,
            condition: condition.into(),
            temperature: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
        })
    }
}

impl From<ApiForecastItem> for ForecastEntry {
    fn from(item: ApiForecastItem) -> Self {
        Self {
            timestamp: item.dt_txt,
            condition: item
                .weather
                .into_iter()
                .next()
                .map(Condition::from)
                .unwrap_or_default(),
            temperature: item.main.map(|m| m.temp),
        }
    }
}

/// HTTP client for the OpenWeatherMap 2.5 API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.into(),
            base_url: OPENWEATHER_API_BASE.to_string(),
            units: DEFAULT_UNITS.to_string(),
        })
    }

    /// Point the client at another host (self-hosted proxy, tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the `units` parameter (`imperial`, `metric` or `standard`)
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .query(&[("appid", self.api_key.as_str()), ("units", self.units.as_str())])
            .send()
            .await?;

        tracing::debug!("GET {} -> {}", url, response.status());
        self.handle_response(response, query).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else if status == StatusCode::NOT_FOUND {
            Err(WeatherError::LocationNotFound(query.to_string()))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(WeatherError::InvalidApiKey)
        } else if status.is_server_error() {
            Err(WeatherError::ServiceUnavailable(status.as_u16()))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(WeatherError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self), level = "info")]
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let body: CurrentResponse = self.get_json("weather", query).await?;
        body.into_snapshot()
    }

    #[instrument(skip(self), level = "info")]
    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body: ForecastResponse = self.get_json("forecast", query).await?;
        Ok(body.list.into_iter().map(ForecastEntry::from).collect())
    }
}

//! Host bridge client
//!
//! Calls the host-provided weather functions over HTTP. Every function is
//! invoked with a JSON payload at `{base_url}/invoke/{function}` and answers
//! with a tagged reply: `{"success": true, "<payload key>": ...}` or
//! `{"success": false, "error": "..."}`.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::source::{CityQuery, SourceError, WeatherSource};
use super::{AirQualitySnapshot, Coordinates, ForecastDay, HourlyEntry, WeatherSnapshot};

/// Message used when a failed reply carries no error text
const DEFAULT_FAILURE: &str = "Failed to fetch weather data";

/// Tagged reply returned by every bridge function
#[derive(Debug, Deserialize)]
struct BridgeReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, Value>,
}

impl BridgeReply {
    /// Extracts the payload stored under `key`, or the reported failure
    fn into_payload<T: DeserializeOwned>(mut self, key: &'static str) -> Result<T, SourceError> {
        if !self.success {
            return Err(SourceError::Remote(
                self.error.unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ));
        }

        let value = self
            .payload
            .remove(key)
            .filter(|v| !v.is_null())
            .ok_or(SourceError::MissingPayload(key))?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Client for the host bridge functions
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
}

impl BridgeClient {
    /// Create a client for the bridge at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke a bridge function and return its tagged reply
    async fn invoke(&self, function: &str, payload: Value) -> Result<BridgeReply, SourceError> {
        let url = format!("{}/invoke/{}", self.base_url, function);
        debug!("Invoking bridge function {}", function);

        let response = self.client.post(&url).json(&payload).send().await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl WeatherSource for BridgeClient {
    async fn current(&self, query: &CityQuery) -> Result<WeatherSnapshot, SourceError> {
        self.invoke(
            "getWeatherData",
            json!({
                "city": query.city,
                "units": query.units,
                "lang": query.lang,
            }),
        )
        .await?
        .into_payload("weather")
    }

    async fn forecast(&self, query: &CityQuery, days: usize) -> Result<Vec<ForecastDay>, SourceError> {
        self.invoke(
            "getExtendedForecast",
            json!({
                "city": query.city,
                "units": query.units,
                "days": days,
            }),
        )
        .await?
        .into_payload("forecast")
    }

    async fn hourly(&self, query: &CityQuery, hours: usize) -> Result<Vec<HourlyEntry>, SourceError> {
        self.invoke(
            "getHourlyForecast",
            json!({
                "city": query.city,
                "units": query.units,
                "hours": hours,
            }),
        )
        .await?
        .into_payload("hourly")
    }

    async fn air_quality(
        &self,
        query: &CityQuery,
        coordinates: Coordinates,
    ) -> Result<AirQualitySnapshot, SourceError> {
        self.invoke(
            "getAirQuality",
            json!({
                "city": query.city,
                "lat": coordinates.lat,
                "lon": coordinates.lon,
            }),
        )
        .await?
        .into_payload("airQuality")
    }

    async fn ask(
        &self,
        question: &str,
        current: Option<&WeatherSnapshot>,
        query: &CityQuery,
    ) -> Result<String, SourceError> {
        self.invoke(
            "askAIAssistant",
            json!({
                "question": question,
                "weatherData": current,
                "location": query.city,
            }),
        )
        .await?
        .into_payload("response")
    }
}

use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, check_status};

const SERVICE: &str = "Dark Sky";
const DARKSKY_API: &str = "https://api.darksky.net/forecast";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub data: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    pub summary: String,
    /// Unix seconds for the start of the forecast day.
    pub time: i64,
}

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DARKSKY_API.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Daily forecast for a coordinate pair. The key travels in the path,
    /// not the query string.
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, ProviderError> {
        let url = format!(
            "{}/{}/{},{}",
            self.base_url, self.api_key, latitude, longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        let response = check_status(SERVICE, response).await?;

        response
            .json()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })
    }
}

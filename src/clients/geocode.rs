use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, check_status};

const SERVICE: &str = "Geocoding";
const GEOCODE_API: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: GEOCODE_API.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ProviderError> {
        let url = format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
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

use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, check_status};

const SERVICE: &str = "Yelp";
const YELP_API: &str = "https://api.yelp.com/v3";

#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub businesses: Vec<BusinessItem>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessItem {
    pub name: String,
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YelpClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: YELP_API.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Business search around a location string. Yelp is the one provider
    /// that authenticates with a bearer header instead of a query key.
    pub async fn search(&self, location: &str) -> Result<BusinessSearchResponse, ProviderError> {
        let url = format!(
            "{}/businesses/search?location={}",
            self.base_url,
            urlencoding::encode(location)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
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

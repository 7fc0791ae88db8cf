use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, check_status};

const SERVICE: &str = "Eventbrite";
const EVENTBRITE_API: &str = "https://www.eventbriteapi.com/v3";

#[derive(Debug, Deserialize)]
pub struct EventSearchResponse {
    #[serde(default)]
    pub events: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
pub struct EventItem {
    pub url: String,
    pub name: EventName,
    pub start: EventStart,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventName {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EventStart {
    /// Local date-time of the event, e.g. "2021-06-05T19:30:00".
    pub local: String,
}

#[derive(Clone)]
pub struct EventsClient {
    client: Client,
    token: String,
    base_url: String,
}

impl EventsClient {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            base_url: EVENTBRITE_API.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search(&self, address: &str) -> Result<EventSearchResponse, ProviderError> {
        let url = format!(
            "{}/events/search?token={}&location.address={}",
            self.base_url,
            self.token,
            urlencoding::encode(address)
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

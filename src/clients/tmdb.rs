use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, check_status};

const SERVICE: &str = "TMDB";
const TMDB_API: &str = "https://api.themoviedb.org/3";

/// CDN prefix prepended to relative poster paths from TMDB.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500/";

#[derive(Debug, Deserialize)]
pub struct MovieSearchResponse {
    #[serde(default)]
    pub results: Vec<MovieItem>,
}

#[derive(Debug, Deserialize)]
pub struct MovieItem {
    pub title: String,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
}

#[derive(Clone)]
pub struct MovieClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MovieClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: TMDB_API.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search(&self, query: &str) -> Result<MovieSearchResponse, ProviderError> {
        let url = format!(
            "{}/search/movie?api_key={}&language=en-US&query={}&page=1&include_adult=false",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
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

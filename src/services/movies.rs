use sea_orm::Set;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{ServiceError, format_date_day};
use crate::clients::tmdb::{MovieClient, TMDB_IMAGE_BASE};
use crate::db::{ResourceCache, Store};
use crate::entities::movies;

pub struct MovieService {
    cache: ResourceCache<movies::Entity>,
    client: MovieClient,
}

#[derive(Debug, Serialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}

impl From<movies::Model> for Movie {
    fn from(m: movies::Model) -> Self {
        Self {
            title: m.title,
            overview: m.overview,
            average_votes: m.average_votes,
            image_url: m.image_url,
            popularity: m.popularity,
            released_on: m.released_on,
        }
    }
}

impl MovieService {
    #[must_use]
    pub fn new(store: &Store, client: MovieClient, ttl: Duration) -> Self {
        Self {
            cache: store.resources(ttl),
            client,
        }
    }

    pub async fn for_location(
        &self,
        location_id: i32,
        search_query: &str,
    ) -> Result<Vec<Movie>, ServiceError> {
        let cached = self.cache.fresh(location_id).await?;
        if !cached.is_empty() {
            debug!("Movies cache hit for location {}", location_id);
            return Ok(cached.into_iter().map(Movie::from).collect());
        }

        info!("Movies cache miss for location {}, searching", location_id);
        let response = self.client.search(search_query).await?;

        let fetched_at = chrono::Utc::now().to_rfc3339();
        let mut results = Vec::with_capacity(response.results.len());
        let mut rows = Vec::with_capacity(response.results.len());

        for item in response.results {
            let movie = Movie {
                title: item.title,
                overview: item.overview.unwrap_or_default(),
                average_votes: item.vote_average.unwrap_or_default(),
                image_url: item
                    .poster_path
                    .map(|p| format!("{TMDB_IMAGE_BASE}{}", p.trim_start_matches('/')))
                    .unwrap_or_default(),
                popularity: item.popularity.unwrap_or_default(),
                released_on: item
                    .release_date
                    .as_deref()
                    .map(format_date_day)
                    .unwrap_or_default(),
            };
            rows.push(movies::ActiveModel {
                title: Set(movie.title.clone()),
                overview: Set(movie.overview.clone()),
                average_votes: Set(movie.average_votes),
                image_url: Set(movie.image_url.clone()),
                popularity: Set(movie.popularity),
                released_on: Set(movie.released_on.clone()),
                location_id: Set(location_id),
                fetched_at: Set(fetched_at.clone()),
                ..Default::default()
            });
            results.push(movie);
        }

        self.cache.replace(location_id, rows).await?;
        Ok(results)
    }
}

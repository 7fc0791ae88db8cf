use sea_orm::Set;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{ServiceError, format_unix_day};
use crate::clients::darksky::WeatherClient;
use crate::db::{ResourceCache, Store};
use crate::entities::weathers;

pub struct WeatherService {
    cache: ResourceCache<weathers::Entity>,
    client: WeatherClient,
}

#[derive(Debug, Serialize)]
pub struct Forecast {
    pub forecast: String,
    pub time: String,
}

impl From<weathers::Model> for Forecast {
    fn from(m: weathers::Model) -> Self {
        Self {
            forecast: m.forecast,
            time: m.time,
        }
    }
}

impl WeatherService {
    #[must_use]
    pub fn new(store: &Store, client: WeatherClient, ttl: Duration) -> Self {
        Self {
            cache: store.resources(ttl),
            client,
        }
    }

    pub async fn for_location(
        &self,
        location_id: i32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Forecast>, ServiceError> {
        let cached = self.cache.fresh(location_id).await?;
        if !cached.is_empty() {
            debug!("Weather cache hit for location {}", location_id);
            return Ok(cached.into_iter().map(Forecast::from).collect());
        }

        info!("Weather cache miss for location {}, fetching", location_id);
        let response = self.client.forecast(latitude, longitude).await?;

        let fetched_at = chrono::Utc::now().to_rfc3339();
        let mut forecasts = Vec::with_capacity(response.daily.data.len());
        let mut rows = Vec::with_capacity(response.daily.data.len());

        for day in response.daily.data {
            let forecast = Forecast {
                forecast: day.summary,
                time: format_unix_day(day.time),
            };
            rows.push(weathers::ActiveModel {
                forecast: Set(forecast.forecast.clone()),
                time: Set(forecast.time.clone()),
                location_id: Set(location_id),
                fetched_at: Set(fetched_at.clone()),
                ..Default::default()
            });
            forecasts.push(forecast);
        }

        self.cache.replace(location_id, rows).await?;
        Ok(forecasts)
    }
}

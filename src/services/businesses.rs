use sea_orm::Set;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::ServiceError;
use crate::clients::yelp::YelpClient;
use crate::db::{ResourceCache, Store};
use crate::entities::yelps;

pub struct BusinessService {
    cache: ResourceCache<yelps::Entity>,
    client: YelpClient,
}

#[derive(Debug, Serialize)]
pub struct Business {
    pub name: String,
    pub image_url: String,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
}

impl From<yelps::Model> for Business {
    fn from(m: yelps::Model) -> Self {
        Self {
            name: m.name,
            image_url: m.image_url,
            price: m.price,
            rating: m.rating,
            url: m.url,
        }
    }
}

impl BusinessService {
    #[must_use]
    pub fn new(store: &Store, client: YelpClient, ttl: Duration) -> Self {
        Self {
            cache: store.resources(ttl),
            client,
        }
    }

    pub async fn for_location(
        &self,
        location_id: i32,
        search_query: &str,
    ) -> Result<Vec<Business>, ServiceError> {
        let cached = self.cache.fresh(location_id).await?;
        if !cached.is_empty() {
            debug!("Yelp cache hit for location {}", location_id);
            return Ok(cached.into_iter().map(Business::from).collect());
        }

        info!("Yelp cache miss for location {}, searching", location_id);
        let response = self.client.search(search_query).await?;

        let fetched_at = chrono::Utc::now().to_rfc3339();
        let mut results = Vec::with_capacity(response.businesses.len());
        let mut rows = Vec::with_capacity(response.businesses.len());

        for item in response.businesses {
            let business = Business {
                name: item.name,
                image_url: item.image_url,
                price: item.price,
                rating: item.rating,
                url: item.url,
            };
            rows.push(yelps::ActiveModel {
                name: Set(business.name.clone()),
                image_url: Set(business.image_url.clone()),
                price: Set(business.price.clone()),
                rating: Set(business.rating),
                url: Set(business.url.clone()),
                location_id: Set(location_id),
                fetched_at: Set(fetched_at.clone()),
                ..Default::default()
            });
            results.push(business);
        }

        self.cache.replace(location_id, rows).await?;
        Ok(results)
    }
}

use serde::Serialize;
use tracing::{debug, info};

use super::ServiceError;
use crate::clients::geocode::GeocodeClient;
use crate::db::LocationRepository;
use crate::entities::locations;

/// Resolves a raw search string to a stored location, geocoding on the
/// first miss. Locations are keyed by the search string itself rather
/// than a location id, and never expire once stored.
pub struct LocationService {
    repo: LocationRepository,
    client: GeocodeClient,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub id: i32,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<locations::Model> for Location {
    fn from(m: locations::Model) -> Self {
        Self {
            id: m.id,
            search_query: m.search_query,
            formatted_query: m.formatted_query,
            latitude: m.latitude,
            longitude: m.longitude,
        }
    }
}

impl LocationService {
    #[must_use]
    pub const fn new(repo: LocationRepository, client: GeocodeClient) -> Self {
        Self { repo, client }
    }

    pub async fn resolve(&self, query: &str) -> Result<Location, ServiceError> {
        if let Some(existing) = self.repo.find_by_query(query).await? {
            debug!("Location cache hit for '{}'", query);
            return Ok(existing.into());
        }

        info!("Location cache miss for '{}', geocoding", query);
        let response = self.client.geocode(query).await?;

        let Some(first) = response.results.into_iter().next() else {
            return Err(ServiceError::NotFound(format!(
                "no geocoding results for '{query}'"
            )));
        };

        let stored = self
            .repo
            .insert_or_get(
                query,
                &first.formatted_address,
                first.geometry.location.lat,
                first.geometry.location.lng,
            )
            .await?;

        Ok(stored.into())
    }
}

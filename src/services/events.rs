use sea_orm::Set;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{ServiceError, format_date_day};
use crate::clients::eventbrite::EventsClient;
use crate::db::{ResourceCache, Store};
use crate::entities::events;

pub struct EventService {
    cache: ResourceCache<events::Entity>,
    client: EventsClient,
}

#[derive(Debug, Serialize)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: String,
}

impl From<events::Model> for Event {
    fn from(m: events::Model) -> Self {
        Self {
            link: m.link,
            name: m.name,
            event_date: m.event_date,
            summary: m.summary,
        }
    }
}

impl EventService {
    #[must_use]
    pub fn new(store: &Store, client: EventsClient, ttl: Duration) -> Self {
        Self {
            cache: store.resources(ttl),
            client,
        }
    }

    pub async fn for_location(
        &self,
        location_id: i32,
        formatted_query: &str,
    ) -> Result<Vec<Event>, ServiceError> {
        let cached = self.cache.fresh(location_id).await?;
        if !cached.is_empty() {
            debug!("Events cache hit for location {}", location_id);
            return Ok(cached.into_iter().map(Event::from).collect());
        }

        info!("Events cache miss for location {}, searching", location_id);
        let response = self.client.search(formatted_query).await?;

        let fetched_at = chrono::Utc::now().to_rfc3339();
        let mut results = Vec::with_capacity(response.events.len());
        let mut rows = Vec::with_capacity(response.events.len());

        for item in response.events {
            let event = Event {
                link: item.url,
                name: item.name.text,
                event_date: format_date_day(&item.start.local),
                summary: item.summary.unwrap_or_default(),
            };
            rows.push(events::ActiveModel {
                link: Set(event.link.clone()),
                name: Set(event.name.clone()),
                event_date: Set(event.event_date.clone()),
                summary: Set(event.summary.clone()),
                location_id: Set(location_id),
                fetched_at: Set(fetched_at.clone()),
                ..Default::default()
            });
            results.push(event);
        }

        self.cache.replace(location_id, rows).await?;
        Ok(results)
    }
}

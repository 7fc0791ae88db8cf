//! Repository-level tests for the cache-aside store: location
//! insert-or-ignore semantics, TTL expiry, and replace-not-append.

use cityscout::db::{ResourceCache, Store};
use cityscout::entities::{prelude::*, weathers};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use std::time::Duration;

async fn memory_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open in-memory store")
}

fn weather_row(location_id: i32, forecast: &str, fetched_at: &str) -> weathers::ActiveModel {
    weathers::ActiveModel {
        forecast: Set(forecast.to_string()),
        time: Set("Fri Jan 01 2021".to_string()),
        location_id: Set(location_id),
        fetched_at: Set(fetched_at.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn location_insert_is_idempotent_per_query() {
    let store = memory_store().await;
    let repo = store.locations();

    let first = repo
        .insert_or_get("Seattle", "Seattle, WA, USA", 47.6, -122.3)
        .await
        .unwrap();
    let second = repo
        .insert_or_get("Seattle", "Somewhere Else", 0.0, 0.0)
        .await
        .unwrap();

    // The conflicting save returns the original row, not a new one.
    assert_eq!(first.id, second.id);
    assert_eq!(second.formatted_query, "Seattle, WA, USA");

    let count = Locations::find().count(&store.conn).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn location_lookup_is_keyed_by_search_query() {
    let store = memory_store().await;
    let repo = store.locations();

    repo.insert_or_get("Seattle", "Seattle, WA, USA", 47.6, -122.3)
        .await
        .unwrap();

    let hit = repo.find_by_query("Seattle").await.unwrap();
    assert!(hit.is_some());
    assert_eq!(hit.unwrap().latitude, 47.6);

    let miss = repo.find_by_query("Tacoma").await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn replace_swaps_rows_instead_of_appending() {
    let store = memory_store().await;
    let location = store
        .locations()
        .insert_or_get("Seattle", "Seattle, WA, USA", 47.6, -122.3)
        .await
        .unwrap();

    let cache: ResourceCache<weathers::Entity> = store.resources(Duration::from_secs(150));
    let now = chrono::Utc::now().to_rfc3339();

    cache
        .replace(
            location.id,
            vec![
                weather_row(location.id, "Clear", &now),
                weather_row(location.id, "Rain", &now),
            ],
        )
        .await
        .unwrap();

    cache
        .replace(location.id, vec![weather_row(location.id, "Snow", &now)])
        .await
        .unwrap();

    let rows = Weathers::find().all(&store.conn).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].forecast, "Snow");
}

#[tokio::test]
async fn replace_with_empty_set_clears_the_location() {
    let store = memory_store().await;
    let location = store
        .locations()
        .insert_or_get("Seattle", "Seattle, WA, USA", 47.6, -122.3)
        .await
        .unwrap();

    let cache: ResourceCache<weathers::Entity> = store.resources(Duration::from_secs(150));
    let now = chrono::Utc::now().to_rfc3339();

    cache
        .replace(location.id, vec![weather_row(location.id, "Clear", &now)])
        .await
        .unwrap();
    cache.replace(location.id, vec![]).await.unwrap();

    let count = Weathers::find().count(&store.conn).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn fresh_honors_ttl_and_location_scope() {
    let store = memory_store().await;
    let repo = store.locations();
    let seattle = repo
        .insert_or_get("Seattle", "Seattle, WA, USA", 47.6, -122.3)
        .await
        .unwrap();
    let tacoma = repo
        .insert_or_get("Tacoma", "Tacoma, WA, USA", 47.2, -122.4)
        .await
        .unwrap();

    let cache: ResourceCache<weathers::Entity> = store.resources(Duration::from_secs(150));
    let now = chrono::Utc::now().to_rfc3339();
    let stale = (chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339();

    cache
        .replace(seattle.id, vec![weather_row(seattle.id, "Clear", &now)])
        .await
        .unwrap();
    cache
        .replace(tacoma.id, vec![weather_row(tacoma.id, "Fog", &stale)])
        .await
        .unwrap();

    let fresh_seattle = cache.fresh(seattle.id).await.unwrap();
    assert_eq!(fresh_seattle.len(), 1);
    assert_eq!(fresh_seattle[0].forecast, "Clear");

    // Tacoma's rows are past the TTL: reported as a miss and purged.
    let fresh_tacoma = cache.fresh(tacoma.id).await.unwrap();
    assert!(fresh_tacoma.is_empty());

    let remaining = Weathers::find()
        .filter(weathers::Column::LocationId.eq(tacoma.id))
        .count(&store.conn)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    // Seattle's fresh rows are untouched by the purge.
    let kept = Weathers::find()
        .filter(weathers::Column::LocationId.eq(seattle.id))
        .count(&store.conn)
        .await
        .unwrap();
    assert_eq!(kept, 1);
}

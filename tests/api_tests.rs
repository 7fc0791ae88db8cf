//! End-to-end tests driving the router against an in-memory store, with
//! the provider HTTP boundaries mocked out.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cityscout::config::Config;
use http_body_util::BodyExt;
use sea_orm::{EntityTrait, PaginatorTrait};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(mock_uri: &str) -> Config {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory db.
    config.general.max_db_connections = 1;

    let providers = &mut config.providers;
    providers.geocode_api_key = "geocode-key".to_string();
    providers.geocode_base_url = Some(format!("{mock_uri}/maps/api/geocode/json"));
    providers.weather_api_key = "weather-key".to_string();
    providers.weather_base_url = Some(format!("{mock_uri}/forecast"));
    providers.events_api_key = "events-key".to_string();
    providers.events_base_url = Some(format!("{mock_uri}/v3"));
    providers.movie_api_key = "movie-key".to_string();
    providers.movie_base_url = Some(format!("{mock_uri}/3"));
    providers.yelp_api_key = "yelp-key".to_string();
    providers.yelp_base_url = Some(format!("{mock_uri}/yelp/v3"));

    config
}

async fn spawn_app(config: Config) -> (Arc<cityscout::api::AppState>, Router) {
    let state = cityscout::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    let router = cityscout::api::router(state.clone());
    (state, router)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn seattle_geocode_body() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "formatted_address": "Seattle, WA, USA",
            "geometry": { "location": { "lat": 47.6, "lng": -122.3 } }
        }]
    })
}

/// Resolve "Seattle" through the mocked geocoder and return its stored id.
async fn seed_location(app: &Router, mock: &MockServer) -> i64 {
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_geocode_body()))
        .mount(mock)
        .await;

    let (status, body) = get_json(app, "/location?data=Seattle").await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().expect("location id")
}

#[tokio::test]
async fn location_end_to_end_with_cache_hit_precedence() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Seattle"))
        .and(query_param("key", "geocode-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_geocode_body()))
        .expect(1)
        .mount(&mock)
        .await;

    let (_state, app) = spawn_app(test_config(&mock.uri())).await;

    let (status, body) = get_json(&app, "/location?data=Seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["search_query"], "Seattle");
    assert_eq!(body["data"]["formatted_query"], "Seattle, WA, USA");
    assert_eq!(body["data"]["latitude"], 47.6);
    assert_eq!(body["data"]["longitude"], -122.3);
    let id = body["data"]["id"].as_i64().expect("generated id");

    // Second request is served from the store; expect(1) on the mock
    // verifies the geocoder saw exactly one call.
    let (status, body) = get_json(&app, "/location?data=Seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn location_with_no_geocode_results_is_not_found() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
        )
        .mount(&mock)
        .await;

    let (_state, app) = spawn_app(test_config(&mock.uri())).await;

    let (status, body) = get_json(&app, "/location?data=Nowhereville").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn blank_location_query_is_rejected() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;

    let (status, body) = get_json(&app, "/location?data=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn missing_weather_params_are_rejected() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;

    let (status, _body) = get_json(&app, "/weather").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_miss_fetches_once_then_hits_cache() {
    let mock = MockServer::start().await;
    let (state, app) = spawn_app(test_config(&mock.uri())).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/forecast/weather-key/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": { "data": [
                { "summary": "Clear throughout the day.", "time": 1_609_459_200 },
                { "summary": "Rain in the evening.", "time": 1_609_545_600 }
            ]}
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let uri = format!("/weather?id={id}&latitude=47.6&longitude=-122.3");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["forecast"], "Clear throughout the day.");
    assert_eq!(body["data"][0]["time"], "Fri Jan 01 2021");
    assert_eq!(body["data"][1]["time"], "Sat Jan 02 2021");

    // Second request: same payload, no second provider call.
    let (status, cached) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached["data"], body["data"]);

    let stored = cityscout::entities::prelude::Weathers::find()
        .count(&state.store.conn)
        .await
        .unwrap();
    assert_eq!(stored, 2);
}

#[tokio::test]
async fn weather_refresh_replaces_cached_rows() {
    let mock = MockServer::start().await;
    let mut config = test_config(&mock.uri());
    // Zero TTL: every request refetches, exercising the replace path.
    config.cache.weather_ttl_seconds = 0;
    let (state, app) = spawn_app(config).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/forecast/weather-key/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": { "data": [
                { "summary": "Clear", "time": 1_609_459_200 },
                { "summary": "Rain", "time": 1_609_545_600 }
            ]}
        })))
        .expect(2)
        .mount(&mock)
        .await;

    let uri = format!("/weather?id={id}&latitude=47.6&longitude=-122.3");
    get_json(&app, &uri).await;
    get_json(&app, &uri).await;

    // The refetched set replaced the old one instead of piling up.
    let stored = cityscout::entities::prelude::Weathers::find()
        .count(&state.store.conn)
        .await
        .unwrap();
    assert_eq!(stored, 2);
}

#[tokio::test]
async fn events_are_normalized_and_cached() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/v3/events/search"))
        .and(query_param("token", "events-key"))
        .and(query_param("location.address", "Seattle, WA, USA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [{
                "url": "https://example.com/concert",
                "name": { "text": "Summer Concert" },
                "start": { "local": "2021-06-05T19:30:00" },
                "summary": "Live music on the pier"
            }]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let uri = format!("/events?id={id}&formatted_query=Seattle%2C%20WA%2C%20USA");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let event = &body["data"][0];
    assert_eq!(event["link"], "https://example.com/concert");
    assert_eq!(event["name"], "Summer Concert");
    assert_eq!(event["event_date"], "Sat Jun 05 2021");
    assert_eq!(event["summary"], "Live music on the pier");

    // Internal columns never leak into the response.
    let keys = event.as_object().unwrap();
    assert!(!keys.contains_key("id"));
    assert!(!keys.contains_key("location_id"));
    assert!(!keys.contains_key("fetched_at"));

    // Cache hit has the identical shape.
    let (status, cached) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cached["data"], body["data"]);
}

#[tokio::test]
async fn movies_prefix_poster_paths_and_truncate_dates() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("api_key", "movie-key"))
        .and(query_param("query", "Seattle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "title": "Sleepless in Seattle",
                "overview": "A widower's son calls a radio show.",
                "vote_average": 6.8,
                "poster_path": "/afkYP15OeUOD0tFEmj6VvejuOcz.jpg",
                "popularity": 12.7,
                "release_date": "1993-06-25"
            }]
        })))
        .mount(&mock)
        .await;

    let uri = format!("/movies?id={id}&search_query=Seattle");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let movie = &body["data"][0];
    assert_eq!(movie["title"], "Sleepless in Seattle");
    assert_eq!(
        movie["image_url"],
        "https://image.tmdb.org/t/p/w500/afkYP15OeUOD0tFEmj6VvejuOcz.jpg"
    );
    assert_eq!(movie["released_on"], "Fri Jun 25 1993");
    assert_eq!(movie["average_votes"], 6.8);
}

#[tokio::test]
async fn yelp_uses_bearer_auth_and_passes_fields_through() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/yelp/v3/businesses/search"))
        .and(query_param("location", "Seattle"))
        .and(header("authorization", "Bearer yelp-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "businesses": [{
                "name": "Pike Place Chowder",
                "image_url": "https://example.com/chowder.jpg",
                "price": "$$",
                "rating": 4.5,
                "url": "https://yelp.com/biz/pike-place-chowder"
            }]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let uri = format!("/yelp?id={id}&search_query=Seattle");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let business = &body["data"][0];
    assert_eq!(business["name"], "Pike Place Chowder");
    assert_eq!(business["price"], "$$");
    assert_eq!(business["rating"], 4.5);
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let mock = MockServer::start().await;
    let (_state, app) = spawn_app(test_config(&mock.uri())).await;
    let id = seed_location(&app, &mock).await;

    Mock::given(method("GET"))
        .and(path("/forecast/weather-key/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock)
        .await;

    let uri = format!("/weather?id={id}&latitude=47.6&longitude=-122.3");
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("service is unavailable")
    );
}

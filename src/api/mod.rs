use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod error;
mod types;

pub mod events;
pub mod location;
pub mod movies;
pub mod weather;
pub mod yelp;

pub use error::ApiError;
pub use types::ApiResponse;

use crate::clients::darksky::WeatherClient;
use crate::clients::eventbrite::EventsClient;
use crate::clients::geocode::GeocodeClient;
use crate::clients::tmdb::MovieClient;
use crate::clients::yelp::YelpClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    BusinessService, EventService, LocationService, MovieService, WeatherService,
};

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub locations: LocationService,

    pub weather: WeatherService,

    pub events: EventService,

    pub movies: MovieService,

    pub businesses: BusinessService,
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let http = crate::clients::build_http_client(config.providers.request_timeout_seconds)?;
    let providers = &config.providers;

    let mut geocode = GeocodeClient::new(http.clone(), providers.geocode_api_key.clone());
    if let Some(url) = &providers.geocode_base_url {
        geocode = geocode.with_base_url(url.as_str());
    }

    let mut darksky = WeatherClient::new(http.clone(), providers.weather_api_key.clone());
    if let Some(url) = &providers.weather_base_url {
        darksky = darksky.with_base_url(url.as_str());
    }

    let mut eventbrite = EventsClient::new(http.clone(), providers.events_api_key.clone());
    if let Some(url) = &providers.events_base_url {
        eventbrite = eventbrite.with_base_url(url.as_str());
    }

    let mut tmdb = MovieClient::new(http.clone(), providers.movie_api_key.clone());
    if let Some(url) = &providers.movie_base_url {
        tmdb = tmdb.with_base_url(url.as_str());
    }

    let mut yelp = YelpClient::new(http, providers.yelp_api_key.clone());
    if let Some(url) = &providers.yelp_base_url {
        yelp = yelp.with_base_url(url.as_str());
    }

    let cache = &config.cache;

    Ok(Arc::new(AppState {
        locations: LocationService::new(store.locations(), geocode),
        weather: WeatherService::new(
            &store,
            darksky,
            Duration::from_secs(cache.weather_ttl_seconds),
        ),
        events: EventService::new(
            &store,
            eventbrite,
            Duration::from_secs(cache.events_ttl_seconds),
        ),
        movies: MovieService::new(&store, tmdb, Duration::from_secs(cache.movies_ttl_seconds)),
        businesses: BusinessService::new(
            &store,
            yelp,
            Duration::from_secs(cache.yelp_ttl_seconds),
        ),
        store,
        config,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/location", get(location::get_location))
        .route("/weather", get(weather::get_weather))
        .route("/events", get(events::get_events))
        .route("/movies", get(movies::get_movies))
        .route("/yelp", get(yelp::get_yelps))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

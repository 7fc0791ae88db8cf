use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::weather::Forecast;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    /// Location id from a previous `/location` response.
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ApiResponse<Vec<Forecast>>>, ApiError> {
    let forecasts = state
        .weather
        .for_location(query.id, query.latitude, query.longitude)
        .await?;
    Ok(Json(ApiResponse::success(forecasts)))
}

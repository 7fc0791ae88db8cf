use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::location::Location;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Raw search string, e.g. `?data=Seattle`.
    pub data: String,
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Location>>, ApiError> {
    let search = query.data.trim();
    if search.is_empty() {
        return Err(ApiError::validation("data query parameter is required"));
    }

    let location = state.locations.resolve(search).await?;
    Ok(Json(ApiResponse::success(location)))
}

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::businesses::Business;

#[derive(Debug, Deserialize)]
pub struct YelpQuery {
    pub id: i32,
    pub search_query: String,
}

pub async fn get_yelps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YelpQuery>,
) -> Result<Json<ApiResponse<Vec<Business>>>, ApiError> {
    if query.search_query.trim().is_empty() {
        return Err(ApiError::validation(
            "search_query query parameter is required",
        ));
    }

    let businesses = state
        .businesses
        .for_location(query.id, query.search_query.trim())
        .await?;
    Ok(Json(ApiResponse::success(businesses)))
}

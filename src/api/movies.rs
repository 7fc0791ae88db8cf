use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::movies::Movie;

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    pub id: i32,
    /// Original search string from the `/location` response.
    pub search_query: String,
}

pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MoviesQuery>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    if query.search_query.trim().is_empty() {
        return Err(ApiError::validation(
            "search_query query parameter is required",
        ));
    }

    let movies = state
        .movies
        .for_location(query.id, query.search_query.trim())
        .await?;
    Ok(Json(ApiResponse::success(movies)))
}

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ApiError, ApiResponse, AppState};
use crate::services::events::Event;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub id: i32,
    /// Provider-normalized address from the `/location` response.
    pub formatted_query: String,
}

pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    if query.formatted_query.trim().is_empty() {
        return Err(ApiError::validation(
            "formatted_query query parameter is required",
        ));
    }

    let events = state
        .events
        .for_location(query.id, query.formatted_query.trim())
        .await?;
    Ok(Json(ApiResponse::success(events)))
}

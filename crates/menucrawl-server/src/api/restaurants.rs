use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use menucrawl_core::{DataSource, RestaurantsEnvelope, SearchParams, SearchRequest};
use menucrawl_scraper::collect_restaurants;
use serde::Serialize;

use crate::middleware::RequestId;

use super::AppState;

/// Body returned when a run fails. The cause is logged, never exposed.
#[derive(Debug, Serialize)]
pub(super) struct ScrapeFailure {
    error: &'static str,
}

impl ScrapeFailure {
    const MESSAGE: &'static str = "Failed to scrape data";
}

impl IntoResponse for ScrapeFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub(super) async fn search_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<RestaurantsEnvelope>, ScrapeFailure> {
    let request = SearchRequest::from_params(&params);
    tracing::debug!(
        request_id = %req_id.0,
        location = request.location(),
        query = request.query(),
        "restaurant search requested"
    );

    // Synthetic answers never touch the browser and need no serialization.
    let _guard = match state.data_source {
        DataSource::Synthetic => None,
        DataSource::Live | DataSource::Fallback => Some(state.run_lock.lock().await),
    };

    match collect_restaurants(&state.pipeline, state.data_source, &request).await {
        Ok(restaurants) => Ok(Json(RestaurantsEnvelope { restaurants })),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "restaurant search failed");
            Err(ScrapeFailure {
                error: ScrapeFailure::MESSAGE,
            })
        }
    }
}

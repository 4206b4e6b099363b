use crate::api::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rating::RatingOutcome;

/// Browsers keep it 5 minutes, shared caches 30
pub const FRESH_CACHE_CONTROL: &str =
    "public, max-age=300, s-maxage=1800, stale-while-revalidate=300";

/// Stale fallbacks must not be retained downstream
pub const STALE_CACHE_CONTROL: &str = "no-store";

/// GET /api/google-rating
pub async fn get_rating(State(state): State<AppState>) -> Response {
    match state.rating_service.get_rating().await {
        RatingOutcome::Fresh(payload) => {
            ([(header::CACHE_CONTROL, FRESH_CACHE_CONTROL)], Json(payload)).into_response()
        }
        RatingOutcome::Stale(payload) => {
            ([(header::CACHE_CONTROL, STALE_CACHE_CONTROL)], Json(payload)).into_response()
        }
        RatingOutcome::Failed(e) => match e.status_code() {
            Some(status) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::places_api_error(status)),
            )
                .into_response(),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::server_error()),
            )
                .into_response(),
        },
    }
}

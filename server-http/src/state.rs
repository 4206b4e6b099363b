use rating::RatingService;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rating_service: Arc<RatingService>,
}

impl AppState {
    pub fn new(rating_service: Arc<RatingService>) -> Self {
        Self { rating_service }
    }
}

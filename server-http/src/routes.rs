use crate::handlers;
use crate::middleware::{cors_middleware, AllowedOrigin};
use crate::state::AppState;
use axum::{middleware, routing::get, Router};
use shared::config::Config;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        // Health check
        .route("/", get(handlers::health_check))
        // Rating proxy
        .route("/api/google-rating", get(handlers::get_rating))
        .with_state(state);

    let router = match AllowedOrigin::from_config(config.front_origin.as_deref()) {
        Some(origin) => {
            info!("CORS enabled for origin {:?}", origin.0);
            router.layer(middleware::from_fn_with_state(origin, cors_middleware))
        }
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

use places_client::{GooglePlacesClient, PlacesClientConfig};
use rating::RatingService;
use server_http::{build_router, AppState};
use shared::config::Config;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so RUST_LOG from it is honoured
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting rating proxy...");

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    let places = GooglePlacesClient::new(PlacesClientConfig::from(&config))?;
    let rating_service = Arc::new(RatingService::new(Arc::new(places), config.cache_ttl));
    info!("Rating cache TTL: {:?}", config.cache_ttl);

    let router = build_router(AppState::new(rating_service), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on :{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C listener unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM listener unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = sigterm => "SIGTERM",
    };
    info!("{} received, draining in-flight requests", signal);
}

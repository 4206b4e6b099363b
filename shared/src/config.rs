use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub place_id: String,
    pub api_key: String,
    pub front_origin: Option<String>,
    pub cache_ttl: Duration,
    pub places_base_url: String,
    pub places_timeout: Duration,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 10000;
    const DEFAULT_TTL_MINUTES: f64 = 30.0;
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let place_id = var("GOOGLE_PLACE_ID").unwrap_or_default();
        let api_key = var("GOOGLE_MAPS_API_KEY").unwrap_or_default();
        if place_id.is_empty() || api_key.is_empty() {
            warn!("Missing env vars: GOOGLE_PLACE_ID and/or GOOGLE_MAPS_API_KEY");
        }

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("PORT={} is not a valid port, using {}", raw, Self::DEFAULT_PORT);
                Self::DEFAULT_PORT
            }),
            None => Self::DEFAULT_PORT,
        };

        let cache_ttl = match var("CACHE_TTL_MINUTES") {
            Some(raw) => match raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|m| Duration::try_from_secs_f64(m * 60.0).ok())
            {
                Some(ttl) => ttl,
                None => {
                    warn!(
                        "CACHE_TTL_MINUTES={} is invalid, using {}",
                        raw,
                        Self::DEFAULT_TTL_MINUTES
                    );
                    Self::default_ttl()
                }
            },
            None => Self::default_ttl(),
        };

        let timeout_secs = match var("PLACES_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "PLACES_TIMEOUT_SECS={} is invalid, using {}",
                    raw,
                    Self::DEFAULT_TIMEOUT_SECS
                );
                Self::DEFAULT_TIMEOUT_SECS
            }),
            None => Self::DEFAULT_TIMEOUT_SECS,
        };

        Self {
            host: var("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port,
            place_id,
            api_key,
            front_origin: var("FRONT_ORIGIN").map(|o| o.trim().to_string()),
            cache_ttl,
            places_base_url: var("PLACES_API_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_PLACES_BASE_URL.to_string()),
            places_timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn default_ttl() -> Duration {
        Duration::from_secs_f64(Self::DEFAULT_TTL_MINUTES * 60.0)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

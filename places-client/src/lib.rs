use async_trait::async_trait;
use rating::{PlaceDetails, PlacesApi};
use reqwest::{Client, Url};
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Only the fields the proxy serves are requested
pub const FIELD_MASK: &str = "rating,userRatingCount,googleMapsUri";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

#[derive(Debug, Clone)]
pub struct PlacesClientConfig {
    pub base_url: String,
    pub place_id: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl From<&shared::config::Config> for PlacesClientConfig {
    fn from(config: &shared::config::Config) -> Self {
        Self {
            base_url: config.places_base_url.clone(),
            place_id: config.place_id.clone(),
            api_key: config.api_key.clone(),
            timeout: config.places_timeout,
        }
    }
}

/// Places API (New) v1 client for a single place
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesClientConfig,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// `{base}/v1/places/{place_id}` with the id encoded as one path segment
    fn place_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", self.config.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .push("v1")
            .push("places")
            .push(&self.config.place_id);

        Ok(url)
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn fetch_place(&self) -> Result<PlaceDetails> {
        let url = self.place_url()?;
        debug!("GET {}", url.path());

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Diagnostic only; an unreadable body is not an error of its own
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| Error::Decode(e.to_string()))
    }
}

use crate::domain::PlaceDetails;
use async_trait::async_trait;
use shared::Result;

// Ports are the pluggable extension points for the upstream place lookup

/// Port for fetching the configured place from the upstream Places service.
/// The place identifier and credential belong to the implementation.
#[async_trait]
pub trait PlacesApi: Send + Sync + 'static {
    async fn fetch_place(&self) -> Result<PlaceDetails>;
}

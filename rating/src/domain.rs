use serde::{Deserialize, Serialize};

/// Client-facing rating shape. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPayload {
    pub rating: Option<f64>,
    pub count: Option<u64>,
    pub url: Option<String>,
}

/// Subset of a Places API (New) place resource
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceDetails {
    pub rating: Option<f64>,
    pub user_rating_count: Option<u64>,
    pub google_maps_uri: Option<String>,
}

impl From<PlaceDetails> for RatingPayload {
    fn from(place: PlaceDetails) -> Self {
        Self {
            rating: place.rating,
            count: place.user_rating_count,
            url: place.google_maps_uri,
        }
    }
}

/// Result of a single GetRating call
#[derive(Debug)]
pub enum RatingOutcome {
    /// Served from a fresh cache entry or a successful upstream fetch
    Fresh(RatingPayload),
    /// Upstream failed; last known payload served instead
    Stale(RatingPayload),
    /// Upstream failed and nothing was cached
    Failed(shared::Error),
}

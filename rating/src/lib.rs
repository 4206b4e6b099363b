pub mod cache;
pub mod domain;
pub mod ports;
pub mod service;

pub use cache::CacheSlot;
pub use domain::{PlaceDetails, RatingOutcome, RatingPayload};
pub use ports::PlacesApi;
pub use service::RatingService;

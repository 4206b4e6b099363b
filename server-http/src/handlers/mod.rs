pub mod google_rating;
pub mod health;

pub use google_rating::get_rating;
pub use health::health_check;

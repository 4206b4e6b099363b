use serde::Serialize;

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Upstream answered with a non-success status
    pub fn places_api_error(status: u16) -> Self {
        Self {
            error: "places_api_error",
            status: Some(status),
        }
    }

    pub fn server_error() -> Self {
        Self {
            error: "server_error",
            status: None,
        }
    }
}

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// The single origin allowed to call the API from a browser
#[derive(Clone, Debug)]
pub struct AllowedOrigin(pub HeaderValue);

impl AllowedOrigin {
    /// `None` when no origin is configured or it is not a valid header value
    pub fn from_config(origin: Option<&str>) -> Option<Self> {
        let origin = origin?;
        match HeaderValue::from_str(origin) {
            Ok(value) => Some(Self(value)),
            Err(_) => {
                warn!("FRONT_ORIGIN={:?} is not a valid header value, CORS disabled", origin);
                None
            }
        }
    }
}

/// CORS middleware for a single allowed origin.
///
/// Preflights never reach the handlers.
pub async fn cors_middleware(
    State(origin): State<AllowedOrigin>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.0);
        return response;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.0);
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    response
}

// Response decoration and request tracing

use axum::http::{header, HeaderMap, HeaderValue, Response};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS, PUT, PATCH, DELETE";
/// Preflight results may be cached for 24 hours
pub const CORS_MAX_AGE_SECS: &str = "86400";

/// Permissive CORS headers attached to every response
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(CORS_MAX_AGE_SECS),
    );
    headers
}

/// `map_response` middleware stamping the CORS headers on a response
pub async fn apply_cors_headers<B>(mut response: Response<B>) -> Response<B> {
    let response_headers = response.headers_mut();
    for (name, value) in cors_headers().iter() {
        response_headers.insert(name.clone(), value.clone());
    }
    response
}

/// Tracing middleware
///
/// Logs method, path, status and latency for every request.
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

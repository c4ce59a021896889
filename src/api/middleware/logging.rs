//! Request logging with header redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers worth a log line, and whether their value must be hidden
const LOGGED_HEADERS: [(&str, bool); 7] = [
    ("content-type", false),
    ("content-length", false),
    ("user-agent", false),
    ("x-forwarded-for", false),
    ("x-real-ip", false),
    ("authorization", true),
    ("cookie", true),
];

/// Log one line when a request arrives and one when it is answered.
///
/// `TraceLayer` owns the span; this middleware only adds events to it.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = route_of(&request);
    let request_id = request_id(request.headers());

    info!(
        method = %method,
        route = %route,
        uri = %request.uri(),
        request_id = %request_id,
        headers = %loggable_headers(request.headers()),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_client_error() {
        warn!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            request_id = %request_id,
            "Request rejected"
        );
    } else {
        info!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

/// Route template such as `/group/{id}/operation/`, or the raw path when
/// nothing matched
fn route_of(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn loggable_headers(headers: &HeaderMap) -> String {
    LOGGED_HEADERS
        .iter()
        .filter_map(|(name, secret)| {
            let value = headers.get(*name)?;
            let shown = if *secret {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            Some(format!("{}={}", name, shown))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loggable_headers_redacts_credentials() {
        let request = Request::builder()
            .header("content-type", "application/json")
            .header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .header("etag", "abc")
            .body(Body::empty())
            .unwrap();

        let logged = loggable_headers(request.headers());
        assert_eq!(
            logged,
            "content-type=application/json, authorization=[REDACTED]"
        );
    }

    #[test]
    fn test_loggable_headers_empty() {
        assert_eq!(loggable_headers(&HeaderMap::new()), "");
    }

    #[test]
    fn test_request_id_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "req-1".parse().unwrap());
        assert_eq!(request_id(&headers), "req-1");

        assert_eq!(request_id(&HeaderMap::new()).len(), 36);
    }

    #[test]
    fn test_route_of_falls_back_to_path() {
        let request = Request::builder()
            .uri("/group/7/chat/?user=alice")
            .body(Body::empty())
            .unwrap();

        assert_eq!(route_of(&request), "/group/7/chat/");
    }
}

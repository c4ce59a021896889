//! Debug-mode enrichment of server error responses
//!
//! When enabled, a 500 response body gets the `path`, the query `params` and
//! the JSON `body` of the request that caused it.

use std::collections::BTreeMap;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Query,
    http::{header, Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tracing::warn;

use crate::api::types::ApiError;

/// Largest request or response body kept for enrichment (1 MiB)
pub const MAX_CAPTURED_BODY: usize = 1024 * 1024;

pub async fn diagnostics_middleware(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let params = query_params(request.uri());

    let (parts, body) = request.into_parts();
    let captured = match to_bytes(body, MAX_CAPTURED_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::bad_request("request body is too large").into_response(),
    };
    let request = Request::from_parts(parts, Body::from(captured.clone()));

    let response = next.run(request).await;

    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }

    enrich(response, path, params, &captured).await
}

async fn enrich(response: Response, path: String, params: Value, captured: &Bytes) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, MAX_CAPTURED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Could not buffer error response for diagnostics");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    fields.insert("path".to_string(), Value::String(path));
    fields.insert("params".to_string(), params);
    fields.insert("body".to_string(), request_body(captured));

    match serde_json::to_vec(&fields) {
        Ok(enriched) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(enriched))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

/// Query string as a JSON object
pub(crate) fn query_params(uri: &Uri) -> Value {
    let params = Query::<BTreeMap<String, String>>::try_from_uri(uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    Value::Object(
        params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    )
}

fn request_body(captured: &Bytes) -> Value {
    if captured.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(captured)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(captured).into_owned()))
}

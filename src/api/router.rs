use std::any::Any;

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use super::health;
use super::middleware::{diagnostics_middleware, logging_middleware};
use super::routes;
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::api::middleware::diagnostics::query_params;

/// Create the full router with application state
///
/// `debug` turns on request details and the panic message in 500 responses.
pub fn create_router(state: AppState, debug: bool) -> Router {
    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(routes::create_finance_router())
        .fallback(not_found)
        .with_state(state);

    with_layers(router, debug)
}

/// Wrap a router with the middleware stack, innermost first
pub(crate) fn with_layers(router: Router, debug: bool) -> Router {
    let router = router.layer(CatchPanicLayer::custom(move |err| handle_panic(err, debug)));

    let router = if debug {
        router.layer(middleware::from_fn(diagnostics_middleware))
    } else {
        router
    };

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not found",
            "path": uri.path(),
            "params": query_params(&uri),
        })),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>, debug: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %detail, "Handler panicked");
    let error = ApiError::internal("internal server error");
    if debug {
        error.with_trace(detail).into_response()
    } else {
        error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    async fn register(app: &Router, username: &str) -> i64 {
        let (status, body) = call(
            app,
            Method::POST,
            "/user/",
            Some(json!({"username": username, "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    fn app() -> Router {
        create_router(AppState::in_memory(), false)
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let app = app();

        let (status, body) = call(&app, Method::GET, "/api/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_links"]["self"]["href"], "/api/");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

        let (status, body) = call(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_user_registration_and_login() {
        let app = app();

        let (status, body) = call(
            &app,
            Method::POST,
            "/user/",
            Some(json!({"username": "alice", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["result"], format!("added user with id={}", id));

        let (status, body) = call(&app, Method::GET, &format!("/user/{}/", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (status, _) = call(
            &app,
            Method::POST,
            "/user/",
            Some(json!({"username": "alice", "password": "other"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(
            &app,
            Method::POST,
            "/login/",
            Some(json!({"username": "alice", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "ok");

        let (status, body) = call(
            &app,
            Method::POST,
            "/login/",
            Some(json!({"username": "alice", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "wrong username or password");
    }

    #[tokio::test]
    async fn test_group_ledger_flow() {
        let app = app();
        register(&app, "alice").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/group/",
            Some(json!({"name": "Trip", "user": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let group_id = body["group_id"].as_i64().unwrap();

        let (status, body) =
            call(&app, Method::GET, &format!("/group/{}/", group_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["group"]["name"], "Trip");
        assert_eq!(body["group"]["creator"], "alice");
        assert_eq!(body["group"]["balance"], json!(0.0));
        assert_eq!(body["group"]["users"][0]["status"], "creator");

        let operation = format!("/group/{}/operation/", group_id);
        let (status, body) = call(
            &app,
            Method::POST,
            &operation,
            Some(json!({"user": "alice", "type": "income", "amount": 100, "name": "Deposit"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], json!(100.0));

        let (status, body) = call(
            &app,
            Method::POST,
            &operation,
            Some(json!({"user": "alice", "type": "spending", "amount": "40", "name": "Fuel", "description": "half a tank"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], json!(60.0));

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/group/{}/balance/?user=alice", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stored"], json!(60.0));
        assert_eq!(body["consistent"], json!(true));

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/group/{}/operations/?user=alice&page=0", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let operations = body["operations"].as_array().unwrap();
        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0]["name"], "Deposit");
        assert_eq!(operations[0]["user"], "alice");
        assert_eq!(operations[0]["type"], "income");
        assert_eq!(operations[1]["name"], "Fuel");
        assert_eq!(operations[1]["amount"], json!(40.0));
        assert_eq!(operations[1]["description"], "half a tank");

        let (status, body) = call(&app, Method::GET, "/user/alice/groups/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groups"][0]["size"], 1);
        assert_eq!(body["groups"][0]["balance"], json!(60.0));
    }

    #[tokio::test]
    async fn test_rejected_operation_keeps_balance() {
        let app = app();
        register(&app, "alice").await;
        let (_, body) = call(
            &app,
            Method::POST,
            "/group/",
            Some(json!({"name": "Trip", "user": "alice"})),
        )
        .await;
        let group_id = body["group_id"].as_i64().unwrap();

        for amount in [json!(-5), json!(0), json!("abc")] {
            let (status, body) = call(
                &app,
                Method::POST,
                &format!("/group/{}/operation/", group_id),
                Some(json!({"user": "alice", "type": "income", "amount": amount, "name": "Bad"})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error_type"], "invalid_request_error");
        }

        let (_, body) = call(
            &app,
            Method::GET,
            &format!("/group/{}/balance/?user=alice", group_id),
            None,
        )
        .await;
        assert_eq!(body["stored"], json!(0.0));
    }

    #[tokio::test]
    async fn test_join_approval_flow() {
        let app = app();
        register(&app, "alice").await;
        let bob = register(&app, "bob").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/group/",
            Some(json!({"name": "Trip", "user": "alice"})),
        )
        .await;
        let group_id = body["group_id"].as_i64().unwrap();

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/group/{}/join/?user=bob", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");

        let record = json!({"user": bob, "type": "income", "amount": 10, "name": "Share"});
        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/group/{}/operation/", group_id),
            Some(record.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/group/{}/status/bob/?user=alice&status=owner", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/group/{}/status/bob/?user=alice&status=user", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["membership"]["status"], "user");
        assert_eq!(body["membership"]["user_id"], bob);

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/group/{}/operation/", group_id),
            Some(record),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], json!(10.0));

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/group/{}/?status=user", group_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["group"]["users"].as_array().unwrap().len(), 1);
        assert_eq!(body["group"]["users"][0]["username"], "bob");
    }

    #[tokio::test]
    async fn test_chat_flow() {
        let app = app();
        register(&app, "alice").await;
        register(&app, "carol").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/group/",
            Some(json!({"name": "Flat", "user": "alice"})),
        )
        .await;
        let group_id = body["group_id"].as_i64().unwrap();
        let chat = format!("/group/{}/chat/", group_id);

        for text in ["first", "second"] {
            let (status, body) = call(
                &app,
                Method::POST,
                &chat,
                Some(json!({"user": "alice", "message": text})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["result"], "ok");
        }

        let (status, body) = call(&app, Method::GET, &format!("{}?user=alice", chat), None).await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["message"], "second");
        assert_eq!(messages[0]["user"], "alice");

        let (status, _) = call(&app, Method::GET, &format!("{}?user=carol", chat), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_group_by_creator_only() {
        let app = app();
        register(&app, "alice").await;
        register(&app, "bob").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/group/",
            Some(json!({"name": "Trip", "user": "alice"})),
        )
        .await;
        let group_id = body["group_id"].as_i64().unwrap();
        let group = format!("/group/{}/", group_id);

        let (status, _) = call(&app, Method::DELETE, &format!("{}?user=bob", group), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            call(&app, Method::DELETE, &format!("{}?user=alice", group), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], format!("deleted group with id={}", group_id));

        let (status, body) = call(&app, Method::GET, &group, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], format!("group with id={} is not found", group_id));
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let app = app();

        let (status, body) = call(&app, Method::GET, "/group/abc/", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_type"], "invalid_request_error");

        let (status, body) = call(&app, Method::GET, "/group/1/operations/", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = call(&app, Method::GET, "/nowhere?x=1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
        assert_eq!(body["path"], "/nowhere");
        assert_eq!(body["params"], json!({"x": "1"}));
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let app = with_layers(Router::new().route("/boom/", get(boom)), false);

        let (status, body) = call(&app, Method::GET, "/boom/?user=alice", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_type"], "server_error");
        assert!(body.get("path").is_none());
        assert!(body.get("trace").is_none());
    }

    #[tokio::test]
    async fn test_debug_enriches_500() {
        let app = with_layers(Router::new().route("/boom/", axum::routing::post(boom)), true);

        let (status, body) = call(
            &app,
            Method::POST,
            "/boom/?user=alice",
            Some(json!({"amount": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_type"], "server_error");
        assert_eq!(body["path"], "/boom/");
        assert_eq!(body["params"], json!({"user": "alice"}));
        assert_eq!(body["body"], json!({"amount": 5}));
        assert_eq!(body["trace"], "boom");
    }
}

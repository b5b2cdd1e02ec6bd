use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, health_handler, redirect_handler, stats_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten", post(create_url_handler))
            .route("/stats/{short_code}", get(stats_handler))
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use hashlink_cache::BoundedUrlCache;
    use hashlink_core::Shortener;
    use hashlink_storage::{InMemoryTable, UnavailableTable};
    use hashlink_store::UrlStore;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BASE_URL: &str = "https://hl.ink";

    fn router() -> Router {
        let store = UrlStore::new(InMemoryTable::new(), BoundedUrlCache::with_capacity(100));
        App::router(AppState::new(Arc::new(store), BASE_URL))
    }

    fn offline_router(cache_capacity: usize) -> Router {
        let store = UrlStore::new(
            UnavailableTable::default(),
            BoundedUrlCache::with_capacity(cache_capacity),
        );
        App::router(AppState::new(Arc::new(store), BASE_URL))
    }

    fn shorten_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, location, body)
    }

    #[tokio::test]
    async fn health() {
        let (status, _, body) = send(&router(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn shorten_redirect_and_stats() {
        let app = router();

        let (status, _, created) = send(
            &app,
            shorten_request(json!({ "url": "https://example.com/long" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["short_code"], "8d79e901");
        assert_eq!(created["short_url"], "https://hl.ink/8d79e901");
        assert_eq!(created["long_url"], "https://example.com/long");
        assert_eq!(created["durable"], true);

        let (status, location, _) = send(&app, get_request("/8d79e901")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("https://example.com/long"));

        let (status, _, stats) = send(&app, get_request("/stats/8d79e901")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["short_code"], "8d79e901");
        assert_eq!(stats["long_url"], "https://example.com/long");
        assert_eq!(stats["clicks"], 1);
        assert!(stats["created_at"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn shorten_adds_scheme() {
        let (status, _, created) = send(
            &router(),
            shorten_request(json!({ "url": "example.com/no-scheme" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["long_url"], "https://example.com/no-scheme");
    }

    #[tokio::test]
    async fn shorten_rejects_blank_url() {
        let (status, _, body) = send(&router(), shorten_request(json!({ "url": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("must not be empty"));
    }

    #[tokio::test]
    async fn shorten_rejects_missing_field() {
        let (status, _, _) = send(&router(), shorten_request(json!({ "link": "x" }))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn unknown_code_is_404() {
        let app = router();
        let (status, _, body) = send(&app, get_request("/deadbeef")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "short code does not exist");

        let (status, _, _) = send(&app, get_request("/stats/deadbeef")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn offline_shorten_is_not_durable_but_resolvable() {
        let app = offline_router(10);

        let (status, _, created) = send(
            &app,
            shorten_request(json!({ "url": "https://example.com/long" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["durable"], false);

        let (status, location, _) = send(&app, get_request("/8d79e901")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location.as_deref(), Some("https://example.com/long"));
    }

    #[tokio::test]
    async fn offline_cache_miss_is_503() {
        let app = offline_router(10);

        let (status, _, body) = send(&app, get_request("/deadbeef")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "storage temporarily unavailable");

        let (status, _, _) = send(&app, get_request("/stats/deadbeef")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn shorten_rejects_control_characters() {
        let app = router();
        let (status, _, body) = send(
            &app,
            shorten_request(json!({ "url": "example.com/a\nb" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("control characters"));
    }

    #[tokio::test]
    async fn shorten_accepts_non_ascii_url() {
        let app = router();
        let (status, _, created) = send(
            &app,
            shorten_request(json!({ "url": "https://example.com/caf\u{e9}" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let code = created["short_code"].as_str().unwrap();
        let response = app.clone().oneshot(get_request(&format!("/{code}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION].as_bytes(),
            "https://example.com/caf\u{e9}".as_bytes()
        );
    }

    #[tokio::test]
    async fn unusable_stored_url_is_a_server_error() {
        let store = UrlStore::new(InMemoryTable::new(), BoundedUrlCache::with_capacity(10));
        let code = store.create("example.com/a\nb").await.short_code;
        let app = App::router(AppState::new(Arc::new(store), BASE_URL));

        let (status, location, body) = send(&app, get_request(&format!("/{code}"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(location, None);
        assert_eq!(body["error"], "stored url cannot be used as a redirect");
    }
}

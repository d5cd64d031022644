//! HTTP boundary for the extractor
//!
//! Exposes `POST /api/scrape`. Every outcome is a JSON body: the extraction
//! result on success, `{ "error": .. }` otherwise.

use crate::error::{ErrorKind, ExtractError};
use crate::extractor::Extractor;
use crate::types::{ErrorBody, ExtractRequest, ExtractResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Path of the extraction endpoint
pub const SCRAPE_PATH: &str = "/api/scrape";

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Fetch | ErrorKind::Completion => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Build the application router
pub fn router(extractor: Arc<Extractor>) -> Router {
    Router::new()
        .route(SCRAPE_PATH, post(scrape).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(extractor)
}

/// Handle one extraction request
async fn scrape(
    State(extractor): State<Arc<Extractor>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ExtractError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected request body");
        ExtractError::InvalidBody(rejection.body_text())
    })?;

    match extractor.execute(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            match e.kind() {
                ErrorKind::Validation => warn!(error = %e, "Invalid extraction request"),
                _ => error!(error = %e, kind = ?e.kind(), "Extraction failed"),
            }
            Err(e)
        }
    }
}

/// Respond to any method other than POST
async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method not allowed")),
    )
}

/// Serve the router on `addr` until ctrl-c
pub async fn serve(addr: SocketAddr, extractor: Arc<Extractor>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, path = SCRAPE_PATH, "FieldKit server listening");

    axum::serve(listener, router(extractor))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tests::{StaticFetcher, StaticProvider};
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Method, Request};
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn app(fetcher: Arc<StaticFetcher>, provider: Arc<StaticProvider>) -> Router {
        router(Arc::new(
            Extractor::builder()
                .fetcher(fetcher)
                .provider(provider)
                .build(),
        ))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(SCRAPE_PATH)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn full_body() -> String {
        json!({
            "url": "https://example.com",
            "fields": ["title", "price"],
            "model": "gpt-4o-mini",
            "apiKey": "sk-test"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_success_response() {
        let app = app(
            StaticFetcher::ok("<body><h1>Widget</h1></body>"),
            StaticProvider::answering(Some("title: Widget")),
        );

        let (status, body) = send(app, post_json(&full_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "title: Widget");
        assert!(body["inputTokens"].as_u64().unwrap() > 0);
        assert_eq!(body["outputTokens"], 2);
        assert!(body["totalCost"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400() {
        let fetcher = StaticFetcher::ok("<body>page</body>");
        let provider = StaticProvider::answering(Some("ok"));
        let app = app(fetcher.clone(), provider.clone());

        let body = json!({ "url": "https://example.com", "fields": ["title"], "model": "gpt-4o" });
        let (status, body) = send(app, post_json(&body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required parameters" }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_null_parameter_is_missing() {
        let fetcher = StaticFetcher::ok("<body>page</body>");
        let app = app(fetcher.clone(), StaticProvider::answering(Some("ok")));

        let body = json!({
            "url": "https://example.com",
            "fields": ["title"],
            "model": "gpt-4o",
            "apiKey": null
        });
        let (status, body) = send(app, post_json(&body.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required parameters" }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = app(
            StaticFetcher::ok("<body>page</body>"),
            StaticProvider::answering(Some("ok")),
        );

        let (status, body) = send(app, post_json(r#"{"url": "https://example.com", "fields": "title"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_500() {
        let app = app(
            StaticFetcher::status(503),
            StaticProvider::answering(Some("ok")),
        );

        let (status, body) = send(app, post_json(&full_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Error fetching webpage: Request failed with status code 503"
        );
    }

    #[tokio::test]
    async fn test_empty_completion_is_500() {
        let app = app(
            StaticFetcher::ok("<body>page</body>"),
            StaticProvider::answering(None),
        );

        let (status, body) = send(app, post_json(&full_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "No result from OpenAI" }));
    }

    #[tokio::test]
    async fn test_non_post_is_405() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let app = app(
                StaticFetcher::ok("<body>page</body>"),
                StaticProvider::answering(Some("ok")),
            );
            let request = Request::builder()
                .method(method)
                .uri(SCRAPE_PATH)
                .body(Body::empty())
                .unwrap();

            let (status, body) = send(app, request).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, json!({ "error": "Method not allowed" }));
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP check service
// ---------------------------------------------------------------------------
//
// POST /api/check  {"subdomains": [...]}  ->  {"results": [...]}
// GET  /health

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dangle_common::{ProbeResult, VERSION};
use dangle_orchestrator::Orchestrator;
use dangle_signatures::SignatureCatalog;

/// Configuration for the API server.
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

pub struct AppState {
    orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

/// A missing or `null` list is an empty batch.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub subdomains: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub results: Vec<ProbeResult>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// The body does not decode as a check request. Maps to 400.
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_key, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        (
            status,
            Json(ApiErrorBody {
                error: error_key.into(),
                message,
            }),
        )
            .into_response()
    }
}

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/check", post(check))
        .route("/health", get(health))
        .with_state(state)
}

// The body is decoded whatever the Content-Type header says.
async fn check(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CheckResponse>, ApiError> {
    let request: CheckRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected check request");
        ApiError::BadRequest(format!("Invalid request payload: {e}"))
    })?;

    let subdomains = request.subdomains.unwrap_or_default();
    let results = state.orchestrator.check_subdomains(subdomains).await;
    Ok(Json(CheckResponse { results }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "signatures": SignatureCatalog::builtin().len(),
    }))
}

/// Start the API server and block until shutdown (Ctrl+C).
pub async fn start_server(config: ServerConfig, orchestrator: Orchestrator) -> Result<()> {
    let app = build_router(Arc::new(AppState::new(orchestrator)));
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    info!("Server is running on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use dangle_common::{ProbeError, Prober};
    use tower::ServiceExt;

    /// "abandoned.*" serves the S3 error page, "offline.*" is unreachable,
    /// anything else is a healthy 200.
    struct StubProber;

    #[async_trait]
    impl Prober for StubProber {
        async fn probe(&self, subdomain: &str) -> ProbeResult {
            let result = ProbeResult::new(subdomain);
            if subdomain.starts_with("abandoned.") {
                result.with_http_status(404).with_service("AWS/S3")
            } else if subdomain.starts_with("offline.") {
                result
                    .with_cname(format!("{subdomain}."))
                    .with_error(ProbeError::HttpRequestFailed("connection refused".into()))
            } else {
                result.with_http_status(200)
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn app() -> Router {
        let orchestrator = Orchestrator::new(Arc::new(StubProber));
        build_router(Arc::new(AppState::new(orchestrator)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn check_returns_results_with_omitted_fields() {
        let response = app()
            .oneshot(post_json(
                r#"{"subdomains":["good.example.com","abandoned.example.com","offline.example.com"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "results": [
                    {"subdomain": "good.example.com", "vulnerable": false, "http_status": 200},
                    {"subdomain": "abandoned.example.com", "vulnerable": true, "service": "AWS/S3", "http_status": 404},
                    {
                        "subdomain": "offline.example.com",
                        "vulnerable": false,
                        "cname": "offline.example.com.",
                        "error_message": "HTTP request failed: connection refused"
                    }
                ]
            })
        );
    }

    #[tokio::test]
    async fn empty_list_returns_empty_results() {
        let response = app().oneshot(post_json(r#"{"subdomains":[]}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"results": []}));
    }

    #[tokio::test]
    async fn content_type_header_is_not_required() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/check")
            .body(Body::from(r#"{"subdomains":["good.example.com"]}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "results": [{"subdomain": "good.example.com", "vulnerable": false, "http_status": 200}]
            })
        );
    }

    #[tokio::test]
    async fn null_or_missing_list_is_empty_batch() {
        for payload in [r#"{"subdomains":null}"#, r#"{}"#] {
            let response = app().oneshot(post_json(payload)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "payload {payload}");
            assert_eq!(body_json(response).await, serde_json::json!({"results": []}));
        }
    }

    #[tokio::test]
    async fn invalid_payload_is_bad_request() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/check")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], VERSION);
        assert_eq!(body["signatures"], 6);
    }
}

//! Portal Gateway
//!
//! HTTP front for the browser client:
//! - `GET /health` - liveness and uptime
//! - `/api/*` - forwarded to the configured backend
//! - everything else - the built web UI, with `index.html` for client routes

pub mod error;
pub mod proxy;
pub mod state;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::envelope::Envelope;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub backend: String,
}

async fn health(State(state): State<GatewayState>) -> Json<Envelope<HealthStatus>> {
    Json(Envelope::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        backend: state.backend.to_string(),
    }))
}

/// Configured origins, or any origin when none parse
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: GatewayState, cors_origins: &[String]) -> Router {
    let index = state.ui_dir.join("index.html");
    let ui = ServeDir::new(&state.ui_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health))
        .route("/api/*path", any(proxy::forward))
        .fallback_service(ui)
        .layer(DefaultBodyLimit::max(state::MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C / SIGTERM
pub async fn serve(config: &Config) -> GatewayResult<()> {
    let state = GatewayState::from_config(config)?;
    tracing::info!(
        backend = %state.backend,
        ui_dir = %state.ui_dir.display(),
        "Gateway configured"
    );
    let router = build_router(state, &config.portal.cors_origins);

    let addr = format!("{}:{}", config.portal.host, config.portal.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Ahana portal listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ahana portal shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderMap, Method, Request, StatusCode, Uri},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn app(backend: &str, ui_dir: &std::path::Path) -> Router {
        let state = GatewayState::new(backend, ui_dir, Duration::from_secs(5)).unwrap();
        build_router(state, &[])
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
        Json(json!({
            "status": "success",
            "data": {
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
                "body": body,
            }
        }))
    }

    /// Backend stand-in on an ephemeral port
    async fn spawn_backend() -> String {
        let backend = Router::new().route("/api/v1/members", any(echo));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, backend).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempdir().unwrap();
        let response = app("http://127.0.0.1:9", dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_client_routes_fall_back_to_index() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let app = app("http://127.0.0.1:9", dir.path());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/students").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("id=\"app\""));

        let response = app
            .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"console.log(1)");
    }

    #[tokio::test]
    async fn test_forwards_query_and_authorization() {
        let backend = spawn_backend().await;
        let dir = tempdir().unwrap();

        let response = app(&backend, dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/members?page=2&limit=10")
                    .header("Authorization", "Bearer abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["method"], "GET");
        assert_eq!(body["data"]["path"], "/api/v1/members");
        assert_eq!(body["data"]["query"], "page=2&limit=10");
        assert_eq!(body["data"]["auth"], "Bearer abc");
    }

    #[tokio::test]
    async fn test_forwards_body_and_method() {
        let backend = spawn_backend().await;
        let dir = tempdir().unwrap();

        let response = app(&backend, dir.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/members")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"name":"Asha"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["data"]["method"], "POST");
        assert_eq!(body["data"]["body"], r#"{"name":"Asha"}"#);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let dir = tempdir().unwrap();

        let response = app(&format!("http://{}", addr), dir.path())
            .oneshot(Request::builder().uri("/api/v1/members").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["requestId"].as_str().is_some());
    }
}

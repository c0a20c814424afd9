/// REST API routes for sigwall.
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::AppState;
use crate::model::{KeyGenerationRequest, KeyGenerationResult};
use crate::quantum::devices::{self, CostEstimate, DeviceFilter, QuantumDevice, StatusSummary};

/// Error body returned on failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
}

// ─── Health ──────────────────────────────────────────────

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Service status response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    success: bool,
    status: ServiceStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus {
    local_engine_ready: bool,
    remote_invoker: Option<String>,
    remote_timeout_secs: u64,
    devices: StatusSummary,
}

/// GET /api/status
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let dispatcher = &state.dispatcher;
    Json(StatusResponse {
        success: true,
        status: ServiceStatus {
            local_engine_ready: true,
            remote_invoker: dispatcher.remote_name().map(str::to_string),
            remote_timeout_secs: dispatcher.timeout().as_secs(),
            devices: devices::status_summary(),
        },
    })
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
}

// ─── Generation ──────────────────────────────────────────

/// POST /api/quantum/generate: generate a key pair and signature.
///
/// Remote failures are absorbed by the dispatcher; only an unavailable
/// entropy source produces an error response.
async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeyGenerationRequest>,
) -> Result<Json<KeyGenerationResult>, ApiError> {
    let result = state.dispatcher.generate(&req).await.map_err(|e| {
        error!(device = %req.device, error = %e, "Key generation failed");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Key generation failed: {e}"),
        )
    })?;

    Ok(Json(result))
}

pub fn generate_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/quantum/generate", post(generate))
}

// ─── Devices ─────────────────────────────────────────────

/// Device catalog response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListResponse {
    success: bool,
    devices: Vec<&'static QuantumDevice>,
    device_count: usize,
}

/// GET /api/devices?type=..&region=..&bellStates=..
async fn list_devices(Query(filter): Query<DeviceFilter>) -> Json<DeviceListResponse> {
    let selected = devices::filter(&filter);
    Json(DeviceListResponse {
        success: true,
        device_count: selected.len(),
        devices: selected,
    })
}

#[derive(Debug, Deserialize)]
struct CostQuery {
    #[serde(default = "default_shots")]
    shots: u32,
}

fn default_shots() -> u32 {
    100
}

/// GET /api/devices/{id}/cost?shots=N
async fn device_cost(
    Path(id): Path<String>,
    Query(query): Query<CostQuery>,
) -> Result<Json<CostEstimate>, ApiError> {
    devices::estimate_cost(&id, query.shots)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown device: {id}")))
}

pub fn device_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/devices", get(list_devices))
        .route("/api/devices/{id}/cost", get(device_cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::crypto::sampler::SecureRng;
    use crate::crypto::test_support::FailingRng;
    use crate::dispatch::{Dispatcher, DEFAULT_REMOTE_TIMEOUT};
    use crate::engine::LocalEngine;
    use crate::server::build_app;

    fn app() -> Router {
        build_app(AppState {
            dispatcher: Dispatcher::local_only(),
        })
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn generate_request() -> Request<Body> {
        Request::post("/api/quantum/generate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"device":"aws_sv1","sentiment":"hope","sessionId":"s1"}"#))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_returns_result() {
        let req = Request::post("/api/quantum/generate")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"device":"aws_sv1","sentiment":"hope","sessionId":"s1","timeframe":"","useRealDevice":false}"#,
            ))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["async"], false);
        assert_eq!(body["device"], "aws_sv1");
        assert_eq!(body["processingMethod"], "Local Simulation");
        assert!(!body["publicKey"].as_str().unwrap().is_empty());
        assert!(!body["signature"].as_str().unwrap().is_empty());
        assert!(body.get("privateKey").is_none());
    }

    #[tokio::test]
    async fn test_generate_reports_entropy_failure() {
        let engine = LocalEngine::default()
            .with_entropy(|| -> Box<dyn SecureRng> { Box::new(FailingRng) });
        let app = build_app(AppState {
            dispatcher: Dispatcher::new(engine, None, DEFAULT_REMOTE_TIMEOUT),
        });

        let resp = app.oneshot(generate_request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Key generation failed: Entropy source unavailable"));
        assert!(body.get("publicKey").is_none());
    }

    #[tokio::test]
    async fn test_status() {
        let resp = app().oneshot(get_request("/api/status")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["status"]["localEngineReady"], true);
        assert!(body["status"]["remoteInvoker"].is_null());
        assert_eq!(body["status"]["remoteTimeoutSecs"], 60);
        assert_eq!(body["status"]["devices"]["totalDevices"], 11);
        assert_eq!(body["status"]["devices"]["byRegion"]["local"][0], "local_simulator");
    }

    #[tokio::test]
    async fn test_list_devices_filtered() {
        let resp = app()
            .oneshot(get_request("/api/devices?type=qpu&region=eu-north-1"))
            .await
            .unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["deviceCount"], 2);
        assert_eq!(body["devices"][0]["id"], "iqm_garnet");
        assert_eq!(body["devices"][1]["id"], "iqm_emerald");

        let resp = app()
            .oneshot(get_request("/api/devices?bellStates=true"))
            .await
            .unwrap();
        assert_eq!(json_body(resp).await["deviceCount"], 10);
    }

    #[tokio::test]
    async fn test_list_devices_rejects_unknown_type() {
        let resp = app()
            .oneshot(get_request("/api/devices?type=mainframe"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_devices() {
        let resp = app()
            .oneshot(Request::get("/api/devices").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["deviceCount"], 11);
        assert_eq!(body["devices"][0]["id"], "local_simulator");
    }

    #[tokio::test]
    async fn test_device_cost() {
        let resp = app()
            .oneshot(
                Request::get("/api/devices/ionq_aria/cost?shots=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["shots"], 10);

        let resp = app()
            .oneshot(Request::get("/api/devices/nope/cost").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

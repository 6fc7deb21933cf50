use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::put;
use axum::Json;
use axum::Router;
use indexmap::IndexMap;
use matterscope_registry::CategoryTable;
use matterscope_registry::Registry;
use serde::Deserialize;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::score::aggregate::aggregate_capabilities;
use crate::score::aggregate::ComparisonMatrix;
use crate::score::analyzer::analyze_capabilities;
use crate::score::analyzer::AnalyzerResult;
use crate::score::engine::calculate_device_score;
use crate::score::ScoreWeights;
use crate::snapshot::Endpoint;
use crate::store::DeviceStore;
use crate::store::EndpointProvider;

/// Most devices a single comparison request may name. The aggregator itself
/// does not validate size; the bound is enforced here at the request edge.
const MAX_COMPARE_DEVICES: usize = 5;

/// Response for the /v1/ping endpoint
#[derive(Serialize)]
struct PingResponse {
    status: String,
}

/// Response for the /v1/info endpoint
#[derive(Serialize)]
struct InfoResponse {
    version: String,
    hostname: String,
    devices: usize,
}

#[derive(Serialize)]
struct IngestResponse {
    slug: String,
    revision: u64,
}

#[derive(Debug, Deserialize)]
struct CompareParams {
    /// Comma-separated device slugs.
    devices: String,
}

#[derive(Serialize)]
struct CompareResponse {
    devices: IndexMap<String, AnalyzerResult>,
    matrix: ComparisonMatrix,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DeviceStore>,
    pub registry: Arc<Registry>,
    pub categories: CategoryTable,
    pub weights: ScoreWeights,
    pub version: &'static str,
}

/// Handler for GET /v1/ping
#[tracing::instrument]
async fn ping() -> impl IntoResponse {
    tracing::debug!("Handling /v1/ping request");
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Handler for GET /v1/info
#[tracing::instrument(skip(state))]
async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    (
        StatusCode::OK,
        Json(InfoResponse {
            version: state.version.to_string(),
            hostname,
            devices: state.store.len(),
        }),
    )
}

/// Handler for GET /v1/registry/clusters
async fn registry_clusters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut clusters: Vec<_> = state.registry.clusters().collect();
    clusters.sort_by_key(|c| c.id);
    Json(clusters)
}

/// Handler for GET /v1/registry/device-types
async fn registry_device_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.device_types().collect::<Vec<_>>())
}

/// Handler for PUT /v1/devices/{slug}/endpoints
#[tracing::instrument(skip(state, endpoints))]
async fn put_endpoints(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(endpoints): Json<Vec<Endpoint>>,
) -> impl IntoResponse {
    let revision = state.store.replace_endpoints(&slug, endpoints);
    tracing::info!(slug, revision, "stored endpoint snapshot over HTTP");
    (StatusCode::OK, Json(IngestResponse { slug, revision }))
}

/// Handler for GET /v1/devices/{slug}/score
#[tracing::instrument(skip(state))]
async fn device_score(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.store.endpoints(&slug).await {
        Some(endpoints) => {
            let score = calculate_device_score(&endpoints, &state.registry, &state.weights);
            Json(score).into_response()
        }
        None => not_found(&slug),
    }
}

/// Handler for GET /v1/devices/{slug}/capabilities
#[tracing::instrument(skip(state))]
async fn device_capabilities(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.store.endpoints(&slug).await {
        Some(endpoints) => {
            let analysis = analyze_capabilities(&endpoints, &state.registry, &state.categories);
            Json(analysis).into_response()
        }
        None => not_found(&slug),
    }
}

/// Handler for GET /v1/compare?devices=a,b,c
#[tracing::instrument(skip(state))]
async fn compare(
    Query(params): Query<CompareParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let slugs = match parse_device_list(&params.devices) {
        Ok(slugs) => slugs,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response();
        }
    };

    // Unknown slugs are skipped, not errors: a comparison of what exists is
    // still useful while some devices have not reported yet.
    let mut devices = IndexMap::new();
    for slug in slugs {
        if let Some(endpoints) = state.store.endpoints(&slug).await {
            let analysis = analyze_capabilities(&endpoints, &state.registry, &state.categories);
            devices.insert(slug, analysis);
        } else {
            tracing::debug!(slug, "compare request names unknown device");
        }
    }

    let matrix = aggregate_capabilities(&devices, &state.categories);
    Json(CompareResponse { devices, matrix }).into_response()
}

fn parse_device_list(raw: &str) -> Result<Vec<String>, String> {
    let slugs: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if slugs.is_empty() {
        return Err("no devices given".to_string());
    }
    if slugs.len() > MAX_COMPARE_DEVICES {
        return Err(format!(
            "at most {} devices can be compared, got {}",
            MAX_COMPARE_DEVICES,
            slugs.len()
        ));
    }
    Ok(slugs)
}

fn not_found(slug: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("unknown device '{}'", slug),
        }),
    )
        .into_response()
}

/// Create the API router with all endpoints
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/info", get(info))
        .route("/v1/registry/clusters", get(registry_clusters))
        .route("/v1/registry/device-types", get(registry_device_types))
        .route("/v1/devices/:slug/endpoints", put(put_endpoints))
        .route("/v1/devices/:slug/score", get(device_score))
        .route("/v1/devices/:slug/capabilities", get(device_capabilities))
        .route("/v1/compare", get(compare))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
///
/// Binds to the specified address and serves the API endpoints until the
/// provided shutdown signal is triggered.
pub async fn serve(
    listen: String,
    port: u16,
    state: Arc<AppState>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", listen, port).parse()?;
    tracing::info!("Starting HTTP API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("HTTP API server shutting down gracefully");
        })
        .await?;

    Ok(())
}

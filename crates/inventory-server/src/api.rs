use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use domain::{
    Device, DeviceFilter, DeviceId, DevicePatch, DeviceType, NewDevice, SimChange,
    TransferEvent, TransferKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/devices", get(list_devices).post(create_device))
        .route(
            "/api/devices/{id}",
            get(get_device).put(update_device).delete(delete_device),
        )
        .route("/api/devices/{id}/toggle-status", post(toggle_status))
        .route("/api/devices/{id}/sim", put(change_sim))
        .route("/api/devices/{id}/history", get(device_history))
        .route("/api/stats", get(get_stats))
        .route("/api/facets", get(get_facets))
        .route(
            "/api/device-types",
            get(list_device_types).post(create_device_type),
        )
        .route(
            "/api/device-types/{id}",
            put(rename_device_type).delete(delete_device_type),
        )
        .route("/api/sim-ledger", get(sim_ledger))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Devices ---

async fn list_devices(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<DeviceFilter>,
) -> Json<Vec<Device>> {
    Json(state.inventory.list_devices(&filter).await)
}

async fn create_device(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<NewDevice>,
) -> ApiResult<impl IntoResponse> {
    let device = state.inventory.add_device(input).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

async fn get_device(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Device>> {
    Ok(Json(state.inventory.get_device(DeviceId::new(id)).await?))
}

async fn update_device(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
    ApiJson(patch): ApiJson<DevicePatch>,
) -> ApiResult<Json<Device>> {
    let device = state
        .inventory
        .update_device(DeviceId::new(id), patch)
        .await?;
    Ok(Json(device))
}

async fn delete_device(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.inventory.delete_device(DeviceId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_status(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Device>> {
    let device = state
        .inventory
        .toggle_device_status(DeviceId::new(id))
        .await?;
    Ok(Json(device))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeSimRequest {
    #[serde(default)]
    new_sim: String,
}

async fn change_sim(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ChangeSimRequest>,
) -> ApiResult<Json<Device>> {
    let device = state
        .inventory
        .change_sim(DeviceId::new(id), &request.new_sim)
        .await?;
    Ok(Json(device))
}

async fn device_history(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SimChange>>> {
    let history = state.inventory.device_history(DeviceId::new(id)).await?;
    Ok(Json(history))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.inventory.stats().await)
}

async fn get_facets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.inventory.facets().await)
}

// --- Device types ---

#[derive(Debug, Deserialize)]
struct DeviceTypeRequest {
    #[serde(default)]
    name: String,
}

async fn list_device_types(State(state): State<Arc<AppState>>) -> Json<Vec<DeviceType>> {
    Json(state.inventory.list_device_types().await)
}

async fn create_device_type(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DeviceTypeRequest>,
) -> ApiResult<impl IntoResponse> {
    let device_type = state.inventory.add_device_type(&request.name).await?;
    Ok((StatusCode::CREATED, Json(device_type)))
}

async fn rename_device_type(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DeviceTypeRequest>,
) -> ApiResult<Json<DeviceType>> {
    let device_type = state
        .inventory
        .rename_device_type(id, &request.name)
        .await?;
    Ok(Json(device_type))
}

async fn delete_device_type(
    ApiPath(id): ApiPath<u64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.inventory.remove_device_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- SIM ledger ---

#[derive(Debug, Deserialize)]
struct LedgerQuery {
    sim: Option<String>,
}

/// Ledger event as served, with its derived kind
#[derive(Debug, Serialize)]
struct LedgerEntry {
    #[serde(flatten)]
    event: TransferEvent,
    kind: TransferKind,
}

impl From<TransferEvent> for LedgerEntry {
    fn from(event: TransferEvent) -> Self {
        Self {
            kind: event.kind(),
            event,
        }
    }
}

async fn sim_ledger(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LedgerQuery>,
) -> Json<Vec<LedgerEntry>> {
    let sim = query.sim.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let events = state.inventory.transfer_ledger(sim).await;
    Json(events.into_iter().map(LedgerEntry::from).collect())
}

// HTTP request handlers
use crate::application::allocation_service::{
    DepositVerification, NewAllocation, SpoilageReport,
};
use crate::application::qr_service::{BatchRequest, ScanRequest};
use crate::application::tracking_service::NewGeofence;
use crate::domain::error::DomainError;
use crate::domain::inventory::InventoryFilter;
use crate::domain::sale::{SortDirection, SortField};
use crate::infrastructure::chunked_json::chunked_json_stream;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::{ApiError, ApiResult};
use axum::{
    Json,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type Shared = State<Arc<AppState>>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;

#[derive(Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub filter: InventoryFilter,
}

async fn respond<T: Serialize>(
    data: &T,
    status: StatusCode,
    headers: &HeaderMap,
) -> ApiResult<Response<Body>> {
    Ok(json_response(data, status, accepts_brotli(headers)).await?)
}

async fn ok_json<T: Serialize>(data: &T, headers: &HeaderMap) -> ApiResult<Response<Body>> {
    respond(data, StatusCode::OK, headers).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_salespeople(
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.list_salespeople(), &headers).await
}

pub async fn list_sales(
    headers: HeaderMap,
    State(state): Shared,
    query: QueryParams<SalesQuery>,
) -> ApiResult<Response<Body>> {
    let Query(query) = query?;
    let sales = state.dashboard_service.list_sales(query.sort, query.direction);
    ok_json(&sales, &headers).await
}

pub async fn sales_summary(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.dashboard_service.sales_summary(), &headers).await
}

pub async fn list_geofences(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.list_geofences(), &headers).await
}

pub async fn add_geofence(
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<NewGeofence>,
) -> ApiResult<Response<Body>> {
    let Json(request) = body?;
    if !(request.radius.is_finite() && request.radius > 0.0) {
        return Err(ApiError::BadRequest(
            "Geofence radius must be a positive number of meters".to_string(),
        ));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Geofence name is required".to_string()));
    }

    let added = state.tracking_service.add_geofence(request);
    respond(&added, StatusCode::CREATED, &headers).await
}

pub async fn remove_geofence(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.remove_geofence(&id), &headers).await
}

pub async fn geofence_occupancy(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    let occupancy = state.tracking_service.geofence_occupancy(&id)?;
    ok_json(&occupancy, &headers).await
}

pub async fn list_routes(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.route_service.list_routes(), &headers).await
}

pub async fn optimize_route(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    let optimized = state
        .route_service
        .optimize_route(&id)
        .ok_or(DomainError::UnknownRoute(id))?;
    ok_json(&optimized, &headers).await
}

pub async fn map_view(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.map_view(), &headers).await
}

pub async fn focus_salesperson(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.focus_on_salesperson(&id), &headers).await
}

pub async fn focus_geofence(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.focus_on_geofence(&id), &headers).await
}

pub async fn reset_map(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.tracking_service.reset_view(), &headers).await
}

pub async fn team_overview(headers: HeaderMap, State(state): Shared) -> ApiResult<Response<Body>> {
    ok_json(&state.dashboard_service.team_overview(), &headers).await
}

pub async fn salesperson_detail(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    let detail = state.dashboard_service.salesperson_detail(&id)?;
    ok_json(&detail, &headers).await
}

pub async fn generate_qr_batch(
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<BatchRequest>,
) -> ApiResult<Response<Body>> {
    let Json(request) = body?;
    let batch = state.qr_service.generate(request);
    respond(&batch, StatusCode::CREATED, &headers).await
}

pub async fn scan_qr(
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<ScanRequest>,
) -> ApiResult<Response<Body>> {
    let Json(request) = body?;
    let outcome = state.qr_service.scan(request)?;
    ok_json(&outcome, &headers).await
}

pub async fn inventory(
    headers: HeaderMap,
    State(state): Shared,
    query: QueryParams<InventoryQuery>,
) -> ApiResult<Response<Body>> {
    let Query(query) = query?;
    ok_json(&state.qr_service.inventory(query.filter), &headers).await
}

pub async fn list_allocations(
    headers: HeaderMap,
    State(state): Shared,
) -> ApiResult<Response<Body>> {
    ok_json(&state.allocation_service.list_allocations(), &headers).await
}

pub async fn allocate_coconuts(
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<NewAllocation>,
) -> ApiResult<Response<Body>> {
    let Json(request) = body?;
    if request.quantity == Some(0) {
        return Err(ApiError::BadRequest("Allocate at least one coconut".to_string()));
    }

    let recorded = state.allocation_service.allocate(request)?;
    respond(&recorded, StatusCode::CREATED, &headers).await
}

pub async fn verify_deposit(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<DepositVerification>,
) -> ApiResult<Response<Body>> {
    let Json(request) = body?;
    if !(request.actual_amount.is_finite() && request.actual_amount >= 0.0) {
        return Err(ApiError::BadRequest(
            "Deposited amount must be a non-negative number".to_string(),
        ));
    }

    let outcome = state.allocation_service.verify(&id, request)?;
    ok_json(&outcome, &headers).await
}

pub async fn record_spoilage(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): Shared,
    body: JsonBody<SpoilageReport>,
) -> ApiResult<Response<Body>> {
    let Json(report) = body?;
    let recorded = state.allocation_service.record_spoilage(&id, report)?;
    ok_json(&recorded, &headers).await
}

/// Stream live positions and camera state, one frame per store version
pub async fn live_updates(headers: HeaderMap, State(state): Shared) -> impl IntoResponse {
    let frames = state.tracking_service.live_frames();

    match chunked_json_stream(frames, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

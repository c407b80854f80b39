pub mod app_state;
pub mod error;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

// Compression is applied per response by the handlers, so there is no CompressionLayer here
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/salespeople", get(list_salespeople))
        .route("/sales", get(list_sales))
        .route("/sales/summary", get(sales_summary))
        .route("/geofences", get(list_geofences).post(add_geofence))
        .route("/geofences/:id", delete(remove_geofence))
        .route("/geofences/:id/occupancy", get(geofence_occupancy))
        .route("/routes", get(list_routes))
        .route("/routes/:id/optimize", post(optimize_route))
        .route("/map", get(map_view))
        .route("/map/focus/salesperson/:id", post(focus_salesperson))
        .route("/map/focus/geofence/:id", post(focus_geofence))
        .route("/map/reset", post(reset_map))
        .route("/team", get(team_overview))
        .route("/team/:id", get(salesperson_detail))
        .route("/qr/batches", post(generate_qr_batch))
        .route("/qr/scan", post(scan_qr))
        .route("/inventory", get(inventory))
        .route("/allocations", get(list_allocations).post(allocate_coconuts))
        .route("/allocations/:id/verify", post(verify_deposit))
        .route("/allocations/:id/spoilage", post(record_spoilage))
        .route("/live", get(live_updates))
        .with_state(state)
}

// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::allocation_service::AllocationService;
use crate::application::dashboard_service::DashboardService;
use crate::application::qr_service::QrService;
use crate::application::route_service::RouteService;
use crate::application::simulation::spawn_position_simulation;
use crate::application::state_store::LiveStateStore;
use crate::application::tracking_service::TrackingService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::sample_data::SampleDataRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("field_sales_tracker=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;
    let camera = config.camera_settings();

    // Seed the live store (infrastructure layer)
    let repository = SampleDataRepository::new(Utc::now());
    let store = LiveStateStore::load(&repository, &camera).await?;

    // Create services (application layer)
    let tracking_service =
        TrackingService::new(store.clone(), camera, config.simulation.jitter_degrees);
    let route_service = RouteService::new(store.clone(), config.randomize_params());
    let dashboard_service = DashboardService::new(store.clone());
    let qr_service = QrService::new(store.clone(), config.qr_defaults());
    let allocation_service =
        AllocationService::new(store.clone(), config.allocation.price_per_coconut);

    // Held until shutdown; dropping it stops the ticker
    let simulation = config.simulation.enabled.then(|| {
        spawn_position_simulation(
            tracking_service.clone(),
            config.tick_interval(),
            StdRng::from_entropy(),
        )
    });

    let state = Arc::new(AppState {
        tracking_service,
        route_service,
        dashboard_service,
        qr_service,
        allocation_service,
    });

    // Build router (presentation layer)
    let router = build_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting field-sales-tracker on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown requested, closing live streams");
            store.close();
        })
        .await?;

    if let Some(handle) = simulation {
        if handle.is_finished() {
            tracing::warn!("Position simulation had already stopped");
        }
        handle.cancel();
    }
    tracing::info!("Shut down");

    Ok(())
}

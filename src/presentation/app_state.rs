// Application state for HTTP handlers
use crate::application::allocation_service::AllocationService;
use crate::application::dashboard_service::DashboardService;
use crate::application::qr_service::QrService;
use crate::application::route_service::RouteService;
use crate::application::tracking_service::TrackingService;

#[derive(Clone)]
pub struct AppState {
    pub tracking_service: TrackingService,
    pub route_service: RouteService,
    pub dashboard_service: DashboardService,
    pub qr_service: QrService,
    pub allocation_service: AllocationService,
}

// Application layer - Use cases over the live state store
pub mod allocation_service;
pub mod dashboard_service;
pub mod field_repository;
pub mod qr_service;
pub mod route_service;
pub mod simulation;
pub mod state_store;
pub mod tracking_service;

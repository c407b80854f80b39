// Domain layer - Entities and pure rules
pub mod allocation;
pub mod camera;
pub mod dashboard;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod inventory;
pub mod notification;
pub mod qr;
pub mod route;
pub mod sale;
pub mod salesperson;

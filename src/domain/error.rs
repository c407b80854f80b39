// Domain errors
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid QR code format")]
    MalformedPayload,

    #[error("Invalid QR code: Missing coconut identifier")]
    MissingCoconutId,

    #[error("Salesperson {0} not found")]
    UnknownSalesperson(String),

    #[error("Geofence {0} not found")]
    UnknownGeofence(String),

    #[error("Route {0} not found")]
    UnknownRoute(String),

    #[error("Allocation {0} not found")]
    UnknownAllocation(String),

    #[error("Allocation {0} has no unclaimed deficit")]
    SpoilageNotClaimable(String),
}

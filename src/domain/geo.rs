// Geographic primitives shared by salespeople, geofences and routes
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn offset(&self, lat_delta: f64, lng_delta: f64) -> Self {
        Self {
            lat: self.lat + lat_delta,
            lng: self.lng + lng_delta,
        }
    }
}

/// Great-circle distance between two points in meters (haversine formula)
pub fn haversine_distance(from: LatLng, to: LatLng) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

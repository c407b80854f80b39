// Map camera: center, zoom and the focused entities
use super::geo::LatLng;
use super::geofence::Geofence;
use super::salesperson::{Salesperson, find_salesperson};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub default_center: LatLng,
    pub default_zoom: u8,
    pub salesperson_zoom: u8,
    pub geofence_zoom: u8,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(40.725037, -73.995974),
            default_zoom: 13,
            salesperson_zoom: 16,
            geofence_zoom: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub active_salesperson: Option<String>,
    pub active_geofence: Option<String>,
}

impl MapView {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            center: settings.default_center,
            zoom: settings.default_zoom,
            active_salesperson: None,
            active_geofence: None,
        }
    }

    /// `None` when the id is unknown. The active geofence is kept.
    pub fn focus_on_salesperson(
        &self,
        people: &[Salesperson],
        id: &str,
        settings: &CameraSettings,
    ) -> Option<Self> {
        let salesperson = find_salesperson(people, id)?;
        Some(Self {
            center: salesperson.position,
            zoom: settings.salesperson_zoom,
            active_salesperson: Some(salesperson.id.clone()),
            active_geofence: self.active_geofence.clone(),
        })
    }

    /// `None` when the id is unknown. The active salesperson is kept.
    pub fn focus_on_geofence(
        &self,
        fences: &[Geofence],
        id: &str,
        settings: &CameraSettings,
    ) -> Option<Self> {
        let fence = fences.iter().find(|f| f.id == id)?;
        Some(Self {
            center: fence.center,
            zoom: settings.geofence_zoom,
            active_salesperson: self.active_salesperson.clone(),
            active_geofence: Some(fence.id.clone()),
        })
    }

    pub fn without_geofence(&self, id: &str) -> Self {
        let mut next = self.clone();
        if next.active_geofence.as_deref() == Some(id) {
            next.active_geofence = None;
        }
        next
    }
}

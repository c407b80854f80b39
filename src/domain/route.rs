// Route domain model and the waypoint randomizer
use super::geo::LatLng;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointType {
    Customer,
    Prospect,
    Checkpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WaypointType,
    pub visited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
}

impl Waypoint {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub salesperson_id: String,
    pub waypoints: Vec<Waypoint>,
    pub optimized: bool,
    /// Kilometers
    pub total_distance: f64,
    /// Minutes
    pub total_duration: u32,
}

/// Knobs for the simulated optimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizeParams {
    pub eta_spacing: Duration,
    pub duration_factor: f64,
}

impl Default for RandomizeParams {
    fn default() -> Self {
        Self {
            eta_spacing: Duration::minutes(15),
            duration_factor: 0.8,
        }
    }
}

impl Route {
    /// Simulated optimization: visited waypoints keep their order at the
    /// front, the rest are shuffled (Fisher-Yates) and given fresh ETAs
    /// spaced from `now`. Distance is left alone; duration is scaled and
    /// rounded half away from zero.
    pub fn randomized<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        params: &RandomizeParams,
    ) -> Self {
        let (mut waypoints, mut pending): (Vec<Waypoint>, Vec<Waypoint>) =
            self.waypoints.iter().cloned().partition(|wp| wp.visited);

        pending.shuffle(rng);

        for (idx, wp) in pending.iter_mut().enumerate() {
            wp.estimated_arrival = Some(now + params.eta_spacing * (idx as i32 + 1));
        }

        waypoints.extend(pending);

        Self {
            waypoints,
            optimized: true,
            total_duration: scaled_duration(self.total_duration, params.duration_factor),
            ..self.clone()
        }
    }

    pub fn visited_count(&self) -> usize {
        self.waypoints.iter().filter(|wp| wp.visited).count()
    }

    /// Percentage of waypoints visited, 0 for an empty route
    pub fn progress(&self) -> f64 {
        if self.waypoints.is_empty() {
            return 0.0;
        }
        self.visited_count() as f64 / self.waypoints.len() as f64 * 100.0
    }
}

fn scaled_duration(minutes: u32, factor: f64) -> u32 {
    (minutes as f64 * factor).round().max(0.0) as u32
}

#[cfg(test)]
pub(crate) fn test_waypoint(name: &str, visited: bool) -> Waypoint {
    Waypoint {
        lat: 40.71,
        lng: -74.0,
        name: name.to_string(),
        kind: WaypointType::Prospect,
        visited,
        estimated_arrival: None,
    }
}

// Salesperson domain model
use super::geo::LatLng;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Label shown wherever a salesperson id does not resolve
pub const UNKNOWN_SALESPERSON: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalespersonStatus {
    Active,
    Idle,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salesperson {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub position: LatLng,
    pub status: SalespersonStatus,
    pub last_active: DateTime<Utc>,
    pub sales_for_today: f64,
    pub target_for_today: f64,
    pub assigned_area: String,
}

impl Salesperson {
    pub fn is_active(&self) -> bool {
        self.status == SalespersonStatus::Active
    }

    /// Returns a copy nudged by an independent uniform offset in
    /// `[-max_offset, max_offset]` degrees on each axis. Only active
    /// salespeople move; the walk is unbounded. A negative or non-finite
    /// bound leaves everyone in place.
    pub fn jittered<R: Rng + ?Sized>(&self, rng: &mut R, max_offset: f64) -> Self {
        if !self.is_active() || !(max_offset.is_finite() && max_offset >= 0.0) {
            return self.clone();
        }

        let lat_delta = rng.gen_range(-max_offset..=max_offset);
        let lng_delta = rng.gen_range(-max_offset..=max_offset);

        Self {
            position: self.position.offset(lat_delta, lng_delta),
            ..self.clone()
        }
    }
}

pub fn find_salesperson<'a>(people: &'a [Salesperson], id: &str) -> Option<&'a Salesperson> {
    people.iter().find(|sp| sp.id == id)
}

pub fn salesperson_name(people: &[Salesperson], id: &str) -> String {
    find_salesperson(people, id)
        .map(|sp| sp.name.clone())
        .unwrap_or_else(|| UNKNOWN_SALESPERSON.to_string())
}

#[cfg(test)]
pub(crate) fn test_salesperson(
    id: &str,
    status: SalespersonStatus,
    position: LatLng,
) -> Salesperson {
    Salesperson {
        id: id.to_string(),
        name: format!("Rep {}", id),
        email: format!("{}@example.com", id),
        phone: "(555) 000-0000".to_string(),
        avatar: String::new(),
        position,
        status,
        last_active: Utc::now(),
        sales_for_today: 1000.0,
        target_for_today: 5000.0,
        assigned_area: "Downtown".to_string(),
    }
}

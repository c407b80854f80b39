// Geofence domain model and containment
use super::geo::{LatLng, haversine_distance};
use super::salesperson::Salesperson;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: String,
    pub name: String,
    pub center: LatLng,
    /// Radius in meters
    pub radius: f64,
    pub color: String,
    /// Assigned salesperson ids
    pub assigned: Vec<String>,
}

impl Geofence {
    /// Boundary inclusive
    pub fn contains(&self, point: LatLng) -> bool {
        haversine_distance(self.center, point) <= self.radius
    }

    pub fn is_assigned(&self, salesperson_id: &str) -> bool {
        self.assigned.iter().any(|id| id == salesperson_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedMember {
    pub salesperson_id: String,
    pub name: String,
    pub in_zone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceOccupancy {
    pub geofence_id: String,
    /// Everyone currently inside, assigned or not
    pub inside: Vec<String>,
    pub assigned: Vec<AssignedMember>,
}

impl GeofenceOccupancy {
    pub fn compute(fence: &Geofence, people: &[Salesperson]) -> Self {
        let inside: Vec<String> = people
            .iter()
            .filter(|sp| fence.contains(sp.position))
            .map(|sp| sp.id.clone())
            .collect();

        // Dangling assignments are skipped, the same way the list view drops them
        let assigned = people
            .iter()
            .filter(|sp| fence.is_assigned(&sp.id))
            .map(|sp| AssignedMember {
                salesperson_id: sp.id.clone(),
                name: sp.name.clone(),
                in_zone: inside.contains(&sp.id),
            })
            .collect();

        Self {
            geofence_id: fence.id.clone(),
            inside,
            assigned,
        }
    }
}

/// Ids of every geofence containing the point
pub fn fences_containing(fences: &[Geofence], point: LatLng) -> Vec<String> {
    fences
        .iter()
        .filter(|f| f.contains(point))
        .map(|f| f.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::salesperson::{SalespersonStatus, test_salesperson};

    fn fence(center: LatLng, radius: f64) -> Geofence {
        Geofence {
            id: "geo1".to_string(),
            name: "Downtown Core".to_string(),
            center,
            radius,
            color: "#8B5CF6".to_string(),
            assigned: vec!["sp1".to_string(), "sp3".to_string()],
        }
    }

    #[test]
    fn test_center_is_inside() {
        let center = LatLng::new(40.7128, -74.0060);
        assert!(fence(center, 1000.0).contains(center));
    }

    #[test]
    fn test_far_point_is_outside() {
        let f = fence(LatLng::new(40.7128, -74.0060), 1000.0);
        assert!(!f.contains(LatLng::new(41.0, -74.0)));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = LatLng::new(40.7128, -74.0060);
        let point = LatLng::new(40.7200, -74.0010);
        let radius = haversine_distance(center, point);

        assert!(fence(center, radius).contains(point));
        assert!(!fence(center, radius - 0.01).contains(point));
    }

    #[test]
    fn test_zero_radius_only_holds_center() {
        let center = LatLng::new(40.7128, -74.0060);
        let f = fence(center, 0.0);
        assert!(f.contains(center));
        assert!(!f.contains(center.offset(0.0001, 0.0)));
    }

    #[test]
    fn test_occupancy() {
        let center = LatLng::new(40.712776, -74.005974);
        let f = fence(center, 1000.0);
        let people = vec![
            test_salesperson("sp1", SalespersonStatus::Active, center),
            test_salesperson("sp2", SalespersonStatus::Active, center.offset(0.001, 0.0)),
            test_salesperson("sp3", SalespersonStatus::Idle, LatLng::new(40.742054, -73.992449)),
        ];

        let occupancy = GeofenceOccupancy::compute(&f, &people);

        assert_eq!(occupancy.inside, vec!["sp1".to_string(), "sp2".to_string()]);
        assert_eq!(occupancy.assigned.len(), 2);
        assert!(occupancy.assigned[0].in_zone);
        assert_eq!(occupancy.assigned[1].salesperson_id, "sp3");
        assert!(!occupancy.assigned[1].in_zone);
    }

    #[test]
    fn test_fences_containing() {
        let center = LatLng::new(40.712776, -74.005974);
        let fences = vec![fence(center, 1000.0)];
        assert_eq!(fences_containing(&fences, center), vec!["geo1".to_string()]);
        assert!(fences_containing(&fences, LatLng::new(41.0, -74.0)).is_empty());
    }
}

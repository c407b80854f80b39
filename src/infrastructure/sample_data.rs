// In-memory sample data repository
use crate::application::field_repository::FieldDataRepository;
use crate::domain::allocation::{Allocation, AllocationStatus};
use crate::domain::geo::LatLng;
use crate::domain::geofence::Geofence;
use crate::domain::inventory::Coconut;
use crate::domain::qr::ScanLocation;
use crate::domain::route::{Route, Waypoint, WaypointType};
use crate::domain::sale::{LineItem, PaymentMethod, Sale, SaleLocation, SaleStatus};
use crate::domain::salesperson::{Salesperson, SalespersonStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Serves the demo dataset with timestamps relative to `now`
#[derive(Debug, Clone)]
pub struct SampleDataRepository {
    now: DateTime<Utc>,
}

impl SampleDataRepository {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    fn minutes_ago(&self, minutes: i64) -> DateTime<Utc> {
        self.now - Duration::minutes(minutes)
    }

    fn minutes_ahead(&self, minutes: i64) -> DateTime<Utc> {
        self.now + Duration::minutes(minutes)
    }

    fn salesperson(
        &self,
        (id, name, email, phone): (&str, &str, &str, &str),
        avatar: u8,
        position: LatLng,
        status: SalespersonStatus,
        idle_minutes: i64,
        (sales_for_today, assigned_area): (f64, &str),
    ) -> Salesperson {
        Salesperson {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            avatar: format!("https://i.pravatar.cc/150?img={}", avatar),
            position,
            status,
            last_active: self.minutes_ago(idle_minutes),
            sales_for_today,
            target_for_today: 5000.0,
            assigned_area: assigned_area.to_string(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn sale(
        &self,
        id: &str,
        salesperson_id: &str,
        (customer_name, amount): (&str, f64),
        products: Vec<LineItem>,
        minutes_ago: i64,
        (lat, lng, address): (f64, f64, &str),
        payment_method: PaymentMethod,
    ) -> Sale {
        Sale {
            id: id.to_string(),
            salesperson_id: salesperson_id.to_string(),
            customer_name: customer_name.to_string(),
            amount,
            products,
            timestamp: self.minutes_ago(minutes_ago),
            location: SaleLocation {
                lat,
                lng,
                address: address.to_string(),
            },
            payment_method,
            status: SaleStatus::Completed,
        }
    }

    fn waypoint(
        &self,
        (lat, lng): (f64, f64),
        name: &str,
        kind: WaypointType,
        visited: bool,
        eta_offset_minutes: i64,
    ) -> Waypoint {
        Waypoint {
            lat,
            lng,
            name: name.to_string(),
            kind,
            visited,
            estimated_arrival: Some(self.minutes_ahead(eta_offset_minutes)),
        }
    }
}

fn item(id: &str, name: &str, quantity: u32, unit_price: f64) -> LineItem {
    LineItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit_price,
    }
}

fn fence(
    id: &str,
    name: &str,
    center: LatLng,
    radius: f64,
    color: &str,
    assigned: &[&str],
) -> Geofence {
    Geofence {
        id: id.to_string(),
        name: name.to_string(),
        center,
        radius,
        color: color.to_string(),
        assigned: assigned.iter().map(|s| s.to_string()).collect(),
    }
}

fn premium(quantity: u32) -> LineItem {
    item("p1", "Premium Package", quantity, 1250.0)
}

fn basic() -> LineItem {
    item("p2", "Basic Package", 1, 850.0)
}

fn support(quantity: u32) -> LineItem {
    item("p3", "Additional Support", quantity, 300.0)
}

fn analytics() -> LineItem {
    item("p4", "Analytics Add-on", 1, 500.0)
}

#[async_trait]
impl FieldDataRepository for SampleDataRepository {
    async fn load_salespeople(&self) -> Result<Vec<Salesperson>> {
        use SalespersonStatus::*;

        Ok(vec![
            self.salesperson(
                ("sp1", "Alex Johnson", "alex.j@example.com", "(555) 123-4567"),
                1,
                LatLng::new(40.712776, -74.005974),
                Active,
                0,
                (3250.0, "Downtown"),
            ),
            self.salesperson(
                ("sp2", "Morgan Smith", "morgan.s@example.com", "(555) 234-5678"),
                2,
                LatLng::new(40.718234, -73.998438),
                Active,
                0,
                (4750.0, "Midtown"),
            ),
            self.salesperson(
                ("sp3", "Jamie Rivera", "jamie.r@example.com", "(555) 345-6789"),
                3,
                LatLng::new(40.707637, -74.011953),
                Idle,
                15,
                (2800.0, "Financial District"),
            ),
            self.salesperson(
                ("sp4", "Taylor Wu", "taylor.w@example.com", "(555) 456-7890"),
                4,
                LatLng::new(40.725037, -73.987563),
                Offline,
                120,
                (1500.0, "East Village"),
            ),
            self.salesperson(
                ("sp5", "Jordan Patel", "jordan.p@example.com", "(555) 567-8901"),
                5,
                LatLng::new(40.742054, -73.992449),
                Active,
                0,
                (6200.0, "Chelsea"),
            ),
        ])
    }

    async fn load_sales(&self) -> Result<Vec<Sale>> {
        use PaymentMethod::*;

        Ok(vec![
            self.sale(
                "sale1",
                "sp1",
                ("Acme Corp", 1250.0),
                vec![premium(1)],
                30,
                (40.712776, -74.005974, "123 Broadway, New York, NY"),
                Credit,
            ),
            self.sale(
                "sale2",
                "sp1",
                ("Global Tech", 850.0),
                vec![basic()],
                120,
                (40.713825, -74.006037, "85 Chambers St, New York, NY"),
                Online,
            ),
            self.sale(
                "sale3",
                "sp2",
                ("Citywide Services", 2450.0),
                vec![premium(1), support(4)],
                60,
                (40.718234, -73.998438, "401 Park Ave S, New York, NY"),
                Debit,
            ),
            self.sale(
                "sale4",
                "sp2",
                ("Metro Media", 850.0),
                vec![basic()],
                180,
                (40.719078, -73.997920, "220 5th Ave, New York, NY"),
                Cash,
            ),
            self.sale(
                "sale5",
                "sp3",
                ("Urban Outfitters", 1750.0),
                vec![premium(1), analytics()],
                240,
                (40.707637, -74.011953, "52 Broadway, New York, NY"),
                Credit,
            ),
            self.sale(
                "sale6",
                "sp5",
                ("Tech Innovations", 3200.0),
                vec![premium(2), analytics(), support(2)],
                350,
                (40.742054, -73.992449, "675 6th Ave, New York, NY"),
                Online,
            ),
        ])
    }

    async fn load_geofences(&self) -> Result<Vec<Geofence>> {
        Ok(vec![
            fence(
                "geo1",
                "Downtown Core",
                LatLng::new(40.712776, -74.005974),
                1000.0,
                "#8B5CF6",
                &["sp1", "sp3"],
            ),
            fence(
                "geo2",
                "Midtown Central",
                LatLng::new(40.718234, -73.998438),
                1200.0,
                "#0EA5E9",
                &["sp2"],
            ),
            fence(
                "geo3",
                "East Village Zone",
                LatLng::new(40.725037, -73.987563),
                800.0,
                "#F97316",
                &["sp4"],
            ),
            fence(
                "geo4",
                "Chelsea District",
                LatLng::new(40.742054, -73.992449),
                900.0,
                "#10B981",
                &["sp5"],
            ),
        ])
    }

    async fn load_routes(&self) -> Result<Vec<Route>> {
        use WaypointType::*;

        Ok(vec![
            Route {
                id: "route1".to_string(),
                salesperson_id: "sp1".to_string(),
                waypoints: vec![
                    self.waypoint((40.712776, -74.005974), "Acme Corp", Customer, true, -30),
                    self.waypoint((40.713825, -74.006037), "Global Tech", Customer, true, -120),
                    self.waypoint((40.710086, -74.012693), "Hudson Financial", Prospect, false, 30),
                    self.waypoint(
                        (40.707176, -74.009301),
                        "Wall Street Plaza",
                        Prospect,
                        false,
                        90,
                    ),
                ],
                optimized: true,
                total_distance: 2.3,
                total_duration: 45,
            },
            Route {
                id: "route2".to_string(),
                salesperson_id: "sp2".to_string(),
                waypoints: vec![
                    self.waypoint(
                        (40.718234, -73.998438),
                        "Citywide Services",
                        Customer,
                        true,
                        -60,
                    ),
                    self.waypoint((40.719078, -73.997920), "Metro Media", Customer, true, -180),
                    self.waypoint((40.721872, -73.996673), "Empire Solutions", Prospect, false, 20),
                    self.waypoint(
                        (40.724708, -73.999632),
                        "Midtown Checkpoint",
                        Checkpoint,
                        false,
                        60,
                    ),
                ],
                optimized: true,
                total_distance: 1.8,
                total_duration: 35,
            },
            Route {
                id: "route3".to_string(),
                salesperson_id: "sp5".to_string(),
                waypoints: vec![
                    self.waypoint(
                        (40.742054, -73.992449),
                        "Tech Innovations",
                        Customer,
                        true,
                        -350,
                    ),
                    self.waypoint((40.743870, -73.995143), "Chelsea Market", Checkpoint, false, 15),
                    self.waypoint((40.746670, -73.991235), "Highline Tech", Prospect, false, 45),
                    self.waypoint((40.749825, -73.987562), "Hudson Yards Hub", Prospect, false, 90),
                ],
                optimized: true,
                total_distance: 2.5,
                total_duration: 50,
            },
        ])
    }

    async fn load_inventory(&self) -> Result<Vec<Coconut>> {
        let day = 24 * 60;
        let located = |lat: f64, lng: f64| {
            Some(ScanLocation {
                lat,
                lng,
                accuracy: 0.0,
            })
        };

        Ok(vec![
            Coconut {
                id: "COCO-1620156789-1".to_string(),
                kind: "regular".to_string(),
                added_at: self.minutes_ago(3 * day),
                sold_at: Some(self.minutes_ago(5 * 60)),
                returned_at: None,
                location: located(40.712776, -74.005974),
                sale_amount: 5.99,
            },
            Coconut {
                id: "COCO-1620156789-2".to_string(),
                kind: "premium".to_string(),
                added_at: self.minutes_ago(2 * day),
                sold_at: Some(self.minutes_ago(3 * 60)),
                returned_at: None,
                location: located(40.718234, -73.998546),
                sale_amount: 8.99,
            },
            Coconut {
                id: "COCO-1620156789-3".to_string(),
                kind: "young".to_string(),
                added_at: self.minutes_ago(day),
                sold_at: None,
                returned_at: None,
                location: None,
                sale_amount: 0.0,
            },
            Coconut {
                id: "COCO-1620156789-4".to_string(),
                kind: "organic".to_string(),
                added_at: self.minutes_ago(day),
                sold_at: None,
                returned_at: None,
                location: None,
                sale_amount: 0.0,
            },
        ])
    }

    async fn load_allocations(&self) -> Result<Vec<Allocation>> {
        Ok(vec![
            Allocation {
                id: "ALLOC-001".to_string(),
                salesperson_id: "sp1".to_string(),
                salesperson_name: "Alex Johnson".to_string(),
                quantity_allocated: 10,
                quantity_sold: 10,
                expected_revenue: 50.0,
                actual_revenue: 50.0,
                status: AllocationStatus::Correct,
                timestamp: self.minutes_ago(2 * 60),
                transaction_id: "MOMO-12345".to_string(),
                deposit_reference: "Alex Johnson".to_string(),
                deposit_confirmed: true,
                spoilage_claims: None,
                spoilage_evidence: Vec::new(),
            },
            Allocation {
                id: "ALLOC-002".to_string(),
                salesperson_id: "sp2".to_string(),
                salesperson_name: "Morgan Smith".to_string(),
                quantity_allocated: 8,
                quantity_sold: 7,
                expected_revenue: 40.0,
                actual_revenue: 35.0,
                status: AllocationStatus::Deficit,
                timestamp: self.minutes_ago(5 * 60),
                transaction_id: "MOMO-12346".to_string(),
                deposit_reference: "Morgan Smith".to_string(),
                deposit_confirmed: true,
                spoilage_claims: Some(1),
                spoilage_evidence: vec!["spoilt-evidence-1.jpg".to_string()],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sales_dataset() {
        let repo = SampleDataRepository::new(Utc::now());
        let sales = repo.load_sales().await.unwrap();

        let amounts: Vec<f64> = sales.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![1250.0, 850.0, 2450.0, 850.0, 1750.0, 3200.0]);
        assert_eq!(sales[2].products.iter().map(LineItem::subtotal).sum::<f64>(), 2450.0);
    }

    #[tokio::test]
    async fn test_references_resolve() {
        let repo = SampleDataRepository::new(Utc::now());
        let people = repo.load_salespeople().await.unwrap();
        let known = |id: &str| people.iter().any(|sp| sp.id == id);

        assert!(repo.load_sales().await.unwrap().iter().all(|s| known(&s.salesperson_id)));
        assert!(repo.load_routes().await.unwrap().iter().all(|r| known(&r.salesperson_id)));
        assert!(
            repo.load_geofences()
                .await
                .unwrap()
                .iter()
                .all(|g| g.assigned.iter().all(|id| known(id)))
        );
    }

    #[tokio::test]
    async fn test_timestamps_are_relative_to_now() {
        let now = Utc::now();
        let repo = SampleDataRepository::new(now);
        let people = repo.load_salespeople().await.unwrap();

        assert_eq!(people[0].last_active, now);
        assert_eq!(people[3].last_active, now - Duration::minutes(120));
    }

    #[tokio::test]
    async fn test_inventory() {
        let repo = SampleDataRepository::new(Utc::now());
        let inventory = repo.load_inventory().await.unwrap();
        assert_eq!(inventory.iter().filter(|c| c.is_sold()).count(), 2);
        assert_eq!(inventory.iter().filter(|c| c.is_available()).count(), 2);
    }

    #[tokio::test]
    async fn test_allocations_settle_consistently() {
        let repo = SampleDataRepository::new(Utc::now());
        let allocations = repo.load_allocations().await.unwrap();

        assert_eq!(allocations.len(), 2);
        for allocation in &allocations {
            let settled =
                allocation.verified(&allocation.transaction_id, allocation.actual_revenue);
            assert_eq!(settled.status, allocation.status);
        }
        assert_eq!(
            allocations[1].claimable_spoilage(5.0),
            allocations[1].spoilage_claims.unwrap()
        );
    }
}

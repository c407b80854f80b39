// Dashboard aggregates: team overview and sales analytics
use super::route::Route;
use super::sale::{
    HourlySales, PaymentMethodCount, ProductSummary, Sale, payment_method_breakdown,
    product_breakdown, sales_by_hour,
};
use super::salesperson::{Salesperson, SalespersonStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    pub active: usize,
    pub idle: usize,
    pub offline: usize,
    pub total_target: f64,
    pub total_sales: f64,
    /// Percentage, 0 when nobody has a target
    pub target_completion: f64,
}

impl TeamOverview {
    pub fn from_salespeople(people: &[Salesperson]) -> Self {
        let count =
            |status: SalespersonStatus| people.iter().filter(|sp| sp.status == status).count();
        let total_target: f64 = people.iter().map(|sp| sp.target_for_today).sum();
        let total_sales: f64 = people.iter().map(|sp| sp.sales_for_today).sum();

        let target_completion = if total_target > 0.0 {
            total_sales / total_target * 100.0
        } else {
            0.0
        };

        Self {
            active: count(SalespersonStatus::Active),
            idle: count(SalespersonStatus::Idle),
            offline: count(SalespersonStatus::Offline),
            total_target,
            total_sales,
            target_completion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonDetail {
    pub salesperson: Salesperson,
    pub route: Option<Route>,
    pub route_progress: f64,
}

impl SalespersonDetail {
    /// Pairs the salesperson with the first route assigned to them
    pub fn new(salesperson: Salesperson, routes: &[Route]) -> Self {
        let route = routes
            .iter()
            .find(|r| r.salesperson_id == salesperson.id)
            .cloned();
        let route_progress = route.as_ref().map(Route::progress).unwrap_or(0.0);

        Self {
            salesperson,
            route,
            route_progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: usize,
    pub total_amount: f64,
    pub by_hour: Vec<HourlySales>,
    pub payment_methods: Vec<PaymentMethodCount>,
    pub products: Vec<ProductSummary>,
}

impl SalesSummary {
    pub fn from_sales(sales: &[Sale]) -> Self {
        Self {
            total_sales: sales.len(),
            total_amount: sales.iter().map(|s| s.amount).sum(),
            by_hour: sales_by_hour(sales),
            payment_methods: payment_method_breakdown(sales),
            products: product_breakdown(sales),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::LatLng;
    use crate::domain::route::test_waypoint;
    use crate::domain::sale::{PaymentMethod, test_sale};
    use crate::domain::salesperson::test_salesperson;
    use chrono::Utc;

    #[test]
    fn test_team_overview() {
        let origin = LatLng::new(40.7, -74.0);
        let mut people = vec![
            test_salesperson("sp1", SalespersonStatus::Active, origin),
            test_salesperson("sp2", SalespersonStatus::Active, origin),
            test_salesperson("sp3", SalespersonStatus::Idle, origin),
            test_salesperson("sp4", SalespersonStatus::Offline, origin),
        ];
        people[0].sales_for_today = 5000.0;

        let overview = TeamOverview::from_salespeople(&people);

        assert_eq!((overview.active, overview.idle, overview.offline), (2, 1, 1));
        assert_eq!(overview.total_target, 20000.0);
        assert_eq!(overview.total_sales, 8000.0);
        assert_eq!(overview.target_completion, 40.0);
    }

    #[test]
    fn test_empty_team_has_zero_completion() {
        let overview = TeamOverview::from_salespeople(&[]);
        assert_eq!(overview.target_completion, 0.0);
    }

    #[test]
    fn test_salesperson_detail_picks_first_route() {
        let sp = test_salesperson("sp1", SalespersonStatus::Active, LatLng::new(40.7, -74.0));
        let route = Route {
            id: "route1".to_string(),
            salesperson_id: "sp1".to_string(),
            waypoints: vec![test_waypoint("a", true), test_waypoint("b", false)],
            optimized: false,
            total_distance: 1.0,
            total_duration: 10,
        };
        let other = Route {
            id: "route2".to_string(),
            salesperson_id: "sp2".to_string(),
            ..route.clone()
        };

        let detail = SalespersonDetail::new(sp, &[other, route]);

        assert_eq!(detail.route.map(|r| r.id), Some("route1".to_string()));
        assert_eq!(detail.route_progress, 50.0);
    }

    #[test]
    fn test_salesperson_without_route() {
        let sp = test_salesperson("sp4", SalespersonStatus::Offline, LatLng::new(40.7, -74.0));
        let detail = SalespersonDetail::new(sp, &[]);
        assert!(detail.route.is_none());
        assert_eq!(detail.route_progress, 0.0);
    }

    #[test]
    fn test_sales_summary_totals() {
        let now = Utc::now();
        let sales = vec![
            test_sale("sale1", "Acme Corp", 1250.0, now, PaymentMethod::Credit),
            test_sale("sale2", "Global Tech", 850.0, now, PaymentMethod::Online),
        ];

        let summary = SalesSummary::from_sales(&sales);

        assert_eq!(summary.total_sales, 2);
        assert_eq!(summary.total_amount, 2100.0);
        assert_eq!(summary.by_hour.len(), 24);
        assert_eq!(summary.payment_methods.len(), 2);
    }
}

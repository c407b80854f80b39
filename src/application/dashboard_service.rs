// Dashboard service - Sales list, sales analytics and team overview
use crate::application::state_store::LiveStateStore;
use crate::domain::dashboard::{SalesSummary, SalespersonDetail, TeamOverview};
use crate::domain::error::DomainError;
use crate::domain::sale::{Sale, SortDirection, SortField, sort_sales};
use crate::domain::salesperson::{find_salesperson, salesperson_name};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRow {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// A sale as the list view shows it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    #[serde(flatten)]
    pub sale: Sale,
    pub salesperson_name: String,
    pub line_items: Vec<LineItemRow>,
}

#[derive(Clone)]
pub struct DashboardService {
    store: LiveStateStore,
}

impl DashboardService {
    pub fn new(store: LiveStateStore) -> Self {
        Self { store }
    }

    pub fn list_sales(&self, field: SortField, direction: SortDirection) -> Vec<SaleRow> {
        let snapshot = self.store.snapshot();

        sort_sales(&snapshot.sales, field, direction)
            .into_iter()
            .map(|sale| SaleRow {
                salesperson_name: salesperson_name(&snapshot.salespeople, &sale.salesperson_id),
                line_items: sale
                    .products
                    .iter()
                    .map(|item| LineItemRow {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        unit_price: item.unit_price,
                        subtotal: item.subtotal(),
                    })
                    .collect(),
                sale,
            })
            .collect()
    }

    pub fn sales_summary(&self) -> SalesSummary {
        SalesSummary::from_sales(&self.store.snapshot().sales)
    }

    pub fn team_overview(&self) -> TeamOverview {
        TeamOverview::from_salespeople(&self.store.snapshot().salespeople)
    }

    pub fn salesperson_detail(&self, id: &str) -> Result<SalespersonDetail, DomainError> {
        let snapshot = self.store.snapshot();
        let salesperson = find_salesperson(&snapshot.salespeople, id)
            .ok_or_else(|| DomainError::UnknownSalesperson(id.to_string()))?;

        Ok(SalespersonDetail::new(salesperson.clone(), &snapshot.routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state_store::{LiveStateStore, Snapshot};
    use crate::domain::camera::{CameraSettings, MapView};
    use crate::domain::geo::LatLng;
    use crate::domain::sale::{PaymentMethod, test_sale};
    use crate::domain::salesperson::{SalespersonStatus, UNKNOWN_SALESPERSON, test_salesperson};
    use chrono::{Duration, Utc};

    fn service() -> DashboardService {
        let now = Utc::now();
        let mut orphan = test_sale(
            "sale3",
            "Urban Outfitters",
            1750.0,
            now - Duration::minutes(240),
            PaymentMethod::Credit,
        );
        orphan.salesperson_id = "sp9".to_string();

        let store = LiveStateStore::new(Snapshot::new(
            vec![
                test_salesperson("sp1", SalespersonStatus::Active, LatLng::new(40.7, -74.0)),
                test_salesperson("sp2", SalespersonStatus::Idle, LatLng::new(40.7, -74.0)),
            ],
            vec![
                test_sale(
                    "sale1",
                    "Acme Corp",
                    1250.0,
                    now - Duration::minutes(30),
                    PaymentMethod::Credit,
                ),
                test_sale(
                    "sale2",
                    "Global Tech",
                    850.0,
                    now - Duration::minutes(120),
                    PaymentMethod::Online,
                ),
                orphan,
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            MapView::new(&CameraSettings::default()),
        ));
        DashboardService::new(store)
    }

    #[test]
    fn test_list_sales_resolves_names() {
        let rows = service().list_sales(SortField::Timestamp, SortDirection::Desc);

        let ids: Vec<&str> = rows.iter().map(|r| r.sale.id.as_str()).collect();
        assert_eq!(ids, vec!["sale1", "sale2", "sale3"]);
        assert_eq!(rows[0].salesperson_name, "Rep sp1");
        assert_eq!(rows[2].salesperson_name, UNKNOWN_SALESPERSON);
        assert_eq!(rows[0].line_items[0].subtotal, 1250.0);
    }

    #[test]
    fn test_sale_row_flattens_sale() {
        let rows = service().list_sales(SortField::Amount, SortDirection::Desc);
        let json = serde_json::to_value(&rows[0]).unwrap();

        assert_eq!(json["id"], "sale3");
        assert_eq!(json["customerName"], "Urban Outfitters");
        assert_eq!(json["salespersonName"], "Unknown");
    }

    #[test]
    fn test_team_overview_and_detail() {
        let service = service();
        let overview = service.team_overview();
        assert_eq!(overview.active, 1);
        assert_eq!(overview.idle, 1);

        let detail = service.salesperson_detail("sp2").unwrap();
        assert_eq!(detail.salesperson.id, "sp2");
        assert!(detail.route.is_none());

        assert!(matches!(
            service.salesperson_detail("sp9"),
            Err(DomainError::UnknownSalesperson(_))
        ));
    }

    #[test]
    fn test_sales_summary() {
        let summary = service().sales_summary();
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.total_amount, 3850.0);
    }
}

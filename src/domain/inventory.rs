// Coconut inventory tracked through QR scans
use super::qr::{CoconutPayload, ScanLocation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coconut {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub added_at: DateTime<Utc>,
    pub sold_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
    pub location: Option<ScanLocation>,
    pub sale_amount: f64,
}

impl Coconut {
    pub fn from_scan(
        payload: &CoconutPayload,
        now: DateTime<Utc>,
        location: Option<ScanLocation>,
    ) -> Self {
        Self {
            id: payload.coconut_id.clone(),
            kind: payload.kind.clone(),
            added_at: now,
            sold_at: None,
            returned_at: None,
            location,
            sale_amount: 0.0,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.sold_at.is_some()
    }

    /// Neither sold nor returned
    pub fn is_available(&self) -> bool {
        self.sold_at.is_none() && self.returned_at.is_none()
    }

    pub fn sold(&self, now: DateTime<Utc>, amount: f64, location: Option<ScanLocation>) -> Self {
        Self {
            sold_at: Some(now),
            sale_amount: amount,
            location,
            ..self.clone()
        }
    }

    pub fn returned(&self, now: DateTime<Utc>, location: Option<ScanLocation>) -> Self {
        Self {
            returned_at: Some(now),
            location: location.or(self.location),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryFilter {
    #[default]
    All,
    Available,
    Sold,
}

impl InventoryFilter {
    pub fn matches(self, coconut: &Coconut) -> bool {
        match self {
            InventoryFilter::All => true,
            InventoryFilter::Available => coconut.is_available(),
            InventoryFilter::Sold => coconut.is_sold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub available: usize,
    pub sold: usize,
    pub returned: usize,
    pub total_revenue: f64,
}

impl InventorySummary {
    pub fn from_inventory(inventory: &[Coconut]) -> Self {
        Self {
            available: inventory.iter().filter(|c| c.is_available()).count(),
            sold: inventory.iter().filter(|c| c.is_sold()).count(),
            returned: inventory.iter().filter(|c| c.returned_at.is_some()).count(),
            total_revenue: inventory
                .iter()
                .filter(|c| c.is_sold())
                .map(|c| c.sale_amount)
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coconut(id: &str) -> Coconut {
        let payload = CoconutPayload {
            coconut_id: id.to_string(),
            kind: "regular".to_string(),
            batch_id: "COCO-1".to_string(),
            generated_at: None,
        };
        Coconut::from_scan(&payload, Utc::now(), None)
    }

    #[test]
    fn test_new_coconut_is_available() {
        let c = coconut("COCO-1-1");
        assert!(c.is_available());
        assert!(!c.is_sold());
        assert_eq!(c.sale_amount, 0.0);
    }

    #[test]
    fn test_filters() {
        let now = Utc::now();
        let inventory = vec![
            coconut("a"),
            coconut("b").sold(now, 5.99, None),
            coconut("c").returned(now, None),
        ];

        let pick = |filter: InventoryFilter| -> Vec<&str> {
            inventory
                .iter()
                .filter(|c| filter.matches(c))
                .map(|c| c.id.as_str())
                .collect()
        };

        assert_eq!(pick(InventoryFilter::All), vec!["a", "b", "c"]);
        assert_eq!(pick(InventoryFilter::Available), vec!["a"]);
        assert_eq!(pick(InventoryFilter::Sold), vec!["b"]);
    }

    #[test]
    fn test_summary() {
        let now = Utc::now();
        let inventory = vec![
            coconut("a"),
            coconut("b").sold(now, 5.99, None),
            coconut("c").sold(now, 8.99, None),
            coconut("d").returned(now, None),
        ];

        let summary = InventorySummary::from_inventory(&inventory);

        assert_eq!(summary.available, 1);
        assert_eq!(summary.sold, 2);
        assert_eq!(summary.returned, 1);
        assert!((summary.total_revenue - 14.98).abs() < 1e-9);
    }

    #[test]
    fn test_sale_records_location() {
        let location = ScanLocation {
            lat: 40.7,
            lng: -74.0,
            accuracy: 12.0,
        };
        let sold = coconut("a").sold(Utc::now(), 5.99, Some(location));
        assert_eq!(sold.location, Some(location));
        assert_eq!(sold.sale_amount, 5.99);
    }
}

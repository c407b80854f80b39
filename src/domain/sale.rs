// Sale domain model, ordering and aggregations
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub salesperson_id: String,
    pub customer_name: String,
    pub amount: f64,
    pub products: Vec<LineItem>,
    pub timestamp: DateTime<Utc>,
    pub location: SaleLocation,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Timestamp,
    Amount,
    Customer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortField {
    fn compare(self, a: &Sale, b: &Sale) -> Ordering {
        match self {
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Customer => a
                .customer_name
                .to_lowercase()
                .cmp(&b.customer_name.to_lowercase()),
        }
    }
}

/// Stable sort; equal keys keep their input order in both directions
pub fn sort_sales(sales: &[Sale], field: SortField, direction: SortDirection) -> Vec<Sale> {
    let mut sorted = sales.to_vec();
    sorted.sort_by(|a, b| match direction {
        SortDirection::Asc => field.compare(a, b),
        SortDirection::Desc => field.compare(b, a),
    });
    sorted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySales {
    pub hour: u32,
    pub hour_label: String,
    pub sales: usize,
    pub amount: f64,
}

/// 24 buckets keyed by the UTC hour of each sale
pub fn sales_by_hour(sales: &[Sale]) -> Vec<HourlySales> {
    (0..24)
        .map(|hour| {
            let in_hour: Vec<&Sale> = sales.iter().filter(|s| s.timestamp.hour() == hour).collect();
            HourlySales {
                hour,
                hour_label: format!("{}:00", hour),
                sales: in_hour.len(),
                amount: in_hour.iter().map(|s| s.amount).sum(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodCount {
    pub name: PaymentMethod,
    pub value: usize,
}

/// Counts per payment method in order of first appearance
pub fn payment_method_breakdown(sales: &[Sale]) -> Vec<PaymentMethodCount> {
    let mut counts: Vec<PaymentMethodCount> = Vec::new();
    for sale in sales {
        match counts.iter_mut().find(|c| c.name == sale.payment_method) {
            Some(entry) => entry.value += 1,
            None => counts.push(PaymentMethodCount {
                name: sale.payment_method,
                value: 1,
            }),
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub quantity: u32,
    pub revenue: f64,
}

/// Quantity and revenue per product name in order of first appearance
pub fn product_breakdown(sales: &[Sale]) -> Vec<ProductSummary> {
    let mut products: Vec<ProductSummary> = Vec::new();
    for item in sales.iter().flat_map(|s| s.products.iter()) {
        match products.iter_mut().find(|p| p.name == item.name) {
            Some(entry) => {
                entry.quantity += item.quantity;
                entry.revenue += item.subtotal();
            }
            None => products.push(ProductSummary {
                name: item.name.clone(),
                quantity: item.quantity,
                revenue: item.subtotal(),
            }),
        }
    }
    products
}

#[cfg(test)]
pub(crate) fn test_sale(
    id: &str,
    customer: &str,
    amount: f64,
    timestamp: DateTime<Utc>,
    method: PaymentMethod,
) -> Sale {
    Sale {
        id: id.to_string(),
        salesperson_id: "sp1".to_string(),
        customer_name: customer.to_string(),
        amount,
        products: vec![LineItem {
            id: "p1".to_string(),
            name: "Premium Package".to_string(),
            quantity: 1,
            unit_price: amount,
        }],
        timestamp,
        location: SaleLocation {
            lat: 40.712776,
            lng: -74.005974,
            address: "123 Broadway, New York, NY".to_string(),
        },
        payment_method: method,
        status: SaleStatus::Completed,
    }
}

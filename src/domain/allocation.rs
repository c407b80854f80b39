// Coconut allocations - stock handed to a salesperson and settled against deposits
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Revenue expected for each allocated coconut
pub const DEFAULT_EXPECTED_PRICE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Pending,
    Correct,
    Deficit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub salesperson_id: String,
    pub salesperson_name: String,
    pub quantity_allocated: u32,
    pub quantity_sold: u32,
    pub expected_revenue: f64,
    pub actual_revenue: f64,
    pub status: AllocationStatus,
    pub timestamp: DateTime<Utc>,
    pub transaction_id: String,
    pub deposit_reference: String,
    pub deposit_confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoilage_claims: Option<u32>,
    #[serde(default)]
    pub spoilage_evidence: Vec<String>,
}

impl Allocation {
    /// A pending allocation expecting `quantity * price_per_coconut`.
    /// The deposit is referenced by the salesperson's name.
    pub fn new(
        id: String,
        salesperson_id: &str,
        salesperson_name: &str,
        quantity: u32,
        price_per_coconut: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            salesperson_id: salesperson_id.to_string(),
            salesperson_name: salesperson_name.to_string(),
            quantity_allocated: quantity,
            quantity_sold: 0,
            expected_revenue: f64::from(quantity) * price_per_coconut,
            actual_revenue: 0.0,
            status: AllocationStatus::Pending,
            timestamp: now,
            transaction_id: String::new(),
            deposit_reference: salesperson_name.to_string(),
            deposit_confirmed: false,
            spoilage_claims: None,
            spoilage_evidence: Vec::new(),
        }
    }

    /// Settles the allocation against a confirmed deposit. Anything short of
    /// the expected revenue is a deficit.
    pub fn verified(&self, transaction_id: &str, actual_revenue: f64) -> Self {
        let status = if actual_revenue >= self.expected_revenue {
            AllocationStatus::Correct
        } else {
            AllocationStatus::Deficit
        };

        Self {
            actual_revenue,
            status,
            transaction_id: transaction_id.to_string(),
            deposit_confirmed: true,
            ..self.clone()
        }
    }

    pub fn is_deficit(&self) -> bool {
        self.status == AllocationStatus::Deficit
    }

    pub fn has_spoilage_claim(&self) -> bool {
        self.spoilage_claims.is_some()
    }

    /// Coconuts the shortfall accounts for, rounded to the nearest whole one
    pub fn claimable_spoilage(&self, price_per_coconut: f64) -> u32 {
        if price_per_coconut <= 0.0 {
            return 0;
        }
        let shortfall = (self.expected_revenue - self.actual_revenue).max(0.0);
        (shortfall / price_per_coconut).round() as u32
    }

    pub fn with_spoilage(&self, evidence: Vec<String>, price_per_coconut: f64) -> Self {
        Self {
            spoilage_claims: Some(self.claimable_spoilage(price_per_coconut)),
            spoilage_evidence: evidence,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) fn test_allocation(id: &str, salesperson_id: &str, quantity: u32) -> Allocation {
    Allocation::new(
        id.to_string(),
        salesperson_id,
        &format!("Rep {}", salesperson_id),
        quantity,
        DEFAULT_EXPECTED_PRICE,
        Utc::now(),
    )
}

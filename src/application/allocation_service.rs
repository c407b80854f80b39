// Allocation service - hand out stock, verify deposits, record spoilage
use crate::application::state_store::LiveStateStore;
use crate::domain::allocation::{Allocation, AllocationStatus};
use crate::domain::error::DomainError;
use crate::domain::notification::{Notification, Severity};
use crate::domain::salesperson::find_salesperson;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ALLOCATION_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocation {
    pub salesperson_id: String,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositVerification {
    #[serde(default)]
    pub transaction_id: String,
    pub actual_amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpoilageReport {
    /// References to photos of the spoilt coconuts
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationRecorded {
    pub allocation: Allocation,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub allocation: Allocation,
    /// Set on a deficit: the shortfall should be backed by spoilage evidence
    pub spoilage_required: bool,
    pub notification: Notification,
}

#[derive(Clone)]
pub struct AllocationService {
    store: LiveStateStore,
    price_per_coconut: f64,
}

impl AllocationService {
    pub fn new(store: LiveStateStore, price_per_coconut: f64) -> Self {
        Self {
            store,
            price_per_coconut,
        }
    }

    /// Newest first
    pub fn list_allocations(&self) -> Vec<Allocation> {
        self.store.snapshot().allocations.as_ref().clone()
    }

    pub fn allocate(&self, request: NewAllocation) -> Result<AllocationRecorded, DomainError> {
        self.allocate_at(request, Utc::now())
    }

    pub fn allocate_at(
        &self,
        request: NewAllocation,
        now: DateTime<Utc>,
    ) -> Result<AllocationRecorded, DomainError> {
        let quantity = request.quantity.unwrap_or(DEFAULT_ALLOCATION_QUANTITY);
        let mut outcome = Err(DomainError::UnknownSalesperson(request.salesperson_id.clone()));

        self.store.update(|snapshot| {
            let salesperson = find_salesperson(&snapshot.salespeople, &request.salesperson_id)?;
            let allocation = Allocation::new(
                format!("ALLOC-{}", Uuid::new_v4()),
                &salesperson.id,
                &salesperson.name,
                quantity,
                self.price_per_coconut,
                now,
            );

            let mut allocations = Vec::with_capacity(snapshot.allocations.len() + 1);
            allocations.push(allocation.clone());
            allocations.extend(snapshot.allocations.iter().cloned());

            outcome = Ok(allocation);
            Some(snapshot.with_allocations(allocations))
        });

        let allocation = outcome?;
        tracing::info!(
            allocation = %allocation.id,
            salesperson = %allocation.salesperson_id,
            quantity,
            "Allocated coconuts"
        );

        Ok(AllocationRecorded {
            notification: Notification::success(
                "Allocation Successful",
                format!("{} coconuts allocated to {}", quantity, allocation.salesperson_name),
            ),
            allocation,
        })
    }

    pub fn verify(
        &self,
        allocation_id: &str,
        request: DepositVerification,
    ) -> Result<VerificationOutcome, DomainError> {
        let allocation = self.replace(allocation_id, |current| {
            Ok(current.verified(&request.transaction_id, request.actual_amount))
        })?;

        let spoilage_required = allocation.is_deficit();
        tracing::info!(
            allocation = %allocation.id,
            status = ?allocation.status,
            "Verified deposit"
        );

        let notification = match allocation.status {
            AllocationStatus::Deficit => Notification::new(
                "Sales Verification Complete",
                "Sales deficit detected. Follow up required.",
                Severity::Error,
            ),
            _ => Notification::success(
                "Sales Verification Complete",
                "Sales amount verified successfully",
            ),
        };

        Ok(VerificationOutcome {
            allocation,
            spoilage_required,
            notification,
        })
    }

    /// Only a deficit without an earlier claim accepts spoilage evidence
    pub fn record_spoilage(
        &self,
        allocation_id: &str,
        report: SpoilageReport,
    ) -> Result<AllocationRecorded, DomainError> {
        let allocation = self.replace(allocation_id, |current| {
            if !current.is_deficit() || current.has_spoilage_claim() {
                return Err(DomainError::SpoilageNotClaimable(current.id.clone()));
            }
            Ok(current.with_spoilage(report.evidence, self.price_per_coconut))
        })?;

        tracing::info!(
            allocation = %allocation.id,
            claims = ?allocation.spoilage_claims,
            "Recorded spoilage"
        );

        Ok(AllocationRecorded {
            allocation,
            notification: Notification::info(
                "Spoilage Evidence Recorded",
                "The spoilage claim has been recorded and will be reviewed",
            ),
        })
    }

    fn replace<F>(&self, allocation_id: &str, f: F) -> Result<Allocation, DomainError>
    where
        F: FnOnce(&Allocation) -> Result<Allocation, DomainError>,
    {
        let mut outcome = Err(DomainError::UnknownAllocation(allocation_id.to_string()));

        self.store.update(|snapshot| {
            let idx = snapshot.allocations.iter().position(|a| a.id == allocation_id)?;
            let next = f(&snapshot.allocations[idx]);
            let published = next.as_ref().ok().map(|updated| {
                let mut allocations = snapshot.allocations.as_ref().clone();
                allocations[idx] = updated.clone();
                snapshot.with_allocations(allocations)
            });
            outcome = next;
            published
        });

        outcome
    }
}

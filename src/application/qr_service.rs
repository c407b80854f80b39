// QR service - batch generation, scan handling and the coconut inventory
use crate::application::state_store::LiveStateStore;
use crate::domain::error::DomainError;
use crate::domain::inventory::{Coconut, InventoryFilter, InventorySummary};
use crate::domain::notification::Notification;
use crate::domain::qr::{CoconutPayload, QrBatch, ScanLocation, ScanMode, generate_batch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOCATION_UNAVAILABLE: &str = "Geolocation not supported";

#[derive(Debug, Clone, PartialEq)]
pub struct QrDefaults {
    pub batch_prefix: String,
    pub coconut_type: String,
    pub unit_price: f64,
}

impl Default for QrDefaults {
    fn default() -> Self {
        Self {
            batch_prefix: "COCO".to_string(),
            coconut_type: "regular".to_string(),
            unit_price: 5.99,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedBatch {
    #[serde(flatten)]
    pub batch: QrBatch,
    pub notification: Notification,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub payload: String,
    pub mode: ScanMode,
    #[serde(default)]
    pub location: Option<ScanLocation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub coconut_id: String,
    pub mode: ScanMode,
    /// State of the coconut after the scan, if it is in inventory
    pub coconut: Option<Coconut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_error: Option<String>,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub items: Vec<Coconut>,
    pub summary: InventorySummary,
}

#[derive(Clone)]
pub struct QrService {
    store: LiveStateStore,
    defaults: QrDefaults,
}

impl QrService {
    pub fn new(store: LiveStateStore, defaults: QrDefaults) -> Self {
        Self { store, defaults }
    }

    pub fn generate(&self, request: BatchRequest) -> GeneratedBatch {
        self.generate_at(request, Utc::now())
    }

    pub fn generate_at(&self, request: BatchRequest, now: DateTime<Utc>) -> GeneratedBatch {
        let quantity = request.quantity.unwrap_or(1).max(1);
        let kind = request.kind.unwrap_or_else(|| self.defaults.coconut_type.clone());
        let prefix = request
            .prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.defaults.batch_prefix.clone());

        let batch = generate_batch(quantity, &kind, &prefix, now);
        tracing::info!(batch = %batch.batch_id, quantity, "Generated QR batch");

        GeneratedBatch {
            notification: Notification::success(
                "QR Codes Generated",
                format!("Successfully created {} QR codes", quantity),
            ),
            batch,
        }
    }

    pub fn scan(&self, request: ScanRequest) -> Result<ScanOutcome, DomainError> {
        self.scan_at(request, Utc::now())
    }

    /// A bad payload ends the scan with an error. A missing device fix does
    /// not: the scan goes through and the outcome notes the missing location.
    pub fn scan_at(
        &self,
        request: ScanRequest,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, DomainError> {
        let payload = CoconutPayload::decode(&request.payload).inspect_err(|e| {
            tracing::warn!("Rejected scan: {}", e);
        })?;

        let location = request.location;
        let location_error = location.is_none().then(|| LOCATION_UNAVAILABLE.to_string());
        let suffix = if location.is_some() { "" } else { " (without location)" };
        let id = payload.coconut_id.clone();

        let mut coconut = None;
        let mut notification = Notification::warning(
            "Unknown coconut",
            format!("Coconut {} is not in inventory", id),
        );

        self.store.update(|snapshot| {
            let existing = snapshot.inventory.iter().position(|c| c.id == id);

            let (next, note) = match (request.mode, existing) {
                (ScanMode::Inventory, Some(idx)) => {
                    coconut = Some(snapshot.inventory[idx].clone());
                    let note = Notification::warning(
                        "Already in inventory",
                        format!("Coconut {} was scanned before", id),
                    );
                    (None, note)
                }
                (ScanMode::Inventory, None) => {
                    let added = Coconut::from_scan(&payload, now, location);
                    let mut inventory = snapshot.inventory.as_ref().clone();
                    inventory.push(added.clone());
                    coconut = Some(added);
                    let note = Notification::success(
                        "Added to Inventory",
                        format!("Coconut {} added to your inventory{}", id, suffix),
                    );
                    (Some(inventory), note)
                }
                // Only unsold stock can be sold or written off as returned/spoilt
                (ScanMode::Sales, Some(idx)) if snapshot.inventory[idx].is_available() => {
                    let mut inventory = snapshot.inventory.as_ref().clone();
                    inventory[idx] = inventory[idx].sold(now, self.defaults.unit_price, location);
                    coconut = Some(inventory[idx].clone());
                    let note = Notification::success(
                        "Sale Recorded",
                        format!("Coconut {} marked as sold{}", id, suffix),
                    );
                    (Some(inventory), note)
                }
                (ScanMode::Returns, Some(idx)) if snapshot.inventory[idx].is_available() => {
                    let mut inventory = snapshot.inventory.as_ref().clone();
                    inventory[idx] = inventory[idx].returned(now, location);
                    coconut = Some(inventory[idx].clone());
                    let note = Notification::success(
                        "Coconut marked as returned/spoilt",
                        format!("Coconut ID: {}{}", id, suffix),
                    );
                    (Some(inventory), note)
                }
                (_, Some(idx)) => {
                    coconut = Some(snapshot.inventory[idx].clone());
                    let note = Notification::warning(
                        "Nothing recorded",
                        format!("Coconut {} is no longer available", id),
                    );
                    (None, note)
                }
                (_, None) => return None,
            };

            notification = note;
            next.map(|inventory| snapshot.with_inventory(inventory))
        });

        tracing::info!(
            coconut = %id,
            mode = ?request.mode,
            located = location.is_some(),
            "Processed scan"
        );

        Ok(ScanOutcome {
            coconut_id: id,
            mode: request.mode,
            coconut,
            location_error,
            notification,
        })
    }

    pub fn inventory(&self, filter: InventoryFilter) -> InventoryView {
        let snapshot = self.store.snapshot();
        InventoryView {
            items: snapshot
                .inventory
                .iter()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect(),
            summary: InventorySummary::from_inventory(&snapshot.inventory),
        }
    }
}

// QR payloads printed on coconuts
use super::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_COCONUT_TYPE: &str = "regular";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoconutPayload {
    pub coconut_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub batch_id: String,
    pub generated_at: Option<DateTime<Utc>>,
}

impl CoconutPayload {
    pub fn encode(&self) -> String {
        // Plain strings and an optional timestamp always serialize
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Text that is not JSON is malformed. Any JSON is accepted from there on,
    /// but it must carry a non-empty `coconutId` (string or number).
    /// Older labels may lack every other field.
    pub fn decode(text: &str) -> Result<Self, DomainError> {
        let scanned: Value =
            serde_json::from_str(text.trim()).map_err(|_| DomainError::MalformedPayload)?;

        let coconut_id = match scanned.get("coconutId") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(DomainError::MissingCoconutId),
        };

        let text_field = |name: &str| {
            scanned
                .get(name)
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            coconut_id,
            kind: text_field("type").unwrap_or_else(|| DEFAULT_COCONUT_TYPE.to_string()),
            batch_id: text_field("batchId").unwrap_or_default(),
            generated_at: text_field("generatedAt").and_then(|at| at.parse().ok()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrBatch {
    pub batch_id: String,
    pub payloads: Vec<CoconutPayload>,
    /// Encoded text of each payload, ready for a QR renderer
    pub codes: Vec<String>,
}

/// Builds `quantity` payloads (at least one) sharing `<prefix>-<epoch millis>`
pub fn generate_batch(quantity: u32, kind: &str, prefix: &str, now: DateTime<Utc>) -> QrBatch {
    let batch_id = format!("{}-{}", prefix, now.timestamp_millis());

    let payloads: Vec<CoconutPayload> = (1..=quantity.max(1))
        .map(|n| CoconutPayload {
            coconut_id: format!("{}-{}", batch_id, n),
            kind: kind.to_string(),
            batch_id: batch_id.clone(),
            generated_at: Some(now),
        })
        .collect();

    let codes = payloads.iter().map(CoconutPayload::encode).collect();

    QrBatch {
        batch_id,
        payloads,
        codes,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Inventory,
    Sales,
    Returns,
}

/// Device fix attached to a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub accuracy: f64,
}

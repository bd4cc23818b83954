//! Versioned JSON snapshot of a payload set
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2026-10-19T08:00:00Z",
//!   "records": [{ "type": "forecast", "state": { ... } }]
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lazycache_common::CommonError;
use lazycache_core::{Payload, PayloadType};
use lazycache_domain::constants::SNAPSHOT_FORMAT_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::types::PayloadTypes;
use crate::errors::StoreError;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSnapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    records: Vec<PersistedRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    #[serde(rename = "type")]
    tag: String,
    state: Value,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Encodes payload sets to snapshot text and back
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    types: Arc<PayloadTypes>,
}

impl PayloadCodec {
    /// Codec over the registered payload `types`.
    pub fn new(types: PayloadTypes) -> Self {
        Self { types: Arc::new(types) }
    }

    /// Tag registry this codec encodes with.
    pub fn types(&self) -> &PayloadTypes {
        &self.types
    }

    /// Encode `payloads` in order.
    ///
    /// # Errors
    /// `StoreError::UnregisteredType` for a payload with no tag, or a
    /// serialization error from the payload's own state.
    pub fn encode(&self, payloads: &[&dyn Payload]) -> Result<String, StoreError> {
        let records = payloads
            .iter()
            .map(|payload| self.encode_record(*payload))
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot =
            PersistedSnapshot { version: SNAPSHOT_FORMAT_VERSION, saved_at: Utc::now(), records };
        debug!(records = snapshot.records.len(), "encoded snapshot");
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn encode_record(&self, payload: &dyn Payload) -> Result<PersistedRecord, StoreError> {
        let Some((tag, state)) = self.types.encode(payload) else {
            return Err(StoreError::UnregisteredType(
                PayloadType::of_payload(payload).name().to_string(),
            ));
        };
        Ok(PersistedRecord { tag: tag.to_string(), state: state? })
    }

    /// Decode snapshot text, preserving record order.
    ///
    /// Blank input decodes to an empty set. Records with an unknown tag are
    /// skipped with a warning.
    ///
    /// # Errors
    /// `StoreError::UnsupportedVersion` for a snapshot written by another
    /// format version, or a serialization error for malformed text or state.
    pub fn decode(&self, text: &str) -> Result<Vec<Box<dyn Payload>>, StoreError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let probe: VersionProbe = serde_json::from_str(text)?;
        if probe.version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: probe.version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let snapshot: PersistedSnapshot = serde_json::from_str(text)?;
        let mut payloads = Vec::with_capacity(snapshot.records.len());
        for (index, record) in snapshot.records.into_iter().enumerate() {
            match self.types.decode(&record.tag, record.state) {
                Some(Ok(payload)) => payloads.push(payload),
                Some(Err(err)) => {
                    return Err(CommonError::serialization_format(
                        "JSON",
                        format!("record {index} ('{}'): {err}", record.tag),
                    )
                    .into());
                }
                None => warn!(index, tag = %record.tag, "skipping record with unknown type tag"),
            }
        }

        debug!(records = payloads.len(), saved_at = %snapshot.saved_at, "decoded snapshot");
        Ok(payloads)
    }
}

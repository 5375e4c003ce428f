//! Record sources and the fetch boundary

use crate::core::error::ViewError;
use crate::core::record::{Record, TypedRecord};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for collaborators that fetch a complete record set
///
/// Implement this for the network client of each admin page. The view-model
/// awaits one call per refresh and never retries on its own.
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// Fetch every record of the collection
    async fn fetch_records(&self) -> Result<Vec<R>>;
}

/// Decode a fetch payload into typed records
///
/// The payload is either a JSON array of records or an envelope object with
/// a `data` array. Missing, `null` or unreadable fields take their defaults
/// (numeric strings are read as numbers). Elements that are not objects, lack
/// a key, or fail validation are dropped and logged.
pub fn decode_records<R: TypedRecord>(payload: &Value) -> Result<Vec<R>, ViewError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(envelope) => envelope
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ViewError::Payload {
                entity_type: R::entity_type().to_string(),
                message: "expected a `data` array in the response envelope".to_string(),
            })?,
        _ => {
            return Err(ViewError::Payload {
                entity_type: R::entity_type().to_string(),
                message: "expected an array of records".to_string(),
            });
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record: R = match serde_json::from_value(item.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    entity_type = R::entity_type(),
                    index,
                    error = %e,
                    "Dropping record that does not match its schema"
                );
                continue;
            }
        };
        if record.key().is_nil() {
            tracing::warn!(
                entity_type = R::entity_type(),
                index,
                "Dropping record without a key"
            );
            continue;
        }
        if let Err(e) = record.validate() {
            tracing::warn!(
                entity_type = R::entity_type(),
                index,
                error = %e,
                "Dropping record that fails validation"
            );
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// In-memory record source for testing and development
///
/// Uses RwLock for async-safe access.
#[derive(Clone)]
pub struct InMemorySource<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R: Record> InMemorySource<R> {
    /// Create an empty in-memory source
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Replace the stored collection, as a server-side change would
    pub async fn set_records(&self, records: Vec<R>) {
        *self.records.write().await = records;
    }

    pub async fn push(&self, record: R) {
        self.records.write().await.push(record);
    }
}

impl<R: Record> Default for InMemorySource<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for InMemorySource<R> {
    async fn fetch_records(&self) -> Result<Vec<R>> {
        Ok(self.records.read().await.clone())
    }
}

/// Record source serving a fixed JSON payload through [`decode_records`]
#[derive(Debug, Clone)]
pub struct JsonSource {
    payload: Value,
}

impl JsonSource {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Parse a JSON document, e.g. a captured API response
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }
}

#[async_trait]
impl<R: TypedRecord> RecordSource<R> for JsonSource {
    async fn fetch_records(&self) -> Result<Vec<R>> {
        Ok(decode_records(&self.payload)?)
    }
}

//! Optimistic local patches
//!
//! After an approve/reject action the table updates immediately by patching
//! the affected row; the next successful fetch replaces every record and so
//! reconciles whatever the server actually stored.

use crate::core::error::ViewError;
use crate::core::record::TypedRecord;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Return `records` with `fields` merged into the record keyed `key`
///
/// Other records are untouched. An unknown key returns the records
/// unchanged. Patching `id`, or producing a record that fails its schema
/// validation, is rejected. Field values are read as leniently as fetched
/// rows are.
pub fn apply_patch<R: TypedRecord>(
    records: &[R],
    key: Uuid,
    fields: &Map<String, Value>,
) -> Result<Vec<R>, ViewError> {
    let reject = |message: String| ViewError::Patch {
        entity_type: R::entity_type().to_string(),
        key,
        message,
    };

    let Some(index) = records.iter().position(|r| r.key() == key) else {
        tracing::debug!(
            entity_type = R::entity_type(),
            %key,
            "Patch target not in current records, skipping"
        );
        return Ok(records.to_vec());
    };

    if fields.contains_key("id") {
        return Err(reject("the record key cannot be patched".to_string()));
    }

    let mut value = serde_json::to_value(&records[index]).map_err(|e| reject(e.to_string()))?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| reject("record does not serialize to an object".to_string()))?;
    for (field, new_value) in fields {
        object.insert(field.clone(), new_value.clone());
    }

    let patched: R = serde_json::from_value(value).map_err(|e| reject(e.to_string()))?;
    patched.validate().map_err(|e| reject(e.to_string()))?;

    let mut next = records.to_vec();
    next[index] = patched;
    Ok(next)
}

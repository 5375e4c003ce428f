//! Record trait defining the row abstraction shared by every admin table

use crate::core::field::{FieldKind, FieldValue};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;
use validator::Validate;

/// Base trait for every row shown in a list view.
///
/// A record exposes:
/// - key: stable unique identifier, used by patches and reconciliation
/// - schema: the declared fields and their kinds
/// - search_fields: the text fields free-text search looks into
/// - raw_field: dynamic access to a field's stored value
///
/// Records are immutable from the view's perspective. Missing or unreadable
/// values surface as [`FieldValue::Null`] and are read as zero or the empty
/// string by the computations.
pub trait Record: Clone + Send + Sync + 'static {
    /// The entity type name (e.g., "employee", "leave_request")
    fn entity_type() -> &'static str;

    /// Stable unique key of this record
    fn key(&self) -> Uuid;

    /// Declared fields and their kinds
    fn schema() -> &'static [(&'static str, FieldKind)];

    /// Fields matched by free-text search
    fn search_fields() -> &'static [&'static str];

    /// The stored value of `field`, before coercion, or `None` for unknown fields
    fn raw_field(&self, field: &str) -> Option<FieldValue>;

    /// Kind of `field`; fields outside the schema are treated as text
    fn field_kind(field: &str) -> FieldKind {
        Self::schema()
            .iter()
            .find(|(name, _)| *name == field)
            .map_or(FieldKind::Text, |(_, kind)| *kind)
    }

    /// Whether `field` is declared in the schema
    fn has_field(field: &str) -> bool {
        Self::schema().iter().any(|(name, _)| *name == field)
    }

    /// Value of `field` coerced to its declared kind; `Null` when absent
    fn field_value(&self, field: &str) -> FieldValue {
        self.raw_field(field)
            .map_or(FieldValue::Null, |v| v.coerce(Self::field_kind(field)))
    }

    /// Numeric value of `field`, zero when missing or not a number
    fn number(&self, field: &str) -> f64 {
        self.field_value(field).as_number().unwrap_or(0.0)
    }

    /// Text value of `field`, empty when missing
    fn text(&self, field: &str) -> String {
        self.field_value(field).search_text()
    }
}

/// Records that can cross the JSON boundary: decoded from fetch payloads,
/// validated, and re-encoded for local patches.
pub trait TypedRecord: Record + Serialize + DeserializeOwned + Validate {}

impl<T> TypedRecord for T where T: Record + Serialize + DeserializeOwned + Validate {}

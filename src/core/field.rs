//! Field value types and kind-aware coercion

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

/// The declared kind of a record field
///
/// The kind decides how raw values are coerced, which comparator sorts the
/// field and which direction a fresh sort on the field starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text (names, descriptions, emails)
    Text,
    /// A closed set of labels (status, leave type, role)
    Enum,
    /// Quantities, amounts, minutes
    Number,
    /// Timestamps or calendar dates
    Date,
    Boolean,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a finite number if possible
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Get the value as a boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Milliseconds since the Unix epoch, for date values
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            FieldValue::DateTime(dt) => Some(dt.timestamp_millis()),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text used for searching and collation; `Null` is the empty string
    pub fn search_text(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Uuid(u) => u.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
            FieldValue::Null => String::new(),
        }
    }

    /// Coerce a raw value into the representation expected for `kind`
    ///
    /// Numeric strings become numbers, date strings become timestamps.
    /// Values that cannot be read as the requested kind become `Null`.
    pub fn coerce(self, kind: FieldKind) -> FieldValue {
        match (kind, self) {
            (FieldKind::Number, FieldValue::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Float(n),
                _ => FieldValue::Null,
            },
            (FieldKind::Number, FieldValue::Float(f)) if !f.is_finite() => FieldValue::Null,
            (FieldKind::Date, FieldValue::String(s)) => {
                parse_datetime(&s).map_or(FieldValue::Null, FieldValue::DateTime)
            }
            (FieldKind::Date, FieldValue::Integer(ms)) => DateTime::from_timestamp_millis(ms)
                .map_or(FieldValue::Null, FieldValue::DateTime),
            (FieldKind::Date, FieldValue::Float(ms)) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms as i64)
                    .map_or(FieldValue::Null, FieldValue::DateTime)
            }
            (FieldKind::Date, FieldValue::Float(_)) => FieldValue::Null,
            (FieldKind::Boolean, FieldValue::String(s)) => match s.trim() {
                "true" => FieldValue::Boolean(true),
                "false" => FieldValue::Boolean(false),
                _ => FieldValue::Null,
            },
            (_, value) => value,
        }
    }

    /// Convert a JSON scalar into a field value
    ///
    /// Arrays and objects have no field representation and yield `None`.
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::Number(n) => Some(
                n.as_i64()
                    .map(FieldValue::Integer)
                    .or_else(|| n.as_f64().map(FieldValue::Float))
                    .unwrap_or(FieldValue::Null),
            ),
            Value::String(s) => Some(FieldValue::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl FieldKind {
    /// Direction a sort starts with when this field is first selected
    ///
    /// Names read A→Z; amounts and dates read largest/most recent first.
    pub fn default_direction(self) -> crate::core::sort::SortDirection {
        use crate::core::sort::SortDirection;
        match self {
            FieldKind::Text | FieldKind::Enum | FieldKind::Boolean => SortDirection::Asc,
            FieldKind::Number | FieldKind::Date => SortDirection::Desc,
        }
    }
}

/// Parse the date formats the admin API emits into a UTC timestamp
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC),
/// `YYYY-MM-DD HH:MM:SS` and plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    static DATE_ONLY: OnceLock<Regex> = OnceLock::new();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date_only = DATE_ONLY.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
    if date_only.is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Conversion of typed record fields into [`FieldValue`]
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for f32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl ToFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl ToFieldValue for u32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl ToFieldValue for Uuid {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }
}

impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl ToFieldValue for NaiveDate {
    fn to_field_value(&self) -> FieldValue {
        self.and_hms_opt(0, 0, 0)
            .map_or(FieldValue::Null, |dt| FieldValue::DateTime(dt.and_utc()))
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref()
            .map_or(FieldValue::Null, ToFieldValue::to_field_value)
    }
}

/// Field types that tolerate loosely typed payloads
///
/// Fetched rows often carry `null` for absent values, numbers as strings
/// (`"1.5"`) or numbers where text is expected. A lenient field reads what it
/// can and falls back to its default otherwise.
pub trait LenientField: DeserializeOwned + Default {
    /// Read `value` loosely; `None` means "use the default"
    fn from_loose(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// `deserialize_with` target used by `impl_record!` for every declared field
///
/// `null` and unreadable values become the field's default instead of
/// failing the whole record.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: LenientField,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::from_loose(value).unwrap_or_default())
}

fn loose_number(value: &Value) -> Option<f64> {
    FieldValue::from_json(value)?
        .coerce(FieldKind::Number)
        .as_number()
}

fn loose_integer(value: &Value) -> Option<i64> {
    loose_number(value)
        .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
        .map(|n| n as i64)
}

impl LenientField for String {
    fn from_loose(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl LenientField for f64 {
    fn from_loose(value: Value) -> Option<Self> {
        loose_number(&value)
    }
}

impl LenientField for f32 {
    fn from_loose(value: Value) -> Option<Self> {
        loose_number(&value).map(|n| n as f32)
    }
}

impl LenientField for i64 {
    fn from_loose(value: Value) -> Option<Self> {
        loose_integer(&value)
    }
}

impl LenientField for i32 {
    fn from_loose(value: Value) -> Option<Self> {
        loose_integer(&value).and_then(|n| i32::try_from(n).ok())
    }
}

impl LenientField for u32 {
    fn from_loose(value: Value) -> Option<Self> {
        loose_integer(&value).and_then(|n| u32::try_from(n).ok())
    }
}

impl LenientField for bool {
    fn from_loose(value: Value) -> Option<Self> {
        FieldValue::from_json(&value)?
            .coerce(FieldKind::Boolean)
            .as_bool()
    }
}

impl LenientField for Uuid {}

impl LenientField for DateTime<Utc> {
    fn from_loose(value: Value) -> Option<Self> {
        match FieldValue::from_json(&value)?.coerce(FieldKind::Date) {
            FieldValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl LenientField for NaiveDate {
    fn from_loose(value: Value) -> Option<Self> {
        DateTime::<Utc>::from_loose(value).map(|dt| dt.date_naive())
    }
}

impl<T: LenientField> LenientField for Option<T> {
    fn from_loose(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_loose(value).map(Some),
        }
    }
}

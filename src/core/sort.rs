//! Sorting of record sets

use crate::core::error::ViewError;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort field and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Fresh sort on `field` in the default direction of its kind
    pub fn for_field<R: Record>(field: &str) -> Self {
        Self::new(field, R::field_kind(field).default_direction())
    }

    /// The sort that results from selecting `field` in a column header
    ///
    /// Reselecting the current field flips its direction; any other field
    /// starts over in its kind's default direction.
    pub fn next<R: Record>(current: Option<&SortSpec>, field: &str) -> Self {
        match current {
            Some(spec) if spec.field == field => Self::new(field, spec.direction.toggle()),
            _ => Self::for_field::<R>(field),
        }
    }

    /// Parse a `field[:asc|desc]` expression
    pub fn parse(expression: &str) -> Result<Self, ViewError> {
        let invalid = || ViewError::InvalidSort {
            expression: expression.to_string(),
        };

        let (field, direction) = match expression.trim().split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    _ => return Err(invalid()),
                };
                (field.trim(), direction)
            }
            None => (expression.trim(), SortDirection::Asc),
        };

        if field.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(field, direction))
    }
}

/// Locale-style string collation
///
/// Primary order ignores case; strings that differ only by case put the
/// lowercase form first.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    primary.then_with(|| b.cmp(a))
}

/// Compare two values of the given kind, ascending
///
/// Text compares by collation with `Null` as the empty string, numbers by
/// magnitude with `Null` as zero. Missing dates order before every date.
pub fn compare_values(kind: FieldKind, a: &FieldValue, b: &FieldValue) -> Ordering {
    match kind {
        FieldKind::Text | FieldKind::Enum => collate(&a.search_text(), &b.search_text()),
        FieldKind::Number => {
            let a = a.as_number().unwrap_or(0.0);
            let b = b.as_number().unwrap_or(0.0);
            a.total_cmp(&b)
        }
        FieldKind::Date => a.as_timestamp().cmp(&b.as_timestamp()),
        FieldKind::Boolean => {
            let truthy = |v: &FieldValue| matches!(v, FieldValue::Boolean(true));
            truthy(a).cmp(&truthy(b))
        }
    }
}

/// Stable sort of `records` by `spec`
///
/// Records comparing equal keep their input order in both directions.
pub fn apply_sort<'a, R: Record>(records: Vec<&'a R>, spec: &SortSpec) -> Vec<&'a R> {
    let kind = R::field_kind(&spec.field);
    let mut keyed: Vec<(FieldValue, &'a R)> = records
        .into_iter()
        .map(|record| (record.field_value(&spec.field), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| spec.direction.apply(compare_values(kind, a, b)));

    keyed.into_iter().map(|(_, record)| record).collect()
}

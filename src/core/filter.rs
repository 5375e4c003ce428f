//! Record predicates and filtering

use crate::core::error::ViewError;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::record::Record;
use crate::core::sort::compare_values;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A pure boolean test over a record
///
/// Implemented by the declarative [`Filter`] and by any
/// `Fn(&R) -> bool + Send + Sync` closure.
pub trait Predicate<R>: Send + Sync {
    fn matches(&self, record: &R) -> bool;
}

impl<R, F> Predicate<R> for F
where
    F: Fn(&R) -> bool + Send + Sync,
{
    fn matches(&self, record: &R) -> bool {
        self(record)
    }
}

/// Comparison operator of a range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Declarative filter over a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Case-insensitive substring match on the record's search fields.
    /// A blank term matches everything.
    Search { term: String },

    /// Field equals value (text compares case-insensitively)
    Equals { field: String, value: FieldValue },

    /// Field equals any of the values
    OneOf {
        field: String,
        values: Vec<FieldValue>,
    },

    /// Field compares to value; records with a missing field never match
    Compare {
        field: String,
        op: CompareOp,
        value: FieldValue,
    },
}

impl Filter {
    pub fn search(term: impl Into<String>) -> Self {
        Filter::Search { term: term.into() }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse a filter object such as `{"status": "active", "amount>": 100}`
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Any of: `{"field": ["a", "b"]}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    ///
    /// Returns the filters keyed by their original JSON key.
    pub fn from_json(value: &Value) -> Result<Vec<(String, Filter)>, ViewError> {
        let object = value
            .as_object()
            .ok_or_else(|| ViewError::invalid_filter("filter must be a JSON object"))?;

        object
            .iter()
            .map(|(key, raw)| Ok((key.clone(), Self::from_entry(key, raw)?)))
            .collect()
    }

    fn from_entry(key: &str, raw: &Value) -> Result<Filter, ViewError> {
        let scalar = |v: &Value| {
            FieldValue::from_json(v).ok_or_else(|| {
                ViewError::invalid_filter(format!("value for '{}' must be a scalar", key))
            })
        };

        // Longest operators first so ">=" is not read as ">"
        const OPS: [(&str, CompareOp); 4] = [
            (">=", CompareOp::Gte),
            ("<=", CompareOp::Lte),
            (">", CompareOp::Gt),
            ("<", CompareOp::Lt),
        ];
        for (suffix, op) in OPS {
            if let Some(field) = key.strip_suffix(suffix) {
                let field = field.trim();
                if field.is_empty() {
                    return Err(ViewError::invalid_filter(format!(
                        "missing field name in '{}'",
                        key
                    )));
                }
                return Ok(Filter::Compare {
                    field: field.to_string(),
                    op,
                    value: scalar(raw)?,
                });
            }
        }

        match raw {
            Value::Array(items) => Ok(Filter::OneOf {
                field: key.to_string(),
                values: items.iter().map(scalar).collect::<Result<_, _>>()?,
            }),
            _ => Ok(Filter::Equals {
                field: key.to_string(),
                value: scalar(raw)?,
            }),
        }
    }
}

/// Loose equality used by `Equals` and `OneOf`
fn values_match(kind: FieldKind, actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Null, FieldValue::Null) => true,
        (FieldValue::Null, _) | (_, FieldValue::Null) => false,
        _ => match kind {
            FieldKind::Text | FieldKind::Enum => actual
                .search_text()
                .to_lowercase()
                .eq(&expected.search_text().to_lowercase()),
            _ => compare_values(kind, actual, expected) == Ordering::Equal,
        },
    }
}

impl<R: Record> Predicate<R> for Filter {
    fn matches(&self, record: &R) -> bool {
        match self {
            Filter::Search { term } => {
                let needle = term.trim().to_lowercase();
                needle.is_empty()
                    || R::search_fields()
                        .iter()
                        .any(|field| record.text(field).to_lowercase().contains(&needle))
            }
            Filter::Equals { field, value } => {
                let kind = R::field_kind(field);
                let expected = value.clone().coerce(kind);
                values_match(kind, &record.field_value(field), &expected)
            }
            Filter::OneOf { field, values } => {
                let kind = R::field_kind(field);
                let actual = record.field_value(field);
                values
                    .iter()
                    .any(|v| values_match(kind, &actual, &v.clone().coerce(kind)))
            }
            Filter::Compare { field, op, value } => {
                let kind = R::field_kind(field);
                let actual = record.field_value(field);
                let expected = value.clone().coerce(kind);
                if actual.is_null() || expected.is_null() {
                    return false;
                }
                op.accepts(compare_values(kind, &actual, &expected))
            }
        }
    }
}

/// Keep the records matching every predicate, in input order
///
/// With no predicates every record is kept.
pub fn apply_filters<'a, R, I>(records: I, predicates: &[&dyn Predicate<R>]) -> Vec<&'a R>
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|record| predicates.iter().all(|p| p.matches(record)))
        .collect()
}

//! Numeric rollups over record sets
//!
//! Aggregates feed the summary cards and table footers: total leave days,
//! estimated hours of a project list, invoice subtotal/tax/total. They are
//! computed over the filtered set, never over the visible page.

use crate::core::format::minutes_to_hours;
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which record set aggregates reduce over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateScope {
    /// Records that pass the current search and filters
    #[default]
    Filtered,
    /// Every fetched record, regardless of filters
    All,
}

/// Clamp a tax percentage into `[0, 100]`; non-finite values become 0
pub fn clamp_tax_percent(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Quantity × rate
pub fn line_subtotal(quantity: f64, rate: f64) -> f64 {
    finite(quantity * rate)
}

/// Tax on a line, with the percentage clamped
pub fn line_tax(quantity: f64, rate: f64, tax_percent: f64) -> f64 {
    finite(line_subtotal(quantity, rate) * clamp_tax_percent(tax_percent) / 100.0)
}

/// Quantity × rate × (1 + tax/100), with the percentage clamped
pub fn line_total(quantity: f64, rate: f64, tax_percent: f64) -> f64 {
    line_subtotal(quantity, rate) + line_tax(quantity, rate, tax_percent)
}

/// A numeric reduction over a record set
///
/// Field names refer to the record schema; missing or non-numeric values
/// count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reducer {
    /// Number of records
    Count,
    /// Sum of a field
    Sum { field: String },
    /// Sum of per-record products of two fields
    Product { left: String, right: String },
    /// Sum of a minutes field, expressed in hours (one decimal)
    MinutesAsHours { field: String },
    /// Sum of minutes / 60 × hourly rate
    TimeCost { minutes: String, hourly_rate: String },
    /// Sum of quantity × rate
    Subtotal { quantity: String, rate: String },
    /// Sum of quantity × rate × clamped tax / 100
    Tax {
        quantity: String,
        rate: String,
        tax_percent: String,
    },
    /// Sum of quantity × rate × (1 + clamped tax / 100)
    LineTotal {
        quantity: String,
        rate: String,
        tax_percent: String,
    },
}

impl Reducer {
    pub fn sum(field: impl Into<String>) -> Self {
        Reducer::Sum {
            field: field.into(),
        }
    }

    /// Reduce `records` to a single figure
    pub fn reduce<R: Record>(&self, records: &[&R]) -> f64 {
        let total = |per_record: &dyn Fn(&R) -> f64| -> f64 {
            records.iter().map(|r| finite(per_record(*r))).sum()
        };

        match self {
            Reducer::Count => records.len() as f64,
            Reducer::Sum { field } => total(&|r| r.number(field)),
            Reducer::Product { left, right } => total(&|r| r.number(left) * r.number(right)),
            Reducer::MinutesAsHours { field } => minutes_to_hours(total(&|r| r.number(field))),
            Reducer::TimeCost {
                minutes,
                hourly_rate,
            } => total(&|r| r.number(minutes) / 60.0 * r.number(hourly_rate)),
            Reducer::Subtotal { quantity, rate } => {
                total(&|r| line_subtotal(r.number(quantity), r.number(rate)))
            }
            Reducer::Tax {
                quantity,
                rate,
                tax_percent,
            } => total(&|r| line_tax(r.number(quantity), r.number(rate), r.number(tax_percent))),
            Reducer::LineTotal {
                quantity,
                rate,
                tax_percent,
            } => total(&|r| {
                line_total(r.number(quantity), r.number(rate), r.number(tax_percent))
            }),
        }
    }
}

/// Labelled reducers, evaluated in insertion order
pub type Reducers = IndexMap<String, Reducer>;

/// Labelled results of a set of reducers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult(IndexMap<String, f64>);

impl AggregateResult {
    /// Value of the reducer labelled `label`, zero when absent
    pub fn get(&self, label: &str) -> f64 {
        self.0.get(label).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Apply every reducer to `records`
pub fn aggregate<'a, R, I>(records: I, reducers: &Reducers) -> AggregateResult
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    let records: Vec<&R> = records.into_iter().collect();
    AggregateResult(
        reducers
            .iter()
            .map(|(label, reducer)| (label.clone(), reducer.reduce(&records)))
            .collect(),
    )
}

//! # Tabula
//!
//! Derived-state computation for the list pages of an HR/operations admin
//! console: filtering, sorting, pagination and aggregation over records
//! fetched from a remote source.
//!
//! ## Features
//!
//! - **Typed Records**: declare a schema once with `impl_record!`
//! - **Declarative Filters**: search, equality, any-of and comparisons, or any closure
//! - **Kind-Aware Sorting**: collation for text, numeric order for amounts and dates
//! - **Clamped Pagination**: the page always stays inside `[1, page_count]`
//! - **Aggregates**: counts, sums, hours and invoice totals over the filtered set
//! - **Optimistic Patches**: update a row locally, reconcile on the next fetch
//! - **Configuration-Based**: page sizes and default sorts from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabula::prelude::*;
//!
//! impl_record!(
//!     Timesheet,
//!     "timesheet",
//!     search: ["person"],
//!     {
//!         person: String => Text,
//!         minutes: f64 => Number,
//!         logged_on: Option<String> => Date,
//!     }
//! );
//!
//! let mut sheets = ListViewModel::<Timesheet>::new().with_reducer(
//!     "hours",
//!     Reducer::MinutesAsHours { field: "minutes".into() },
//! );
//! sheets.refresh(&source).await?;
//! sheets.set_search_term("rao");
//! sheets.set_sort("logged_on");
//!
//! let view = sheets.view();
//! println!("{}", showing_label(view.start, view.end, view.total));
//! ```

// Lets `impl_record!` name this crate by path inside serde attributes
extern crate self as tabula;

pub mod config;
pub mod core;
pub mod entities;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        filter::Predicate,
        record::{Record, TypedRecord},
        source::RecordSource,
    };

    // === Computation ===
    pub use crate::core::{
        aggregate::{AggregateResult, AggregateScope, Reducer, Reducers, aggregate},
        field::{FieldKind, FieldValue},
        filter::{CompareOp, Filter, apply_filters},
        format::{format_date, format_hours, format_money, minutes_to_hours, showing_label},
        patch::apply_patch,
        query::{Page, PageWindow, PaginationMeta, QueryParams, paginate},
        sort::{SortDirection, SortSpec, apply_sort},
    };

    // === View-Model ===
    pub use crate::core::view::{ListView, ListViewModel, ViewState, compute_view};

    // === Sources ===
    pub use crate::core::source::{InMemorySource, JsonSource, decode_records};

    // === Errors ===
    pub use crate::core::error::ViewError;

    // === Entities ===
    pub use crate::entities::{Employee, InvoiceLine, LeaveRequest, Project};

    // === Macros ===
    pub use crate::impl_record;

    // === Config ===
    pub use crate::config::{EntityViewConfig, ViewConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}

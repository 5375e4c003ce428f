//! Core module containing the record abstraction and the list computations

pub mod aggregate;
pub mod error;
pub mod field;
pub mod filter;
pub mod format;
pub mod patch;
pub mod query;
pub mod record;
pub mod sort;
pub mod source;
pub mod view;

pub use aggregate::{AggregateResult, AggregateScope, Reducer, Reducers, aggregate};
pub use error::ViewError;
pub use field::{FieldKind, FieldValue, LenientField, ToFieldValue};
pub use filter::{CompareOp, Filter, Predicate, apply_filters};
pub use patch::apply_patch;
pub use query::{Page, PageWindow, PaginationMeta, QueryParams, paginate};
pub use record::{Record, TypedRecord};
pub use sort::{SortDirection, SortSpec, apply_sort};
pub use source::{InMemorySource, JsonSource, RecordSource, decode_records};
pub use view::{ListView, ListViewModel, ViewState, compute_view};

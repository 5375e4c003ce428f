//! List view state, pure recomputation, and the stateful view-model
//!
//! [`compute_view`] turns a record set plus a [`ViewState`] into a
//! [`ListView`] snapshot with no side effects. [`ListViewModel`] owns the
//! records and the state for a page and recomputes the snapshot after every
//! change.

use crate::config::ViewConfig;
use crate::core::aggregate::{AggregateResult, AggregateScope, Reducer, Reducers, aggregate};
use crate::core::error::ViewError;
use crate::core::field::FieldValue;
use crate::core::filter::{Filter, Predicate, apply_filters};
use crate::core::query::{PageWindow, paginate};
use crate::core::record::{Record, TypedRecord};
use crate::core::sort::{SortSpec, apply_sort};
use crate::core::source::RecordSource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// List controls of one admin table
///
/// Plain data owned by the caller: search box, filter dropdowns, sortable
/// column headers and the pager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Free-text search term; blank matches everything
    pub search: String,

    /// Active filters keyed by control name (e.g. "status")
    pub filters: IndexMap<String, Filter>,

    /// Current sort, if any; `None` keeps fetch order
    pub sort: Option<SortSpec>,

    pub window: PageWindow,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            window: PageWindow::new(1, page_size),
            ..Default::default()
        }
    }
}

/// Read-only snapshot for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ListView<R> {
    /// Rows of the current page
    pub rows: Vec<R>,

    /// 1-based index of the first visible row, 0 when empty
    pub start: usize,

    /// 1-based index of the last visible row, 0 when empty
    pub end: usize,

    /// Number of records after filtering
    pub total: usize,

    /// Current page, clamped into `[1, page_count]`
    pub page: usize,

    pub page_count: usize,
    pub has_next: bool,
    pub has_prev: bool,

    /// Rollups over the filtered (or, per scope, full) record set
    pub aggregates: AggregateResult,
}

impl<R> Default for ListView<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            start: 0,
            end: 0,
            total: 0,
            page: 1,
            page_count: 1,
            has_next: false,
            has_prev: false,
            aggregates: AggregateResult::default(),
        }
    }
}

/// Pure recomputation of a list view
///
/// Filtering and sorting run on the full record set; aggregation runs on the
/// filtered set (or on every record for [`AggregateScope::All`]); pagination
/// cuts the sorted result last.
pub fn compute_view<R: Record>(
    records: &[R],
    state: &ViewState,
    extra: &[Arc<dyn Predicate<R>>],
    reducers: &Reducers,
    scope: AggregateScope,
) -> ListView<R> {
    let search = Filter::search(state.search.as_str());
    let mut predicates: Vec<&dyn Predicate<R>> =
        Vec::with_capacity(1 + state.filters.len() + extra.len());
    predicates.push(&search);
    predicates.extend(state.filters.values().map(|f| f as &dyn Predicate<R>));
    predicates.extend(extra.iter().map(|p| p.as_ref() as &dyn Predicate<R>));

    let filtered = apply_filters(records, &predicates);
    let aggregates = match scope {
        AggregateScope::Filtered => aggregate(filtered.iter().copied(), reducers),
        AggregateScope::All => aggregate(records, reducers),
    };

    let sorted = match &state.sort {
        Some(spec) => apply_sort(filtered, spec),
        None => filtered,
    };

    let page = paginate(&sorted, state.window).map(|r| r.clone());
    let meta = page.meta;

    ListView {
        rows: page.rows,
        start: meta.start,
        end: meta.end,
        total: meta.total,
        page: meta.page,
        page_count: meta.total_pages,
        has_next: meta.has_next,
        has_prev: meta.has_prev,
        aggregates,
    }
}

/// Stateful view-model for one admin table
///
/// Holds the last fetched records, the list controls and the computed
/// snapshot. Every setter recomputes the snapshot synchronously.
///
/// # Example
/// ```rust,ignore
/// let mut leaves = ListViewModel::<LeaveRequest>::from_config(&config)
///     .with_reducers(LeaveRequest::summary());
/// leaves.refresh(&api).await?;
/// leaves.set_filter("status", "pending");
/// leaves.set_sort("start_date");
/// render(leaves.view());
/// ```
pub struct ListViewModel<R: Record> {
    records: Vec<R>,
    state: ViewState,
    reducers: Reducers,
    scope: AggregateScope,
    extra: Vec<Arc<dyn Predicate<R>>>,
    max_page_size: usize,
    view: ListView<R>,
}

impl<R: Record> Default for ListViewModel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ListViewModel<R> {
    /// Empty model with default paging
    pub fn new() -> Self {
        Self::from_config(&ViewConfig::default_config())
    }

    /// Model with the page size, default sort and aggregate scope configured
    /// for `R`
    pub fn from_config(config: &ViewConfig) -> Self {
        let entity = config.entity(R::entity_type());
        let mut state = ViewState::new(config.page_size_for(R::entity_type()));
        state.sort = entity.default_sort.as_deref().and_then(|expr| {
            SortSpec::parse(expr)
                .inspect_err(|e| {
                    tracing::warn!(
                        entity_type = R::entity_type(),
                        error = %e,
                        "Ignoring configured default sort"
                    )
                })
                .ok()
        });

        let mut model = Self {
            records: Vec::new(),
            state,
            reducers: Reducers::new(),
            scope: entity.aggregate_scope,
            extra: Vec::new(),
            max_page_size: config.max_page_size.max(1),
            view: ListView::default(),
        };
        model.recompute();
        model
    }

    /// Add a labelled reducer
    pub fn with_reducer(mut self, label: impl Into<String>, reducer: Reducer) -> Self {
        self.reducers.insert(label.into(), reducer);
        self.recompute();
        self
    }

    pub fn with_reducers(mut self, reducers: Reducers) -> Self {
        self.reducers.extend(reducers);
        self.recompute();
        self
    }

    pub fn with_scope(mut self, scope: AggregateScope) -> Self {
        self.scope = scope;
        self.recompute();
        self
    }

    /// Current snapshot
    pub fn view(&self) -> &ListView<R> {
        &self.view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Last fetched records, possibly with local patches applied
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Replace every list control at once, e.g. from URL query parameters
    ///
    /// The requested page is kept even while it is out of range, so it can be
    /// applied before the first fetch.
    pub fn set_state(&mut self, mut state: ViewState) {
        state.window.page_size = state.window.page_size.clamp(1, self.max_page_size);
        self.state = state;
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
        self.state.window.page = 1;
        self.recompute();
    }

    /// Filter `key` on equality with `value`
    ///
    /// `"all"`, a blank string or `Null` clears the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        let clears = match &value {
            FieldValue::Null => true,
            FieldValue::String(s) => s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all"),
            _ => false,
        };
        if clears {
            self.clear_filter(&key);
        } else {
            let filter = Filter::Equals {
                field: key.clone(),
                value,
            };
            self.set_filter_with(key, filter);
        }
    }

    /// Filter `key` on membership in `values`; an empty list clears the filter
    pub fn set_filter_any<V: Into<FieldValue>>(
        &mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) {
        let key = key.into();
        let values: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.clear_filter(&key);
        } else {
            let filter = Filter::OneOf {
                field: key.clone(),
                values,
            };
            self.set_filter_with(key, filter);
        }
    }

    /// Install an arbitrary declarative filter under `key`
    pub fn set_filter_with(&mut self, key: impl Into<String>, filter: Filter) {
        self.state.filters.insert(key.into(), filter);
        self.state.window.page = 1;
        self.recompute();
    }

    pub fn clear_filter(&mut self, key: &str) {
        if self.state.filters.shift_remove(key).is_some() {
            self.state.window.page = 1;
        }
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.search.clear();
        self.state.window.page = 1;
        self.recompute();
    }

    /// Add a predicate that stays active for the lifetime of the model
    pub fn add_predicate(&mut self, predicate: impl Predicate<R> + 'static) {
        self.extra.push(Arc::new(predicate));
        self.state.window.page = 1;
        self.recompute();
    }

    /// Column header click: toggle the current field or start a new sort
    pub fn set_sort(&mut self, field: &str) {
        self.state.sort = Some(SortSpec::next::<R>(self.state.sort.as_ref(), field));
        self.recompute();
    }

    pub fn set_sort_spec(&mut self, sort: Option<SortSpec>) {
        self.state.sort = sort;
        self.recompute();
    }

    /// Go to page `page`; the snapshot clamps out-of-range pages
    pub fn set_page(&mut self, page: usize) {
        self.state.window.page = page;
        self.recompute();
    }

    /// Change the page size (capped at the configured maximum) and return
    /// to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.window.page_size = page_size.clamp(1, self.max_page_size);
        self.state.window.page = 1;
        self.recompute();
    }

    /// Replace the record set wholesale, as after a successful fetch
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.recompute();
    }

    /// Fetch from `source` and replace the records
    ///
    /// On failure the previous records and view are kept.
    pub async fn refresh<S>(&mut self, source: &S) -> Result<(), ViewError>
    where
        S: RecordSource<R> + ?Sized,
    {
        match source.fetch_records().await {
            Ok(records) => {
                tracing::debug!(
                    entity_type = R::entity_type(),
                    count = records.len(),
                    "Replacing records after fetch"
                );
                self.replace_records(records);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    entity_type = R::entity_type(),
                    error = %err,
                    "Fetch failed, keeping previous view"
                );
                Err(ViewError::Fetch {
                    entity_type: R::entity_type().to_string(),
                    source: err,
                })
            }
        }
    }

    fn recompute(&mut self) {
        self.view = compute_view(
            &self.records,
            &self.state,
            &self.extra,
            &self.reducers,
            self.scope,
        );
        // The requested page stays in the state so it survives until the
        // records arrive; only the snapshot is clamped.
        self.state.window.page_size = self.state.window.size();
        tracing::debug!(
            entity_type = R::entity_type(),
            total = self.view.total,
            page = self.view.page,
            page_count = self.view.page_count,
            "List view recomputed"
        );
    }
}

impl<R: TypedRecord> ListViewModel<R> {
    /// Optimistically merge `fields` into the record keyed `key`
    ///
    /// The next refresh replaces the patched record with the server's copy.
    /// A rejected patch leaves the records untouched.
    pub fn apply_local_patch(
        &mut self,
        key: Uuid,
        fields: &Map<String, Value>,
    ) -> Result<(), ViewError> {
        match crate::core::patch::apply_patch(&self.records, key, fields) {
            Ok(records) => {
                self.records = records;
                self.recompute();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    entity_type = R::entity_type(),
                    %key,
                    error = %e,
                    "Local patch rejected"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::SortDirection;

    crate::impl_record!(
        Row,
        "row",
        search: ["name"],
        {
            name: String => Text,
            hrs: f64 => Number,
            status: String => Enum,
        }
    );

    fn row(name: &str, hrs: f64, status: &str) -> Row {
        Row {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hrs,
            status: status.to_string(),
        }
    }

    fn names(view: &ListView<Row>) -> Vec<&str> {
        view.rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<Row> {
        vec![
            row("Bob", 2.0, "active"),
            row("Ann", 5.0, "active"),
            row("Cid", 5.0, "inactive"),
        ]
    }

    #[test]
    fn test_compute_view_sorts_before_paginating() {
        let mut state = ViewState::new(2);
        state.sort = Some(SortSpec::desc("hrs"));
        let view = compute_view(
            &sample(),
            &state,
            &[],
            &Reducers::new(),
            AggregateScope::Filtered,
        );
        assert_eq!(names(&view), vec!["Ann", "Cid"]);
        assert_eq!((view.start, view.end, view.total), (1, 2, 3));
        assert_eq!(view.page_count, 2);
    }

    #[test]
    fn test_aggregates_ignore_pagination() {
        let mut reducers = Reducers::new();
        reducers.insert("hrs".into(), Reducer::sum("hrs"));
        let view = compute_view(
            &sample(),
            &ViewState::new(1),
            &[],
            &reducers,
            AggregateScope::Filtered,
        );
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.aggregates.get("hrs"), 12.0);
    }

    #[test]
    fn test_aggregate_scope() {
        let mut state = ViewState::new(10);
        state
            .filters
            .insert("status".into(), Filter::equals("status", "active"));
        let mut reducers = Reducers::new();
        reducers.insert("hrs".into(), Reducer::sum("hrs"));

        let filtered = compute_view(&sample(), &state, &[], &reducers, AggregateScope::Filtered);
        let all = compute_view(&sample(), &state, &[], &reducers, AggregateScope::All);
        assert_eq!(filtered.aggregates.get("hrs"), 7.0);
        assert_eq!(all.aggregates.get("hrs"), 12.0);
        assert_eq!(all.total, 2);
    }

    #[test]
    fn test_model_sort_toggle() {
        let mut model = ListViewModel::<Row>::new();
        model.replace_records(sample());

        model.set_sort("hrs");
        assert_eq!(names(model.view()), vec!["Ann", "Cid", "Bob"]);

        model.set_sort("hrs");
        assert_eq!(
            model.state().sort.as_ref().map(|s| s.direction),
            Some(SortDirection::Asc)
        );
        assert_eq!(names(model.view()), vec!["Bob", "Ann", "Cid"]);

        model.set_sort("name");
        assert_eq!(names(model.view()), vec!["Ann", "Bob", "Cid"]);
    }

    #[test]
    fn test_filter_all_clears() {
        let mut model = ListViewModel::<Row>::new();
        model.replace_records(sample());

        model.set_filter("status", "inactive");
        assert_eq!(names(model.view()), vec!["Cid"]);

        model.set_filter("status", "all");
        assert!(model.state().filters.is_empty());
        assert_eq!(model.view().total, 3);
    }

    #[test]
    fn test_search_resets_page() {
        let mut model = ListViewModel::<Row>::new();
        model.set_page_size(1);
        model.replace_records(sample());
        model.set_page(3);
        assert_eq!(model.view().page, 3);

        model.set_search_term("b");
        assert_eq!(model.view().page, 1);
        assert_eq!(names(model.view()), vec!["Bob"]);
    }

    #[test]
    fn test_page_is_clamped_after_refresh_shrinks_set() {
        let mut model = ListViewModel::<Row>::new();
        model.set_page_size(1);
        model.replace_records(sample());
        model.set_page(3);

        model.replace_records(sample().into_iter().take(1).collect());
        assert_eq!(model.view().page, 1);
        assert_eq!(model.state().window.page, 3);

        model.replace_records(sample());
        assert_eq!(model.view().page, 3);
    }

    #[test]
    fn test_requested_page_survives_until_first_fetch() {
        let mut state = ViewState::new(1);
        state.window.page = 2;

        let mut model = ListViewModel::<Row>::new();
        model.set_state(state);
        assert_eq!(model.view().page, 1);

        model.replace_records(sample());
        assert_eq!(model.view().page, 2);
        assert_eq!(names(model.view()), vec!["Ann"]);
    }

    #[test]
    fn test_extra_predicate() {
        let mut model = ListViewModel::<Row>::new();
        model.replace_records(sample());
        model.add_predicate(|r: &Row| r.hrs > 3.0);
        assert_eq!(names(model.view()), vec!["Ann", "Cid"]);
    }
}

//! Integration tests for the list view-model: fetch, filter, sort, page,
//! aggregate and patch

use anyhow::anyhow;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use tabula::prelude::*;

impl_record!(
    Timesheet,
    "timesheet",
    search: ["person"],
    {
        person: String => Text,
        hrs: f64 => Number,
    }
);

fn sheet(person: &str, hrs: f64) -> Timesheet {
    Timesheet {
        id: Uuid::new_v4(),
        person: person.to_string(),
        hrs,
    }
}

fn people(view: &ListView<Timesheet>) -> Vec<&str> {
    view.rows.iter().map(|t| t.person.as_str()).collect()
}

/// Source whose next fetch can be made to fail
struct FlakySource {
    inner: InMemorySource<Timesheet>,
    fail: AtomicBool,
}

#[async_trait]
impl RecordSource<Timesheet> for FlakySource {
    async fn fetch_records(&self) -> Result<Vec<Timesheet>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("503 Service Unavailable"));
        }
        self.inner.fetch_records().await
    }
}

#[test]
fn test_sort_by_hours_descending() {
    let mut model = ListViewModel::<Timesheet>::new();
    model.replace_records(vec![sheet("Bob", 2.0), sheet("Ann", 5.0), sheet("Cid", 5.0)]);
    model.set_sort_spec(Some(SortSpec::desc("hrs")));

    assert_eq!(people(model.view()), vec!["Ann", "Cid", "Bob"]);
}

#[test]
fn test_twenty_three_rows_in_pages_of_ten() {
    let mut model = ListViewModel::<Timesheet>::new();
    model.replace_records((1..=23).map(|i| sheet(&format!("p{:02}", i), i as f64)).collect());
    model.set_page_size(10);
    assert_eq!(model.view().page_count, 3);

    model.set_page(3);
    let view = model.view();
    assert_eq!((view.start, view.end, view.total), (21, 23, 23));
    assert_eq!(view.rows.len(), 3);
    assert!(!view.has_next);
    assert!(view.has_prev);
    assert_eq!(
        showing_label(view.start, view.end, view.total),
        "Showing 21–23 of 23"
    );

    model.set_page(99);
    assert_eq!(model.view().page, 3);
    model.set_page(0);
    assert_eq!(model.view().page, 1);
}

#[test]
fn test_every_record_on_exactly_one_page() {
    for size in 1..=7usize {
        for n in 0..=15usize {
            let mut model = ListViewModel::<Timesheet>::new();
            model.set_page_size(size);
            model.replace_records((0..n).map(|i| sheet("x", i as f64)).collect());

            let page_count = model.view().page_count;
            assert_eq!(page_count, n.div_ceil(size).max(1));

            let mut seen = Vec::new();
            for page in 1..=page_count {
                model.set_page(page);
                seen.extend(model.view().rows.iter().map(|t| t.id));
            }
            let expected: Vec<Uuid> = model.records().iter().map(|t| t.id).collect();
            assert_eq!(seen, expected);
        }
    }
}

#[test]
fn test_empty_view() {
    let model = ListViewModel::<Timesheet>::new().with_reducer("hours", Reducer::sum("hrs"));
    let view = model.view();
    assert_eq!((view.start, view.end, view.total), (0, 0, 0));
    assert_eq!(view.page_count, 1);
    assert_eq!(view.aggregates.get("hours"), 0.0);
}

#[tokio::test]
async fn test_refresh_replaces_records_and_clamps_page() {
    let source = InMemorySource::with_records((0..12).map(|i| sheet("x", i as f64)).collect());
    let mut model = ListViewModel::<Timesheet>::new().with_reducer("hours", Reducer::sum("hrs"));
    model.set_page_size(5);
    model.refresh(&source).await.unwrap();
    model.set_page(3);
    assert_eq!(model.view().rows.len(), 2);

    source.set_records(vec![sheet("only", 4.0)]).await;
    model.refresh(&source).await.unwrap();

    let view = model.view();
    assert_eq!(view.page, 1);
    assert_eq!(people(view), vec!["only"]);
    assert_eq!(view.aggregates.get("hours"), 4.0);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_view() {
    let source = FlakySource {
        inner: InMemorySource::with_records(vec![sheet("Ann", 1.0), sheet("Bob", 2.0)]),
        fail: AtomicBool::new(false),
    };
    let mut model = ListViewModel::<Timesheet>::new();
    model.refresh(&source).await.unwrap();
    model.set_search_term("bo");

    source.fail.store(true, Ordering::SeqCst);
    let err = model.refresh(&source).await.unwrap_err();

    assert_eq!(err.error_code(), "FETCH_FAILED");
    assert!(err.to_string().contains("timesheet"));
    assert_eq!(model.records().len(), 2);
    assert_eq!(people(model.view()), vec!["Bob"]);
}

#[tokio::test]
async fn test_patch_then_reconcile() {
    let requests: Vec<LeaveRequest> = ["Ravi", "Meera"]
        .iter()
        .map(|name| LeaveRequest {
            id: Uuid::new_v4(),
            employee_name: name.to_string(),
            status: "pending".to_string(),
            days: 1.0,
            ..Default::default()
        })
        .collect();
    let source = InMemorySource::with_records(requests.clone());

    let mut model = ListViewModel::<LeaveRequest>::new().with_reducers(LeaveRequest::summary());
    model.refresh(&source).await.unwrap();
    model.set_filter("status", "pending");
    assert_eq!(model.view().total, 2);

    let approve = json!({ "status": "approved" });
    model
        .apply_local_patch(requests[0].id, approve.as_object().unwrap())
        .unwrap();
    assert_eq!(model.view().total, 1);
    assert_eq!(model.view().aggregates.get("requests"), 1.0);

    // Server stored something else; the next fetch wins
    let mut stored = requests.clone();
    stored[0].status = "rejected".to_string();
    source.set_records(stored).await;
    model.refresh(&source).await.unwrap();

    model.clear_filters();
    let ravi = model
        .records()
        .iter()
        .find(|r| r.id == requests[0].id)
        .unwrap();
    assert_eq!(ravi.status, "rejected");
}

#[test]
fn test_rejected_patch_leaves_records_untouched() {
    let mut model = ListViewModel::<LeaveRequest>::new();
    let request = LeaveRequest {
        id: Uuid::new_v4(),
        days: 2.0,
        ..Default::default()
    };
    model.replace_records(vec![request.clone()]);

    let bad = json!({ "days": -1.0 });
    let err = model
        .apply_local_patch(request.id, bad.as_object().unwrap())
        .unwrap_err();
    assert_eq!(err.error_code(), "PATCH_REJECTED");
    assert_eq!(model.records(), &[request][..]);
}

#[test]
fn test_filtering_is_idempotent() {
    let records = vec![sheet("Ann", 1.0), sheet("Bob", 7.0), sheet("Anya", 9.0)];
    let search = Filter::search("an");
    let long = Filter::Compare {
        field: "hrs".into(),
        op: CompareOp::Gt,
        value: 5.0.into(),
    };
    let predicates: [&dyn Predicate<Timesheet>; 2] = [&search, &long];

    let once = apply_filters(&records, &predicates);
    let twice = apply_filters(once.iter().copied(), &predicates);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
}

#[test]
fn test_json_payload_through_blocking_runtime() {
    let source = JsonSource::new(json!([
        { "id": Uuid::new_v4(), "person": "Ann", "hrs": "3.5" },
        { "id": Uuid::new_v4(), "person": "Bob", "hrs": 1.5 },
        { "id": Uuid::new_v4(), "person": null, "hrs": null }
    ]));
    let mut model = ListViewModel::<Timesheet>::new().with_reducer("hours", Reducer::sum("hrs"));

    tokio_test::block_on(model.refresh(&source)).unwrap();
    assert_eq!(people(model.view()), vec!["Ann", "Bob", ""]);
    assert_eq!(model.view().aggregates.get("hours"), 5.0);
}

#[test]
fn test_leave_rows_with_nulls_and_numeric_strings_are_kept() {
    let payload = json!([
        { "id": Uuid::new_v4(), "days": null },
        { "id": Uuid::new_v4(), "status": null, "days": 2 },
        { "id": Uuid::new_v4(), "days": "1.5" }
    ]);
    let requests: Vec<LeaveRequest> = decode_records(&payload).unwrap();
    assert_eq!(requests.len(), 3);

    let mut model = ListViewModel::<LeaveRequest>::new().with_reducers(LeaveRequest::summary());
    model.replace_records(requests);
    assert_eq!(model.view().aggregates.get("requests"), 3.0);
    assert_eq!(model.view().aggregates.get("days"), 3.5);
}

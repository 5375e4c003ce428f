//! Leave approval board driven by a ListViewModel
//!
//! Run with `RUST_LOG=tabula=debug cargo run --example leave_board` to see
//! the recomputation logs.

use serde_json::json;
use tabula::prelude::*;
use tracing_subscriber::EnvFilter;

fn print_board(title: &str, model: &ListViewModel<LeaveRequest>) {
    let view = model.view();
    println!("\n== {} ==", title);
    for request in &view.rows {
        println!(
            "  {:<14} {:<8} {:<9} {:>4} days  from {}",
            request.employee_name,
            request.leave_type,
            request.status,
            request.days,
            format_date(&request.field_value("start_date"), "%d %b %Y"),
        );
    }
    println!(
        "  {} | page {}/{} | {} requests, {} days",
        showing_label(view.start, view.end, view.total),
        view.page,
        view.page_count,
        view.aggregates.get("requests"),
        view.aggregates.get("days"),
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let payload = json!({
        "data": [
            { "id": Uuid::new_v4(), "employee_name": "Ravi Kumar", "leave_type": "casual", "status": "pending", "start_date": "2025-03-10", "days": 2, "applied_at": "2025-03-01T08:00:00Z" },
            { "id": Uuid::new_v4(), "employee_name": "Meera Iyer", "leave_type": "sick", "status": "approved", "start_date": "2025-02-17", "days": 1, "applied_at": "2025-02-17T07:30:00Z" },
            { "id": Uuid::new_v4(), "employee_name": "Sana Sheikh", "leave_type": "earned", "status": "pending", "start_date": "2025-04-01", "days": 5, "applied_at": "2025-03-05T10:15:00Z" },
            { "id": Uuid::new_v4(), "employee_name": "Arjun Das", "leave_type": "casual", "status": "rejected", "start_date": "not a date", "days": 1, "applied_at": "2025-01-20T12:00:00Z" },
            { "id": Uuid::new_v4(), "employee_name": "Broken", "days": -3 }
        ]
    });
    let api = JsonSource::new(payload);

    let config = ViewConfig::default_config();
    let mut board =
        ListViewModel::<LeaveRequest>::from_config(&config).with_reducers(LeaveRequest::summary());
    board.set_page_size(3);
    board.refresh(&api).await?;
    print_board("All requests, newest first", &board);

    board.set_filter("status", "pending");
    board.set_sort("start_date");
    print_board("Pending, by start date", &board);

    if let Some(first) = board.view().rows.first().map(|r| r.id) {
        let fields = json!({ "status": "approved" });
        if let Some(fields) = fields.as_object() {
            board.apply_local_patch(first, fields)?;
        }
    }
    print_board("After approving the first one", &board);

    board.set_filter("status", "all");
    board.set_page(2);
    print_board("Everything, page 2", &board);

    Ok(())
}

//! Leave requests awaiting or past approval

use crate::core::aggregate::{Reducer, Reducers};

crate::impl_record!(
    LeaveRequest,
    "leave_request",
    search: ["employee_name", "leave_type", "reason"],
    {
        employee_id: Option<uuid::Uuid> => Text,
        employee_name: String => Text,
        leave_type: String => Enum,
        status: String => Enum,
        start_date: Option<String> => Date,
        end_date: Option<String> => Date,
        #[validate(range(min = 0.0))]
        days: f64 => Number,
        reason: String => Text,
        applied_at: Option<String> => Date,
    }
);

/// Statuses a leave request moves through
pub const LEAVE_STATUSES: [&str; 3] = ["pending", "approved", "rejected"];

impl LeaveRequest {
    /// Request count and total days of the listed requests
    pub fn summary() -> Reducers {
        Reducers::from([
            ("requests".to_string(), Reducer::Count),
            ("days".to_string(), Reducer::sum("days")),
        ])
    }

    pub fn is_pending(&self) -> bool {
        self.status.eq_ignore_ascii_case("pending")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate;
    use crate::core::filter::{Filter, Predicate, apply_filters};
    use uuid::Uuid;

    fn request(name: &str, status: &str, days: f64) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_name: name.to_string(),
            leave_type: "casual".to_string(),
            status: status.to_string(),
            days,
            ..Default::default()
        }
    }

    #[test]
    fn test_pending_days_summary() {
        let requests = vec![
            request("Ravi", "pending", 2.0),
            request("Meera", "approved", 3.0),
            request("Sana", "Pending", 1.5),
        ];
        let pending: &dyn Predicate<LeaveRequest> = &Filter::equals("status", "pending");
        let filtered = apply_filters(&requests, &[pending]);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.is_pending()));

        let totals = aggregate(filtered.iter().copied(), &LeaveRequest::summary());
        assert_eq!(totals.get("requests"), 2.0);
        assert_eq!(totals.get("days"), 3.5);
    }

    #[test]
    fn test_statuses() {
        assert!(LEAVE_STATUSES.contains(&"approved"));
    }
}

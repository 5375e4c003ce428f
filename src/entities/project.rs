//! Client projects with time budgets

use crate::core::aggregate::{Reducer, Reducers};
use crate::core::format::minutes_to_hours;

crate::impl_record!(
    Project,
    "project",
    search: ["name", "client"],
    {
        name: String => Text,
        client: String => Text,
        status: String => Enum,
        #[validate(range(min = 0.0))]
        estimated_minutes: f64 => Number,
        monthly_cap: Option<f64> => Number,
        hourly_rate: Option<f64> => Number,
        #[validate(range(min = 0.0))]
        logged_minutes: f64 => Number,
        billable: bool => Boolean,
        created_at: Option<String> => Date,
    }
);

impl Project {
    /// Estimated and logged hours, monthly caps and billable cost
    pub fn summary() -> Reducers {
        Reducers::from([
            ("projects".to_string(), Reducer::Count),
            (
                "estimated_hours".to_string(),
                Reducer::MinutesAsHours {
                    field: "estimated_minutes".to_string(),
                },
            ),
            (
                "logged_hours".to_string(),
                Reducer::MinutesAsHours {
                    field: "logged_minutes".to_string(),
                },
            ),
            ("monthly_cap".to_string(), Reducer::sum("monthly_cap")),
            (
                "cost".to_string(),
                Reducer::TimeCost {
                    minutes: "logged_minutes".to_string(),
                    hourly_rate: "hourly_rate".to_string(),
                },
            ),
        ])
    }

    pub fn estimated_hours(&self) -> f64 {
        minutes_to_hours(self.estimated_minutes)
    }

    /// Share of the estimate already logged; zero without an estimate
    pub fn progress(&self) -> f64 {
        if self.estimated_minutes > 0.0 {
            self.logged_minutes / self.estimated_minutes
        } else {
            0.0
        }
    }
}

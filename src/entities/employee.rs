//! Employee directory rows

use crate::core::aggregate::{Reducer, Reducers};

crate::impl_record!(
    /// One row of the employee directory
    Employee,
    "employee",
    search: ["name", "email", "department", "designation"],
    {
        name: String => Text,
        #[validate(email)]
        email: Option<String> => Text,
        department: String => Enum,
        designation: String => Text,
        role: String => Enum,
        status: String => Enum,
        joined_at: Option<String> => Date,
    }
);

impl Employee {
    /// Headcount cards shown above the directory
    pub fn summary() -> Reducers {
        Reducers::from([("headcount".to_string(), Reducer::Count)])
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{Filter, Predicate};
    use crate::core::record::Record;
    use crate::core::sort::{SortSpec, apply_sort};
    use uuid::Uuid;
    use validator::Validate;

    fn employee(name: &str, email: Option<&str>, joined_at: Option<&str>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.map(str::to_string),
            department: "Engineering".to_string(),
            status: "active".to_string(),
            joined_at: joined_at.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_covers_email() {
        let e = employee("Priya Nair", Some("priya@acme.io"), None);
        assert!(Filter::search("ACME").matches(&e));
        assert!(!Filter::search("bangalore").matches(&e));
    }

    #[test]
    fn test_validation_rejects_bad_email() {
        assert!(employee("A", Some("a@b.co"), None).validate().is_ok());
        assert!(employee("A", Some("nope"), None).validate().is_err());
        assert!(employee("A", None, None).validate().is_ok());
    }

    #[test]
    fn test_missing_join_date_sorts_first() {
        let rows = vec![
            employee("Late", None, Some("2024-03-01")),
            employee("Unknown", None, Some("someday")),
            employee("Early", None, Some("2021-07-15T09:30:00Z")),
        ];
        let sorted = apply_sort(rows.iter().collect(), &SortSpec::asc("joined_at"));
        let names: Vec<_> = sorted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Unknown", "Early", "Late"]);
    }

    #[test]
    fn test_schema_kinds() {
        assert_eq!(Employee::entity_type(), "employee");
        assert!(Employee::has_field("joined_at"));
        assert!(!Employee::has_field("salary"));
    }
}

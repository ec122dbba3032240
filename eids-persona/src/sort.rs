// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::application::Application;

/// Column an applications table can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Status,
    Department,
    RequestedAmount,
    Priority,
    Progress,
    SubmittedDate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking the active column header flips the direction, any other column starts ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }

    fn compare(&self, a: &Application, b: &Application) -> Ordering {
        let by_field = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Department => a.department.cmp(&b.department),
            SortField::RequestedAmount => a.requested_amount.cmp(&b.requested_amount),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Progress => a.progress.cmp(&b.progress),
            SortField::SubmittedDate => a.submitted_date.cmp(&b.submitted_date),
        };

        // Ties fall back to the id so the order is total and descending is the exact reverse of
        // ascending.
        let ordering = by_field.then_with(|| a.id.cmp(&b.id));

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sorts rows in place.
pub fn sort_applications(rows: &mut [&Application], spec: SortSpec) {
    rows.sort_by(|a, b| spec.compare(a, b));
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::application::Application;
    use crate::fixtures;

    use super::{SortDirection, SortField, SortSpec, sort_applications};

    fn ids(rows: &[&Application]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }

    #[rstest]
    #[case(SortField::Name)]
    #[case(SortField::Status)]
    #[case(SortField::Department)]
    #[case(SortField::RequestedAmount)]
    #[case(SortField::Priority)]
    #[case(SortField::Progress)]
    #[case(SortField::SubmittedDate)]
    fn descending_reverses_ascending(#[case] field: SortField) {
        let applications = fixtures::applications().unwrap();
        let mut rows: Vec<&Application> = applications.iter().collect();

        sort_applications(&mut rows, SortSpec::new(field, SortDirection::Ascending));
        let ascending = ids(&rows);

        sort_applications(&mut rows, SortSpec::new(field, SortDirection::Descending));
        let mut descending = ids(&rows);
        descending.reverse();

        assert_eq!(ascending, descending);
    }

    #[test]
    fn equal_keys_are_ordered_by_id() {
        let applications = fixtures::applications().unwrap();
        let mut rows: Vec<&Application> = applications.iter().collect();
        sort_applications(
            &mut rows,
            SortSpec::new(SortField::Status, SortDirection::Ascending),
        );

        for pair in rows.windows(2) {
            if pair[0].status == pair[1].status {
                assert!(pair[0].id < pair[1].id);
            } else {
                assert!(pair[0].status < pair[1].status);
            }
        }
    }

    #[test]
    fn toggles_direction_on_same_column() {
        let spec = SortSpec::new(SortField::Name, SortDirection::Ascending);
        assert_eq!(spec.toggle(SortField::Name).direction, SortDirection::Descending);
        assert_eq!(
            spec.toggle(SortField::Name).toggle(SortField::Name).direction,
            SortDirection::Ascending
        );
        assert_eq!(
            spec.toggle(SortField::Progress),
            SortSpec::new(SortField::Progress, SortDirection::Ascending)
        );
    }
}

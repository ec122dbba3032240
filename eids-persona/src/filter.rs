// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::application::{Application, ApplicationStatus};
use crate::sort::{SortSpec, sort_applications};

/// Declarative rule scoping which applications a persona sees.
///
/// All set fields must hold for an application to be included. `show_all` overrides every
/// other field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    #[serde(default)]
    pub show_all: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Cow<'static, str>>,

    /// Inclusive lower bound on the requested amount, in whole dollars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_budget: Option<u64>,

    /// Allow-list of statuses. An empty list does not restrict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Cow<'static, [ApplicationStatus]>>,
}

impl ApplicationFilter {
    pub const fn show_all() -> Self {
        Self {
            show_all: true,
            assignee_id: None,
            min_budget: None,
            statuses: None,
        }
    }

    pub const fn assigned_to(assignee_id: &'static str) -> Self {
        Self {
            show_all: false,
            assignee_id: Some(Cow::Borrowed(assignee_id)),
            min_budget: None,
            statuses: None,
        }
    }

    pub const fn min_budget(min_budget: u64) -> Self {
        Self {
            show_all: false,
            assignee_id: None,
            min_budget: Some(min_budget),
            statuses: None,
        }
    }

    pub const fn statuses(statuses: &'static [ApplicationStatus]) -> Self {
        Self {
            show_all: false,
            assignee_id: None,
            min_budget: None,
            statuses: Some(Cow::Borrowed(statuses)),
        }
    }

    pub fn matches(&self, application: &Application) -> bool {
        if self.show_all {
            return true;
        }

        if let Some(assignee_id) = &self.assignee_id {
            if application.assignee.id != assignee_id.as_ref() {
                return false;
            }
        }

        if let Some(min_budget) = self.min_budget {
            if application.requested_amount < min_budget {
                return false;
            }
        }

        if let Some(statuses) = &self.statuses {
            if !statuses.is_empty() && !statuses.contains(&application.status) {
                return false;
            }
        }

        true
    }
}

/// Returns the applications matching `rule`, in input order.
pub fn filter_applications<'a>(
    all: &'a [Application],
    rule: &ApplicationFilter,
) -> Vec<&'a Application> {
    all.iter()
        .filter(|application| rule.matches(application))
        .collect()
}

/// Table controls applied on top of the persona filter: search box, status tab and sorting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub status: Option<ApplicationStatus>,

    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl ApplicationQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    fn matches_search(application: &Application, needle: &str) -> bool {
        [
            application.id.as_str(),
            application.name.as_str(),
            application.department.as_str(),
            application.assignee.name.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(needle))
    }

    /// Narrows and orders rows which already passed the persona filter.
    pub fn apply<'a>(&self, rows: Vec<&'a Application>) -> Vec<&'a Application> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<&Application> = rows
            .into_iter()
            .filter(|application| match self.status {
                Some(status) => application.status == status,
                None => true,
            })
            .filter(|application| match &needle {
                Some(needle) => Self::matches_search(application, needle),
                None => true,
            })
            .collect();

        if let Some(sort) = self.sort {
            sort_applications(&mut rows, sort);
        }

        rows
    }
}

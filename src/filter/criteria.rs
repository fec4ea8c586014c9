use crate::types::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sort applied by the list surfaces when the caller names none.
pub const DEFAULT_SORT_FIELD: &str = "dueDate";
pub const DEFAULT_SORT_DIRECTION: &str = "asc";

fn default_sort_by() -> Option<String> {
    Some(DEFAULT_SORT_FIELD.to_string())
}

fn default_sort_direction() -> Option<String> {
    Some(DEFAULT_SORT_DIRECTION.to_string())
}

/// Optional, independent filter predicates plus a requested sort for one list query.
///
/// Every field is optional. Field names on the wire follow the list endpoint's
/// query parameters (`dueDateFrom`, `sortBy`, ...); a request that omits
/// `sortBy`/`sortDirection` sorts by `dueDate` ascending. Values built in code
/// start with no sort at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    #[serde(rename = "dueDateFrom")]
    pub due_from: Option<NaiveDate>,
    #[serde(rename = "dueDateTo")]
    pub due_to: Option<NaiveDate>,
    pub search: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: Option<String>,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: Option<String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn due_from(mut self, from: NaiveDate) -> Self {
        self.due_from = Some(from);
        self
    }

    #[must_use]
    pub const fn due_to(mut self, to: NaiveDate) -> Self {
        self.due_to = Some(to);
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    #[must_use]
    pub fn sort_direction(mut self, direction: impl Into<String>) -> Self {
        self.sort_direction = Some(direction.into());
        self
    }

    /// The search term with surrounding whitespace removed, or `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The sort field, or `None` when absent or blank.
    #[must_use]
    pub fn sort_field(&self) -> Option<&str> {
        self.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

//! Input checks that run before requests reach the store or the filter compiler.

use crate::errors::TaskError;
use crate::filter::FilterCriteria;
use crate::task::TaskRequest;

pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 5;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// # Errors
/// Returns `TaskError::Validation` when `priority` is outside 1..=5.
pub fn validate_priority(priority: i32) -> Result<(), TaskError> {
    if (PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        Ok(())
    } else {
        Err(TaskError::Validation(format!(
            "Priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}"
        )))
    }
}

/// # Errors
/// Returns `TaskError::Validation` describing the first violated rule.
pub fn validate_request(req: &TaskRequest) -> Result<(), TaskError> {
    if req.title.trim().is_empty() {
        return Err(TaskError::Validation("Title is required".into()));
    }
    if req.title.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::Validation(format!(
            "Title must be between 1 and {TITLE_MAX_CHARS} characters"
        )));
    }
    if req.description.as_ref().is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS) {
        return Err(TaskError::Validation(format!(
            "Description must not exceed {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    validate_priority(req.priority)
}

/// Only the due-date range is checked. A list priority outside 1..=5 is
/// accepted and simply matches nothing.
///
/// # Errors
/// Returns `TaskError::Validation` for an inverted due-date range.
pub fn validate_criteria(criteria: &FilterCriteria) -> Result<(), TaskError> {
    if let (Some(from), Some(to)) = (criteria.due_from, criteria.due_to)
        && from > to
    {
        return Err(TaskError::Validation(
            "dueDateFrom must be before or equal to dueDateTo".into(),
        ));
    }
    Ok(())
}

use super::compiled::{CompiledQuery, Predicate, SortClause, SortDirection};
use super::criteria::FilterCriteria;
use crate::task::{fields, format_date};
use bson::Bson;

/// Fields the free-text search looks into.
pub const SEARCH_FIELDS: [&str; 2] = [fields::TITLE, fields::DESCRIPTION];

/// Compiles filter criteria into a single storage query.
///
/// Predicates come out in a fixed order: status, priority, due date, search.
/// Absent or blank inputs contribute nothing. Values are not re-validated here,
/// so an inverted due-date range is emitted exactly as given.
#[must_use]
pub fn compile(criteria: &FilterCriteria) -> CompiledQuery {
    let mut predicates = Vec::with_capacity(4);

    if let Some(status) = criteria.status {
        predicates.push(Predicate::Equals {
            field: fields::STATUS.to_string(),
            value: Bson::String(status.as_str().to_string()),
        });
    }

    if let Some(priority) = criteria.priority {
        predicates.push(Predicate::Equals {
            field: fields::PRIORITY.to_string(),
            value: Bson::Int32(priority),
        });
    }

    let field = fields::DUE_DATE.to_string();
    match (criteria.due_from, criteria.due_to) {
        (Some(from), Some(to)) => predicates.push(Predicate::RangeBetween {
            field,
            lo: date(from),
            hi: date(to),
        }),
        (Some(from), None) => predicates.push(Predicate::RangeGte { field, value: date(from) }),
        (None, Some(to)) => predicates.push(Predicate::RangeLte { field, value: date(to) }),
        (None, None) => {}
    }

    if let Some(term) = criteria.search_term() {
        predicates.push(Predicate::OrSubstringCI {
            fields: SEARCH_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            pattern: term.to_string(),
        });
    }

    let sort = criteria.sort_field().map(|field| SortClause {
        field: field.to_string(),
        direction: SortDirection::parse_lenient(criteria.sort_direction.as_deref()),
    });

    CompiledQuery { predicates, sort }
}

fn date(d: chrono::NaiveDate) -> Bson {
    Bson::String(format_date(d))
}

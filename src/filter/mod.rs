//! Filter compilation: optional list criteria in, one storage query out.

mod compile;
mod compiled;
mod criteria;

pub use compile::{SEARCH_FIELDS, compile};
pub use compiled::{CompiledQuery, Predicate, SortClause, SortDirection, substring_pattern};
pub use criteria::{DEFAULT_SORT_DIRECTION, DEFAULT_SORT_FIELD, FilterCriteria};

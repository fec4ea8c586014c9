//! Storage-neutral query produced by the filter compiler, and its lowering
//! into the store's [`Filter`] tree.

use crate::query::{CmpOp, Filter, Order, SortSpec};
use bson::Bson;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// DESC only for a case-insensitive "desc"; anything else, including nothing, is ASC.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

/// One atomic condition contributed to a compiled query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Predicate {
    Equals { field: String, value: Bson },
    RangeGte { field: String, value: Bson },
    RangeLte { field: String, value: Bson },
    /// Inclusive on both ends.
    RangeBetween { field: String, lo: Bson, hi: Bson },
    /// Case-insensitive unanchored substring match against any of `fields`.
    OrSubstringCI { fields: Vec<String>, pattern: String },
}

impl Predicate {
    fn lower(&self) -> Filter {
        match self {
            Self::Equals { field, value } => cmp(field, CmpOp::Eq, value),
            Self::RangeGte { field, value } => cmp(field, CmpOp::Gte, value),
            Self::RangeLte { field, value } => cmp(field, CmpOp::Lte, value),
            Self::RangeBetween { field, lo, hi } => {
                Filter::And(vec![cmp(field, CmpOp::Gte, lo), cmp(field, CmpOp::Lte, hi)])
            }
            Self::OrSubstringCI { fields, pattern } => {
                let regex = substring_pattern(pattern);
                Filter::Or(
                    fields
                        .iter()
                        .map(|f| Filter::Regex {
                            path: f.clone(),
                            pattern: regex.clone(),
                            case_insensitive: true,
                        })
                        .collect(),
                )
            }
        }
    }
}

/// AND-combined predicates, in construction order, plus an optional sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicates: Vec<Predicate>,
    pub sort: Option<SortClause>,
}

impl CompiledQuery {
    /// Lowers the predicate list into the store's filter tree.
    #[must_use]
    pub fn to_filter(&self) -> Filter {
        if self.predicates.is_empty() {
            return Filter::True;
        }
        Filter::And(self.predicates.iter().map(Predicate::lower).collect())
    }

    #[must_use]
    pub fn sort_specs(&self) -> Vec<SortSpec> {
        self.sort
            .iter()
            .map(|s| SortSpec {
                field: s.field.clone(),
                order: match s.direction {
                    SortDirection::Asc => Order::Asc,
                    SortDirection::Desc => Order::Desc,
                },
            })
            .collect()
    }

    /// Stable digest for query logs, so raw search input never reaches them.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(format!("{self:?}").as_bytes());
        hex::encode(h.finalize())
    }
}

/// Turns a search term into the store's substring pattern.
///
/// The term is passed through verbatim: regex metacharacters keep their meaning.
/// Escaping, if ever wanted, belongs here (`regex::escape`) and nowhere else.
#[must_use]
pub fn substring_pattern(term: &str) -> String {
    format!(".*{term}.*")
}

fn cmp(field: &str, op: CmpOp, value: &Bson) -> Filter {
    Filter::Cmp { path: field.to_string(), op, value: value.clone() }
}

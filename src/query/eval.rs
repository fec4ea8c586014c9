use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_PATH_DEPTH, MAX_PATTERN_LEN, MAX_SORT_FIELDS, Order, SortSpec};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Or(fs) => fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Cmp { path, op, value } => {
            let Some(v) = get_path(doc, path) else {
                return false;
            };
            if *op == CmpOp::Eq {
                return bson_equal(v, value);
            }
            // Range operators only match values of the same type class.
            let Some(c) = compare_same_class(v, value) else {
                return false;
            };
            match op {
                CmpOp::Eq => c == Ordering::Equal,
                CmpOp::Gte => c != Ordering::Less,
                CmpOp::Lte => c != Ordering::Greater,
            }
        }
        Filter::Regex { path, pattern, case_insensitive } => {
            let Some(Bson::String(s)) = get_path(doc, path) else {
                return false;
            };
            if pattern.len() > MAX_PATTERN_LEN {
                log::warn!("regex pattern too long: {}", pattern.len());
                return false;
            }
            let mut re = regex::RegexBuilder::new(pattern);
            re.case_insensitive(*case_insensitive);
            match re.build() {
                Ok(r) => r.is_match(s),
                Err(e) => {
                    log::debug!("unusable regex pattern {pattern:?}: {e}");
                    false
                }
            }
        }
    }
}

pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort.iter().take(MAX_SORT_FIELDS) {
        let va = get_path(a, &s.field).filter(|v| !matches!(v, Bson::Null));
        let vb = get_path(b, &s.field).filter(|v| !matches!(v, Bson::Null));
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() > MAX_PATH_DEPTH {
        return None;
    }
    let (last, parents) = parts.split_last()?;
    let mut cur = doc;
    for part in parents {
        match cur.get(*part) {
            Some(Bson::Document(d)) => cur = d,
            _ => return None,
        }
    }
    cur.get(*last)
}

fn is_num(x: &Bson) -> bool {
    matches!(x, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64_num(x: &Bson) -> f64 {
    match x {
        Bson::Int32(i) => f64::from(*i),
        Bson::Int64(i) => *i as f64,
        Bson::Double(f) => *f,
        _ => f64::NAN,
    }
}

fn bson_equal(a: &Bson, b: &Bson) -> bool {
    if is_num(a) && is_num(b) {
        return as_f64_num(a) == as_f64_num(b);
    }
    a == b
}

fn compare_same_class(a: &Bson, b: &Bson) -> Option<Ordering> {
    if is_num(a) && is_num(b) {
        return Some(as_f64_num(a).total_cmp(&as_f64_num(b)));
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    compare_same_class(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::Null => 0,
        Bson::Boolean(_) => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 2,
        Bson::String(_) => 5,
        Bson::Array(_) => 6,
        Bson::Document(_) => 7,
        Bson::DateTime(_) => 10,
        _ => 200,
    }
}

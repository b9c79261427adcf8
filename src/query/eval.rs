use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

pub(crate) const MAX_PATH_DEPTH: usize = 32;

/// Resolves a dot path against a document. A numeric segment indexes into
/// an array, so `organizerList.0.email` reaches the first embedded
/// organizer's email.
pub fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let mut segs = path.split('.');
    let mut cur = doc.get(segs.next()?)?;
    let mut depth = 1usize;
    for seg in segs {
        depth += 1;
        if depth > MAX_PATH_DEPTH {
            return None;
        }
        cur = match cur {
            Bson::Document(d) => d.get(seg)?,
            Bson::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Equality with numeric type coercion: `Int32(50)` equals `Double(50.0)`.
pub fn values_equal(a: &Bson, b: &Bson) -> bool {
    if is_num(a) && is_num(b) {
        return compare_bson(a, b) == Ordering::Equal;
    }
    a == b
}

pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    if is_num(a) && is_num(b) {
        return as_f64_num(a).total_cmp(&as_f64_num(b));
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn is_num(x: &Bson) -> bool {
    matches!(x, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64_num(x: &Bson) -> f64 {
    match x {
        Bson::Int32(i) => f64::from(*i),
        Bson::Int64(i) => *i as f64,
        Bson::Double(f) => *f,
        Bson::Decimal128(d) => d.to_string().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::Null => 0,
        Bson::Boolean(_) => 1,
        Bson::Int32(_) => 2,
        Bson::Int64(_) => 3,
        Bson::Double(_) => 4,
        Bson::Decimal128(_) => 5,
        Bson::String(_) => 6,
        Bson::Array(_) => 7,
        Bson::Document(_) => 8,
        Bson::ObjectId(_) => 9,
        Bson::DateTime(_) => 10,
        _ => 100,
    }
}

/// Comparison-operator dispatch for `$match` conditions. A missing field
/// only satisfies `$ne`.
pub(crate) fn apply_op(actual: Option<&Bson>, op: &str, expected: &Bson) -> Option<bool> {
    let Some(v) = actual else {
        return match op {
            "$ne" => Some(true),
            "$eq" | "$gt" | "$gte" | "$lt" | "$lte" => Some(false),
            _ => None,
        };
    };
    let hit = match op {
        "$eq" => values_equal(v, expected),
        "$ne" => !values_equal(v, expected),
        "$gt" => compare_bson(v, expected) == Ordering::Greater,
        "$gte" => compare_bson(v, expected) != Ordering::Less,
        "$lt" => compare_bson(v, expected) == Ordering::Less,
        "$lte" => compare_bson(v, expected) != Ordering::Greater,
        _ => return None,
    };
    Some(hit)
}

/// Orders two documents by a `$sort` key document (field -> 1 | -1).
/// Documents missing a key sort before documents carrying it, ascending.
pub(crate) fn compare_docs(a: &BsonDocument, b: &BsonDocument, keys: &BsonDocument) -> Ordering {
    for (field, dir) in keys {
        let ord = match (get_path(a, field), get_path(b, field)) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            let ascending = matches!(dir, Bson::Int32(n) if *n >= 0)
                || matches!(dir, Bson::Int64(n) if *n >= 0)
                || matches!(dir, Bson::Double(n) if *n >= 0.0);
            return if ascending { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

use bson::{Document, doc};

use super::types::{Pagination, SortSpec};

/// A single `$sort` stage whose key order matches the input list; the first
/// entry is the primary sort key. Empty input emits nothing, leaving the
/// collection-default (insertion) order.
#[must_use]
pub fn sort_stage(sort: &[SortSpec]) -> Option<Document> {
    if sort.is_empty() {
        return None;
    }
    let mut keys = Document::new();
    for s in sort {
        keys.insert(s.field.clone(), s.order.direction());
    }
    Some(doc! {"$sort": keys})
}

/// `$skip` then `$limit`, each only when present and positive. Skip must
/// precede limit so the limit window applies after the skipped prefix.
/// Absence of both means an unbounded result set.
#[must_use]
pub fn pagination_stages(pagination: &Pagination) -> Vec<Document> {
    let mut stages = Vec::new();
    if let Some(skip) = pagination.skip
        && skip > 0
    {
        stages.push(doc! {"$skip": i64::try_from(skip).unwrap_or(i64::MAX)});
    }
    if let Some(limit) = pagination.limit
        && limit > 0
    {
        stages.push(doc! {"$limit": i64::try_from(limit).unwrap_or(i64::MAX)});
    }
    stages
}

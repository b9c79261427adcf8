use crate::schema::Entity;
use bson::{Document, doc};

use super::types::{FilterOp, FilterSpec, FilterValue};

/// Builds the match stages for a filter list, in filter-list order.
///
/// Flat conditions accumulate into one combined `$match` (AND semantics)
/// placed where the first flat filter appeared. A dot-path whose head names
/// one of the entity's embedded reference arrays instead contributes an
/// `$addFields`+`$match` pair: the array is narrowed to elements whose
/// sub-field equals the operand, then the requested operator is tested
/// against the first surviving element. The narrowing step always tests
/// equality, whatever operator was requested.
#[must_use]
pub fn filter_stages(entity: Entity, filters: &[FilterSpec]) -> Vec<Document> {
    let mut stages: Vec<Document> = Vec::new();
    let mut flat = Document::new();
    let mut flat_pos: Option<usize> = None;
    for f in filters {
        match split_reference_path(entity, &f.field) {
            Some((head, rest)) => {
                stages.push(narrow_array_stage(head, rest, &f.value));
                stages.push(first_element_match(head, rest, f.operator, &f.value));
            }
            None => {
                if flat_pos.is_none() {
                    flat_pos = Some(stages.len());
                }
                flat.insert(f.field.clone(), doc! {f.operator.mongo_key(): f.value.to_bson()});
            }
        }
    }
    if let Some(pos) = flat_pos {
        stages.insert(pos, doc! {"$match": flat});
    }
    stages
}

/// Splits `organizerList.email` into (`organizerList`, `email`) when the
/// head names an embedded reference array. Returns `None` for flat fields,
/// including dot-paths whose head is an ordinary subdocument.
fn split_reference_path<'a>(entity: Entity, field: &'a str) -> Option<(&'a str, &'a str)> {
    let (head, rest) = field.split_once('.')?;
    if rest.is_empty() {
        return None;
    }
    entity.is_reference_field(head).then_some((head, rest))
}

/// `$addFields` writing the narrowed copy of the array under
/// `value.<field>`, keeping only elements whose sub-field equals the
/// operand.
fn narrow_array_stage(head: &str, rest: &str, value: &FilterValue) -> Document {
    let binding = format!("{head}Item");
    doc! {"$addFields": {
        format!("value.{head}"): {"$filter": {
            "input": format!("${head}"),
            "as": binding.as_str(),
            "cond": {"$eq": [format!("$${binding}.{rest}"), value.to_bson()]},
        }},
    }}
}

/// `$match` applying the requested operator to the first element of the
/// narrowed array.
fn first_element_match(head: &str, rest: &str, op: FilterOp, value: &FilterValue) -> Document {
    doc! {"$match": {
        format!("value.{head}.0.{rest}"): {op.mongo_key(): value.to_bson()},
    }}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::FilterOp;

    fn flat(field: &str, value: impl Into<FilterValue>, op: FilterOp) -> FilterSpec {
        FilterSpec { field: field.into(), value: value.into(), operator: op }
    }

    #[test]
    fn flat_filters_merge_into_one_match() {
        let stages = filter_stages(
            Entity::Event,
            &[flat("status", "Completed", FilterOp::Eq), flat("capacity", 50.0, FilterOp::Gte)],
        );
        assert_eq!(
            stages,
            vec![doc! {"$match": {"status": {"$eq": "Completed"}, "capacity": {"$gte": 50.0}}}]
        );
    }

    #[test]
    fn nested_filter_emits_narrow_then_match() {
        let stages = filter_stages(
            Entity::Event,
            &[flat("organizerList.email", "jay@rocknation.com", FilterOp::Eq)],
        );
        assert_eq!(
            stages,
            vec![
                doc! {"$addFields": {"value.organizerList": {"$filter": {
                    "input": "$organizerList",
                    "as": "organizerListItem",
                    "cond": {"$eq": ["$$organizerListItem.email", "jay@rocknation.com"]},
                }}}},
                doc! {"$match": {"value.organizerList.0.email": {"$eq": "jay@rocknation.com"}}},
            ]
        );
    }

    #[test]
    fn nested_narrowing_ignores_requested_operator() {
        // The array-narrowing cond is $eq even for a gte filter; the
        // requested operator only reaches the element-0 match.
        let stages =
            filter_stages(Entity::Event, &[flat("rsvpList.guestCount", 2.0, FilterOp::Gte)]);
        assert_eq!(stages.len(), 2);
        let cond = stages[0]
            .get_document("$addFields")
            .unwrap()
            .get_document("value.rsvpList")
            .unwrap()
            .get_document("$filter")
            .unwrap()
            .get_document("cond")
            .unwrap();
        assert!(cond.contains_key("$eq"));
        assert_eq!(
            stages[1],
            doc! {"$match": {"value.rsvpList.0.guestCount": {"$gte": 2.0}}}
        );
    }

    #[test]
    fn dotted_path_into_plain_subdocument_stays_flat() {
        // "location" is not a reference array on Event, so the dot-path is
        // an ordinary flat condition.
        let stages = filter_stages(Entity::Event, &[flat("location.city", "Oslo", FilterOp::Eq)]);
        assert_eq!(stages, vec![doc! {"$match": {"location.city": {"$eq": "Oslo"}}}]);
    }

    #[test]
    fn flat_match_sits_at_first_flat_position() {
        let stages = filter_stages(
            Entity::Event,
            &[
                flat("status", "Live", FilterOp::Eq),
                flat("organizerList.email", "a@b.c", FilterOp::Eq),
                flat("capacity", 10.0, FilterOp::Lt),
            ],
        );
        assert_eq!(stages.len(), 3);
        assert_eq!(
            stages[0],
            doc! {"$match": {"status": {"$eq": "Live"}, "capacity": {"$lt": 10.0}}}
        );
        assert!(stages[1].contains_key("$addFields"));
        assert!(stages[2].contains_key("$match"));
    }

    #[test]
    fn empty_filter_list_emits_nothing() {
        assert!(filter_stages(Entity::Event, &[]).is_empty());
    }
}

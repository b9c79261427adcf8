use bson::doc;
use gatherly::pipeline::{
    FilterOp, FilterSpec, Order, Pagination, QueryOptions, SortSpec, build_pipeline, lookup_stages,
    parse_options_json,
};
use gatherly::schema::Entity;

fn filter(field: &str, value: impl Into<gatherly::pipeline::FilterValue>, op: FilterOp) -> FilterSpec {
    FilterSpec { field: field.into(), value: value.into(), operator: op }
}

#[test]
fn flat_filters_merge_into_single_match() {
    let opts = QueryOptions {
        filters: Some(vec![
            filter("status", "Completed", FilterOp::Eq),
            filter("capacity", 50.0, FilterOp::Gte),
        ]),
        ..QueryOptions::default()
    };
    let pipeline = build_pipeline(Entity::Venue, Some(&opts));
    assert_eq!(
        pipeline,
        vec![doc! {"$match": {"status": {"$eq": "Completed"}, "capacity": {"$gte": 50.0}}}]
    );
}

#[test]
fn nested_filter_emits_addfields_then_match() {
    let opts = QueryOptions {
        filters: Some(vec![filter("organizerList.email", "jay@rocknation.com", FilterOp::Eq)]),
        ..QueryOptions::default()
    };
    let pipeline = build_pipeline(Entity::Event, Some(&opts));
    let mut expected = lookup_stages(Entity::Event);
    expected.push(doc! {"$addFields": {"value.organizerList": {"$filter": {
        "input": "$organizerList",
        "as": "organizerListItem",
        "cond": {"$eq": ["$$organizerListItem.email", "jay@rocknation.com"]},
    }}}});
    expected.push(doc! {"$match": {"value.organizerList.0.email": {"$eq": "jay@rocknation.com"}}});
    assert_eq!(pipeline, expected);
}

#[test]
fn absent_options_equal_lookup_stages() {
    assert_eq!(build_pipeline(Entity::Event, None), lookup_stages(Entity::Event));
    assert_eq!(build_pipeline(Entity::Organization, None), lookup_stages(Entity::Organization));
    assert!(build_pipeline(Entity::EventCategory, None).is_empty());
}

#[test]
fn pagination_emits_skip_before_limit() {
    let opts = QueryOptions {
        pagination: Some(Pagination { limit: Some(10), skip: Some(5) }),
        ..QueryOptions::default()
    };
    let pipeline = build_pipeline(Entity::Venue, Some(&opts));
    assert_eq!(pipeline, vec![doc! {"$skip": 5_i64}, doc! {"$limit": 10_i64}]);
}

#[test]
fn multi_key_sort_preserves_input_order() {
    let opts = QueryOptions {
        sort: Some(vec![
            SortSpec { field: "capacity".into(), order: Order::Asc },
            SortSpec { field: "title".into(), order: Order::Desc },
        ]),
        ..QueryOptions::default()
    };
    let pipeline = build_pipeline(Entity::Venue, Some(&opts));
    assert_eq!(pipeline, vec![doc! {"$sort": {"capacity": 1, "title": -1}}]);
}

#[test]
fn end_to_end_concatenation_order_for_events() {
    let opts = QueryOptions {
        sort: Some(vec![SortSpec { field: "capacity".into(), order: Order::Asc }]),
        pagination: Some(Pagination { limit: Some(10), skip: Some(5) }),
        filters: Some(vec![filter("status", "Completed", FilterOp::Eq)]),
    };
    let pipeline = build_pipeline(Entity::Event, Some(&opts));
    let mut expected = lookup_stages(Entity::Event);
    expected.push(doc! {"$sort": {"capacity": 1}});
    expected.push(doc! {"$skip": 5_i64});
    expected.push(doc! {"$limit": 10_i64});
    expected.push(doc! {"$match": {"status": {"$eq": "Completed"}}});
    assert_eq!(pipeline, expected);
}

#[test]
fn parsed_json_options_compile_identically() {
    let opts = parse_options_json(
        r#"{
            "sort": [{"field": "capacity", "order": "asc"}],
            "pagination": {"limit": 10, "skip": 5},
            "filters": [{"field": "status", "value": "Completed", "operator": "eq"}]
        }"#,
    )
    .unwrap();
    let typed = QueryOptions {
        sort: Some(vec![SortSpec { field: "capacity".into(), order: Order::Asc }]),
        pagination: Some(Pagination { limit: Some(10), skip: Some(5) }),
        filters: Some(vec![filter("status", "Completed", FilterOp::Eq)]),
    };
    assert_eq!(opts, typed);
    assert_eq!(build_pipeline(Entity::Event, Some(&opts)), build_pipeline(Entity::Event, Some(&typed)));
}

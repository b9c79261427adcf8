use crate::schema::Entity;
use bson::Document;

use super::filter::filter_stages;
use super::lookup::lookup_stages;
use super::stages::{pagination_stages, sort_stage};
use super::types::QueryOptions;

/// Translates a request's `QueryOptions` into the aggregation pipeline for
/// one entity: lookups (always), then sort, then pagination, then filters.
/// The stage order is load-bearing: filter stages may reference fields the
/// lookup stages embed, so stages are never reordered. Absent options
/// produce the lookup stages alone.
///
/// Pure and synchronous; identical inputs yield identical stage arrays.
#[must_use]
pub fn build_pipeline(entity: Entity, options: Option<&QueryOptions>) -> Vec<Document> {
    let mut pipeline = lookup_stages(entity);
    let Some(opts) = options else {
        return pipeline;
    };
    if let Some(sort) = &opts.sort
        && let Some(stage) = sort_stage(sort)
    {
        pipeline.push(stage);
    }
    if let Some(pagination) = &opts.pagination {
        pipeline.extend(pagination_stages(pagination));
    }
    if let Some(filters) = &opts.filters {
        pipeline.extend(filter_stages(entity, filters));
    }
    pipeline
}

//! Read layer: compiles request options into a pipeline, runs it, and
//! normalizes failures. Domain misses surface as tagged `NotFound`; every
//! other failure is logged and rethrown as a generic query error.

use crate::engine::Engine;
use crate::errors::GatherlyError;
use crate::pipeline::{FilterOp, FilterSpec, QueryOptions, build_pipeline};
use crate::query::run_pipeline;
use crate::schema::Entity;
use bson::Document;

/// List read for one entity. Unknown filter fields are not validated; they
/// simply match nothing and yield an empty result.
pub fn read_documents(
    engine: &Engine,
    entity: Entity,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    let pipeline = build_pipeline(entity, options);
    run_pipeline(engine, entity, &pipeline).map_err(|e| {
        log::error!("read {} failed: {e}", entity.collection());
        normalize(e)
    })
}

/// By-id read through the same pipeline path; a miss is a tagged
/// `NotFound`.
pub fn read_document_by_id(
    engine: &Engine,
    entity: Entity,
    id: &str,
) -> Result<Document, GatherlyError> {
    let options = QueryOptions {
        filters: Some(vec![FilterSpec {
            field: "_id".into(),
            value: id.into(),
            operator: FilterOp::Eq,
        }]),
        ..QueryOptions::default()
    };
    let mut docs = read_documents(engine, entity, Some(&options))?;
    if docs.is_empty() {
        return Err(GatherlyError::NotFound { entity: entity.name(), id: id.to_string() });
    }
    Ok(docs.swap_remove(0))
}

fn normalize(e: GatherlyError) -> GatherlyError {
    match e {
        e @ (GatherlyError::NotFound { .. } | GatherlyError::Query(_)) => e,
        other => GatherlyError::Query(other.to_string()),
    }
}

pub fn read_events(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::Event, options)
}

pub fn read_event_categories(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::EventCategory, options)
}

pub fn read_venues(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::Venue, options)
}

pub fn read_organizations(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::Organization, options)
}

pub fn read_rsvps(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::Rsvp, options)
}

pub fn read_users(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::User, options)
}

pub fn read_chat_messages(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::ChatMessage, options)
}

pub fn read_notifications(
    engine: &Engine,
    options: Option<&QueryOptions>,
) -> Result<Vec<Document>, GatherlyError> {
    read_documents(engine, Entity::Notification, options)
}

pub fn read_event(engine: &Engine, id: &str) -> Result<Document, GatherlyError> {
    read_document_by_id(engine, Entity::Event, id)
}

pub fn read_venue(engine: &Engine, id: &str) -> Result<Document, GatherlyError> {
    read_document_by_id(engine, Entity::Venue, id)
}

pub fn read_organization(engine: &Engine, id: &str) -> Result<Document, GatherlyError> {
    read_document_by_id(engine, Entity::Organization, id)
}

pub fn read_user(engine: &Engine, id: &str) -> Result<Document, GatherlyError> {
    read_document_by_id(engine, Entity::User, id)
}

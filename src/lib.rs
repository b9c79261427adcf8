pub mod collection;
pub mod dao;
pub mod document;
pub mod engine;
pub mod errors;
pub mod logger;
pub mod pipeline;
pub mod query;
pub mod realtime;
pub mod schema;
pub mod types;

use crate::collection::Collection;
use crate::document::Document;
use crate::engine::Engine;
use crate::errors::GatherlyError;
use crate::pipeline::QueryOptions;
use crate::schema::Entity;
use crate::types::DocumentId;
use std::sync::Arc;

/// The main store struct: one collection per entity, reads going through
/// the pipeline compiler and executor.
pub struct Store {
    engine: Arc<Engine>,
}

impl Store {
    /// Creates an in-memory store with every entity collection registered.
    #[must_use]
    pub fn new() -> Self {
        let engine = Arc::new(Engine::new());
        for entity in Entity::ALL {
            engine.create_collection(entity.collection().to_string());
        }
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The backing collection for an entity. Collections are registered at
    /// construction, so this is get-or-create rather than fallible.
    pub fn collection(&self, entity: Entity) -> Arc<Collection> {
        self.engine.create_collection(entity.collection().to_string())
    }

    /// Inserts raw document data for an entity. An existing string `_id`
    /// is adopted; otherwise one is generated.
    pub fn insert(&self, entity: Entity, data: bson::Document) -> DocumentId {
        self.collection(entity).insert_document(Document::new(data))
    }

    // --- Read API (façade over the dao module) ---

    pub fn find(
        &self,
        entity: Entity,
        options: Option<&QueryOptions>,
    ) -> Result<Vec<bson::Document>, GatherlyError> {
        dao::read_documents(&self.engine, entity, options)
    }

    pub fn find_by_id(&self, entity: Entity, id: &str) -> Result<bson::Document, GatherlyError> {
        dao::read_document_by_id(&self.engine, entity, id)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Initializes the store system.
///
/// This function should be called once before any other operations; it sets
/// up the logger.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
